//! Snapshot file naming.
//!
//! Snapshots are named after the moment they were taken: seconds since the
//! Unix epoch, a dash, then the microseconds, e.g. `1697040000-123456.png`.
//! The dash stands in for the decimal point so the stem contains no `.`.
//!
//! Two captures inside the same microsecond would get the same stem, and
//! [`unique_snapshot_path`] adds a `-1`, `-2`, … suffix rather than
//! overwriting the earlier file.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Timestamp stem for a snapshot taken at `time`.
///
/// Times before the epoch clamp to zero.
pub fn timestamp_stem(time: SystemTime) -> String {
    let since = time.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO);
    format!("{}-{:06}", since.as_secs(), since.subsec_micros())
}

/// First free path of the form `dir/stem.ext`, `dir/stem-1.ext`, `dir/stem-2.ext`, ...
pub fn unique_snapshot_path(dir: &Path, stem: &str, extension: &str) -> PathBuf {
    let candidate = dir.join(format!("{stem}.{extension}"));
    if !candidate.exists() {
        return candidate;
    }
    (1u32..)
        .map(|n| dir.join(format!("{stem}-{n}.{extension}")))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}
