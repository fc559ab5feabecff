//! Line-oriented operator console.
//!
//! Reads one command per line from any [`BufRead`], drives a [`Controller`],
//! and writes operator-facing text to any [`Write`]. The binary wires it to
//! stdin/stdout; tests feed it scripts.
//!
//! Blank lines are ignored. A `#` at the start of a line or after whitespace
//! starts a comment, except in `input`/`output` paths and as the colour
//! argument of `bg`. See [`format_help`] for the command list.
//!
//! [`format_help`]: crate::output::format_help

use crate::imaging::{Color, ColorParseError, ImageBackend};
use crate::image_state::ImageStateError;
use crate::output::{END_MESSAGE, format_help, format_info, format_saved, format_status};
use crate::session::{Command, Controller, Outcome, SessionError};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("unknown command {0:?}, try `help`")]
    Unknown(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error("{0:?} is not a valid image number")]
    InvalidIndex(String),
    #[error(transparent)]
    Color(#[from] ColorParseError),
}

/// One parsed console line.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleInput {
    Command(Command),
    Input(PathBuf),
    Output(PathBuf),
    /// Screen-space drag, converted to pan through the current zoom.
    Drag { dx: i32, dy: i32 },
    ZoomIn,
    ZoomOut,
    Info,
    Help,
    Quit,
}

/// Parse one line. Blank lines and comments yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ConsoleInput>, ParseError> {
    let line = strip_comment(line).trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };
    let args: Vec<&str> = rest.split_whitespace().collect();

    let input = match word {
        "input" => ConsoleInput::Input(path_arg(rest, "input DIR")?),
        "output" => ConsoleInput::Output(path_arg(rest, "output DIR")?),
        "pan" => {
            let (dx, dy) = pair(&args, "pan DX DY")?;
            ConsoleInput::Command(Command::Pan { dx, dy })
        }
        "drag" => {
            let (dx, dy) = pair(&args, "drag DX DY")?;
            ConsoleInput::Drag { dx, dy }
        }
        "zoom" => match args.as_slice() {
            [f] => ConsoleInput::Command(Command::Zoom(
                f.parse().map_err(|_| ParseError::Usage("zoom F"))?,
            )),
            _ => return Err(ParseError::Usage("zoom F")),
        },
        "+" => ConsoleInput::ZoomIn,
        "-" => ConsoleInput::ZoomOut,
        "bg" => ConsoleInput::Command(Command::SetBackground(color(&args)?)),
        "next" | "n" => ConsoleInput::Command(Command::Next),
        "prev" | "p" => ConsoleInput::Command(Command::Previous),
        "goto" => match args.as_slice() {
            [n] => ConsoleInput::Command(Command::JumpTo(one_based(n)?)),
            _ => return Err(ParseError::Usage("goto N")),
        },
        "snap" | "s" => ConsoleInput::Command(Command::Snapshot),
        "reset" => ConsoleInput::Command(Command::Reset),
        "info" => ConsoleInput::Info,
        "help" | "?" => ConsoleInput::Help,
        "quit" | "q" | "exit" => ConsoleInput::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(input))
}

fn strip_comment(line: &str) -> &str {
    let line = line.trim_start();
    let word = line.split(char::is_whitespace).next().unwrap_or_default();
    if matches!(word, "input" | "output") {
        return line;
    }
    // `bg #rrggbb`: the first argument is a colour, not a comment
    let colour_at = (word == "bg").then(|| line.len() - line[word.len()..].trim_start().len());

    let mut after_space = true;
    for (i, c) in line.char_indices() {
        if c == '#' && after_space && Some(i) != colour_at {
            return &line[..i];
        }
        after_space = c.is_whitespace();
    }
    line
}

fn path_arg(rest: &str, usage: &'static str) -> Result<PathBuf, ParseError> {
    if rest.is_empty() {
        return Err(ParseError::Usage(usage));
    }
    Ok(PathBuf::from(rest))
}

fn pair(args: &[&str], usage: &'static str) -> Result<(i32, i32), ParseError> {
    match args {
        [a, b] => Ok((
            a.parse().map_err(|_| ParseError::Usage(usage))?,
            b.parse().map_err(|_| ParseError::Usage(usage))?,
        )),
        _ => Err(ParseError::Usage(usage)),
    }
}

fn color(args: &[&str]) -> Result<Color, ParseError> {
    const USAGE: &str = "bg #rrggbb | bg R G B";
    match args {
        [hex] => Ok(hex.parse()?),
        [r, g, b] => {
            let channel = |s: &str| s.parse::<u8>().map_err(|_| ParseError::Usage(USAGE));
            Ok(Color::new(channel(r)?, channel(g)?, channel(b)?))
        }
        _ => Err(ParseError::Usage(USAGE)),
    }
}

/// `"3"` → index 2. Zero, negatives and non-numbers are rejected.
fn one_based(s: &str) -> Result<usize, ParseError> {
    match s.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(ParseError::InvalidIndex(s.to_string())),
    }
}

/// Run the console until `quit` or end of input.
pub fn run<B, R, W>(controller: &mut Controller<B>, reader: R, mut writer: W) -> io::Result<()>
where
    B: ImageBackend,
    R: BufRead,
    W: Write,
{
    for line in reader.lines() {
        let line = line?;
        match parse_line(&line) {
            Ok(None) => {}
            Ok(Some(ConsoleInput::Quit)) => break,
            Ok(Some(input)) => execute(controller, input, &mut writer)?,
            Err(e) => {
                log::debug!("unparsable console line {line:?}");
                writeln!(writer, "error: {e}")?;
            }
        }
        writer.flush()?;
    }
    Ok(())
}

fn execute<B: ImageBackend, W: Write>(
    controller: &mut Controller<B>,
    input: ConsoleInput,
    writer: &mut W,
) -> io::Result<()> {
    let result = match input {
        ConsoleInput::Input(dir) => {
            let started = controller.select_input(dir);
            return selected(controller, started, writer);
        }
        ConsoleInput::Output(dir) => {
            let started = controller.select_output(dir);
            return selected(controller, started, writer);
        }
        ConsoleInput::Info => {
            match controller.session() {
                Some(session) => write_lines(writer, format_info(session))?,
                None => writeln!(writer, "{}", SessionError::Inactive)?,
            }
            return Ok(());
        }
        ConsoleInput::Help => return write_lines(writer, format_help()),
        ConsoleInput::Quit => return Ok(()),
        ConsoleInput::Command(command) => controller.dispatch(command),
        ConsoleInput::Drag { dx, dy } => controller.drag(dx, dy),
        ConsoleInput::ZoomIn => controller.zoom_in(),
        ConsoleInput::ZoomOut => controller.zoom_out(),
    };

    match result {
        Ok(Outcome::Moved { index, len, path }) => {
            writeln!(writer, "{}", format_status(index, len, &path))
        }
        Ok(Outcome::Saved(name)) => writeln!(writer, "{}", format_saved(&name)),
        Ok(Outcome::Ended) => writeln!(writer, "{END_MESSAGE}"),
        Ok(Outcome::Rendered | Outcome::Unchanged) => Ok(()),
        Err(e) => {
            writeln!(writer, "error: {e}")?;
            // The cursor moved onto an undecodable file; say where we are.
            if matches!(e, SessionError::Image(ImageStateError::Decode(_))) {
                write_status(controller, writer)?;
            }
            Ok(())
        }
    }
}

fn selected<B: ImageBackend, W: Write>(
    controller: &Controller<B>,
    result: Result<bool, SessionError>,
    writer: &mut W,
) -> io::Result<()> {
    match result {
        Ok(true) => write_status(controller, writer),
        Ok(false) => Ok(()),
        Err(e) => {
            writeln!(writer, "error: {e}")?;
            // started on an undecodable first file
            if controller.is_active() {
                write_status(controller, writer)?;
            }
            Ok(())
        }
    }
}

fn write_status<B: ImageBackend, W: Write>(
    controller: &Controller<B>,
    writer: &mut W,
) -> io::Result<()> {
    if let Some(session) = controller.session() {
        let (index, len) = session.position();
        writeln!(writer, "{}", format_status(index, len, session.current_path()))?;
    }
    Ok(())
}

fn write_lines<W: Write>(writer: &mut W, lines: Vec<String>) -> io::Result<()> {
    for line in lines {
        writeln!(writer, "{line}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{image_folder, small_config, write_solid_image};
    use std::io::Cursor;
    use tempfile::TempDir;

    fn parse(line: &str) -> ConsoleInput {
        parse_line(line).unwrap().unwrap()
    }

    fn run_script(controller: &mut Controller, script: &str) -> Vec<String> {
        let mut out = Vec::new();
        run(controller, Cursor::new(script), &mut out).unwrap();
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("# a note").unwrap(), None);
        assert_eq!(
            parse("next # go on"),
            ConsoleInput::Command(Command::Next)
        );
    }

    #[test]
    fn hash_inside_a_word_is_not_a_comment() {
        assert_eq!(
            parse("input /photos/#1"),
            ConsoleInput::Input(PathBuf::from("/photos/#1"))
        );
        assert_eq!(
            parse("output shoots # keepers"),
            ConsoleInput::Output(PathBuf::from("shoots # keepers"))
        );
        assert_eq!(
            parse("bg #ff0000 # note"),
            ConsoleInput::Command(Command::SetBackground(Color::new(255, 0, 0)))
        );
        assert_eq!(
            parse("bg 0 0 255 #blue"),
            ConsoleInput::Command(Command::SetBackground(Color::new(0, 0, 255)))
        );
        assert_eq!(parse_line("   #indented note").unwrap(), None);
    }

    #[test]
    fn parses_commands_and_aliases() {
        assert_eq!(parse("n"), ConsoleInput::Command(Command::Next));
        assert_eq!(parse("prev"), ConsoleInput::Command(Command::Previous));
        assert_eq!(parse("s"), ConsoleInput::Command(Command::Snapshot));
        assert_eq!(parse("reset"), ConsoleInput::Command(Command::Reset));
        assert_eq!(
            parse("pan -3 12"),
            ConsoleInput::Command(Command::Pan { dx: -3, dy: 12 })
        );
        assert_eq!(parse("drag 10 0"), ConsoleInput::Drag { dx: 10, dy: 0 });
        assert_eq!(parse("zoom 1.5"), ConsoleInput::Command(Command::Zoom(1.5)));
        assert_eq!(parse("+"), ConsoleInput::ZoomIn);
        assert_eq!(parse("-"), ConsoleInput::ZoomOut);
        assert_eq!(parse("quit"), ConsoleInput::Quit);
    }

    #[test]
    fn paths_keep_spaces() {
        assert_eq!(
            parse("input  My Photos/2024 "),
            ConsoleInput::Input(PathBuf::from("My Photos/2024"))
        );
        assert_eq!(
            parse_line("output").unwrap_err(),
            ParseError::Usage("output DIR")
        );
    }

    #[test]
    fn background_hex_and_triplet() {
        let magenta = ConsoleInput::Command(Command::SetBackground(Color::new(255, 0, 255)));
        assert_eq!(parse("bg #ff00ff"), magenta);
        assert_eq!(parse("bg 255 0 255"), magenta);
        assert!(matches!(
            parse_line("bg #ff00f").unwrap_err(),
            ParseError::Color(_)
        ));
        assert!(matches!(
            parse_line("bg 256 0 0").unwrap_err(),
            ParseError::Usage(_)
        ));
    }

    #[test]
    fn goto_is_one_based() {
        assert_eq!(parse("goto 1"), ConsoleInput::Command(Command::JumpTo(0)));
        assert_eq!(parse("goto 12"), ConsoleInput::Command(Command::JumpTo(11)));
        for bad in ["goto 0", "goto -2", "goto two", "goto 1.5"] {
            assert!(matches!(
                parse_line(bad).unwrap_err(),
                ParseError::InvalidIndex(_)
            ));
        }
    }

    #[test]
    fn unknown_and_malformed_commands() {
        assert_eq!(
            parse_line("crop").unwrap_err(),
            ParseError::Unknown("crop".into())
        );
        assert_eq!(parse_line("pan 3").unwrap_err(), ParseError::Usage("pan DX DY"));
        assert_eq!(parse_line("zoom big").unwrap_err(), ParseError::Usage("zoom F"));
    }

    #[test]
    fn script_walks_snaps_and_ends() {
        let input = image_folder(&[("a.jpg", 40, 30), ("b.png", 30, 40)]);
        let output = TempDir::new().unwrap();
        let mut controller = Controller::new(small_config());
        let script = format!(
            "input {}\noutput {}\n+\npan 3 0\nnext\nsnap\nnext\n",
            input.path().display(),
            output.path().display()
        );

        let lines = run_script(&mut controller, &script);

        assert_eq!(lines.len(), 4, "{lines:?}");
        assert_eq!(
            lines[0],
            format!("1/2 {}", input.path().join("a.jpg").display())
        );
        assert_eq!(
            lines[1],
            format!("2/2 {}", input.path().join("b.png").display())
        );
        assert!(lines[2].ends_with(".png just saved"));
        assert_eq!(lines[3], END_MESSAGE);
        assert_eq!(std::fs::read_dir(output.path()).unwrap().count(), 1);
        assert!(!controller.is_active());
    }

    #[test]
    fn errors_are_reported_and_console_continues() {
        let input = image_folder(&[("a.jpg", 40, 30)]);
        let output = TempDir::new().unwrap();
        let mut controller = Controller::new(small_config());
        let script = format!(
            "next\ninput {}\noutput {}\ngoto 5\ngoto x\nzoom 0\nwat\ninfo\n",
            input.path().display(),
            output.path().display()
        );

        let lines = run_script(&mut controller, &script);

        assert!(lines[0].starts_with("error: no active session"));
        assert!(lines[1].starts_with("1/1 "));
        assert_eq!(lines[2], "error: index 4 is out of range (collection has 1 images)");
        assert_eq!(lines[3], "error: \"x\" is not a valid image number");
        assert!(lines[4].starts_with("error: "));
        assert!(lines[5].starts_with("error: unknown command"));
        assert!(lines[6].starts_with("1/1 "));
        assert_eq!(lines[8], "    zoom: 1.000");
    }

    #[test]
    fn quit_stops_reading() {
        let input = image_folder(&[("a.jpg", 40, 30), ("b.jpg", 40, 30)]);
        let output = TempDir::new().unwrap();
        let mut controller = Controller::new(small_config());
        let script = format!(
            "input {}\noutput {}\nquit\nnext\n",
            input.path().display(),
            output.path().display()
        );

        let lines = run_script(&mut controller, &script);
        assert_eq!(lines.len(), 1);
        assert_eq!(controller.session().unwrap().position(), (0, 2));
    }

    #[test]
    fn decode_failure_reports_position() {
        let input = image_folder(&[("a.jpg", 40, 30)]);
        std::fs::write(input.path().join("b.png"), b"garbage").unwrap();
        write_solid_image(input.path(), "c.bmp", 20, 20, [0, 255, 0]);
        let output = TempDir::new().unwrap();
        let mut controller = Controller::new(small_config());
        let script = format!(
            "input {}\noutput {}\nnext\nsnap\nnext\n",
            input.path().display(),
            output.path().display()
        );

        let lines = run_script(&mut controller, &script);

        assert!(lines[1].starts_with("error: "));
        assert_eq!(
            lines[2],
            format!("2/3 {}", input.path().join("b.png").display())
        );
        assert!(lines[3].starts_with("error: no image loaded"));
        assert_eq!(
            lines[4],
            format!("3/3 {}", input.path().join("c.bmp").display())
        );
        let frame = controller.current_frame().unwrap();
        assert!(frame.pixels().all(|p| p.0 == [0, 255, 0]));
    }

    #[test]
    fn undecodable_first_file_starts_with_error_and_status() {
        let input = image_folder(&[("b.png", 20, 20)]);
        std::fs::write(input.path().join("a.jpg"), b"garbage").unwrap();
        let output = TempDir::new().unwrap();
        let mut controller = Controller::new(small_config());
        let script = format!(
            "input {}\noutput {}\nnext\n",
            input.path().display(),
            output.path().display()
        );

        let lines = run_script(&mut controller, &script);

        assert!(lines[0].starts_with("error: "));
        assert_eq!(
            lines[1],
            format!("1/2 {}", input.path().join("a.jpg").display())
        );
        assert_eq!(
            lines[2],
            format!("2/2 {}", input.path().join("b.png").display())
        );
        assert!(controller.current_frame().is_some());
    }
}
