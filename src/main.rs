use clap::{Parser, Subcommand};
use env_logger::{Env, Target};
use squarecrop::collection::Collection;
use squarecrop::session::Controller;
use squarecrop::{config, console, output};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "squarecrop")]
#[command(about = "Interactive square cropping for folders of photos")]
#[command(long_about = "\
Interactive square cropping for folders of photos

Pick an input folder of .jpg/.png/.bmp files and an output folder, then pan
and zoom a square window over each image and snapshot it. Every snapshot is
a target_size x target_size image named after the moment it was taken.

Session commands (one per line):

  input DIR / output DIR     select folders (the session starts once both are set)
  pan DX DY / drag DX DY     move the crop window
  zoom F / + / -             zoom by a factor or one step
  bg #rrggbb / bg R G B      background colour for uncovered pixels
  next, prev, goto N         navigate (N is 1-based)
  snap                       save the current frame
  reset, info, help, quit

Logging goes to stderr; set RUST_LOG=debug for render details.

Run 'squarecrop gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Folder to crop images from
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// Folder to write snapshots to
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the interactive console on stdin/stdout
    Session,
    /// List the images an input folder would yield
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Session => {
            let config = config::load_config(&cli.config_dir)?;
            let mut controller = Controller::new(config);
            let mut started = Ok(false);
            if let Some(input) = cli.input {
                started = controller.select_input(input);
            }
            if let Some(output) = cli.output.filter(|_| started.is_ok()) {
                started = controller.select_output(output);
            }
            if let Err(e) = started {
                // an undecodable first image still leaves the session running
                if !controller.is_active() {
                    return Err(e.into());
                }
                println!("error: {e}");
            }
            if let Some(session) = controller.session() {
                let (index, len) = session.position();
                println!(
                    "{}",
                    output::format_status(index, len, session.current_path())
                );
            }
            console::run(&mut controller, io::stdin().lock(), io::stdout().lock())?;
        }
        Command::Check => {
            let input = cli.input.ok_or("check needs --input")?;
            println!("==> Checking {}", input.display());
            let collection = Collection::open(&input)?;
            output::print_collection(&collection);
            println!("==> Folder is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
