mod command;
mod config;
mod play;
mod solve;

use clap::{Parser, Subcommand, ValueEnum};
use numzilla_engine::logger::{self, Verbosity};
use numzilla_engine::puzzle::{DEFAULT_MAX_STEPS, Puzzle};
use numzilla_engine::{SessionRng, log};

use config::{CONFIG_FILE_NAME, Overrides, get_config_manager};
use solve::SolveOptions;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Off,
    Solver,
    Events,
    Grid,
}

impl From<LogLevel> for Verbosity {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => Verbosity::Off,
            LogLevel::Solver => Verbosity::Solver,
            LogLevel::Events => Verbosity::Events,
            LogLevel::Grid => Verbosity::Grid,
        }
    }
}

#[derive(Parser)]
#[command(name = "numzilla", about = "Number matching puzzle")]
struct Args {
    /// Settings file; missing means defaults.
    #[arg(long, default_value = CONFIG_FILE_NAME)]
    config: String,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long)]
    width: Option<usize>,
    #[arg(long)]
    rows: Option<usize>,
    #[arg(long)]
    target: Option<u8>,
    #[arg(long, value_enum)]
    verbosity: Option<LogLevel>,
    #[arg(long)]
    use_log_prefix: bool,
    /// Save the effective settings back to the config file.
    #[arg(long)]
    write_config: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Play from the terminal.
    Play,
    /// Let the bot play.
    Solve {
        /// Stop the first time a scramble would be needed.
        #[arg(long)]
        partial: bool,
        #[arg(long, default_value_t = DEFAULT_MAX_STEPS)]
        max_steps: u64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let manager = get_config_manager(&args.config);
    let config = manager.get_config()?.with_overrides(Overrides {
        width: args.width,
        rows: args.rows,
        target: args.target,
        verbosity: args.verbosity.map(Verbosity::from),
    });
    if args.write_config {
        manager.set_config(&config)?;
    }

    let prefix = args.use_log_prefix.then(|| "Numzilla".to_string());
    logger::init_logger(prefix, config.verbosity);

    let rng = match args.seed {
        Some(seed) => SessionRng::new(seed),
        None => SessionRng::from_random(),
    };
    log!(Verbosity::Events, "### SEED: {}", rng.seed());
    let mut puzzle = Puzzle::new(config.puzzle, rng)?;

    let stdout = std::io::stdout();
    match args.command.unwrap_or(Command::Play) {
        Command::Play => {
            play::run_interactive(&mut puzzle, std::io::stdin().lock(), stdout.lock())?;
        }
        Command::Solve { partial, max_steps } => {
            let options = SolveOptions {
                fully_solve: !partial,
                max_steps,
            };
            solve::run_solver(&mut puzzle, &options, stdout.lock())?;
        }
    }

    Ok(())
}
