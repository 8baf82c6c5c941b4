use std::time::Duration;

use clap::{Args, CommandFactory, Parser, Subcommand};
use stripsync_app::Synchronizer;
use stripsync_cli::{describe, parse_event, parse_u8, ChannelInput, DryRunBus};
use stripsync_core::{
    config::{DEFAULT_ADDRESS, DEFAULT_ANIMATION_COUNT, DEFAULT_STRIP_COUNT},
    CommandByte, Config, Selector, StripIndex,
};
use tokio::io::{AsyncBufReadExt, BufReader};

/// LED strips animation test harness
///
/// Pushes animation commands, selected by the operator, to the LED strips controller
/// over a shared bus.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = false)]
struct Cli {
    /// Actual command
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct StripsArgs {
    /// Number of strips wired to the controller
    #[arg(long = "strips", default_value_t = DEFAULT_STRIP_COUNT)]
    strip_count: u8,
    /// Number of animations known by the controller
    #[arg(long = "animations", default_value_t = DEFAULT_ANIMATION_COUNT)]
    animation_count: u8,
    /// Selector that stops the strip animation
    #[arg(long = "clear-selector", default_value_t = DEFAULT_ANIMATION_COUNT)]
    clear_selector: u8,
    /// Peripheral bus address
    #[arg(long, default_value_t = DEFAULT_ADDRESS, value_parser = parse_u8)]
    address: u8,
}

impl StripsArgs {
    fn config(&self) -> anyhow::Result<Config> {
        let config = Config {
            strip_count: self.strip_count,
            animation_count: self.animation_count,
            clear_selector: self.clear_selector,
            address: self.address,
        };
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the control loop reading commands from stdin, one command per line
    ///
    /// Commands: `a` (`advance`) switches the selected strip to the next animation,
    /// `c` (`clear`) clears all strips, a strip number selects that strip. Blank and
    /// malformed lines are skipped, queued commands are taken one per loop tick.
    Run {
        #[command(flatten)]
        strips: StripsArgs,
        /// Control loop rate
        #[arg(
            short,
            long,
            default_value_t = 50,
            value_name = "Hz",
            value_parser = clap::value_parser!(u32).range(1..=1000)
        )]
        rate: u32,
    },
    /// Print the command byte for the strip and the selector
    Encode {
        /// Strip index
        strip: StripIndex,
        /// Animation selector
        selector: Selector,
    },
    /// Explain the command byte
    Decode {
        /// Command byte, decimal or `0x` hexadecimal
        command: CommandByte,
        #[command(flatten)]
        strips: StripsArgs,
    },
    /// Generate shell completions
    Completions {
        /// The shell to generate the completions for
        #[arg(value_enum)]
        shell: clap_complete_command::Shell,
    },
}

async fn run(config: Config, rate: u32) -> anyhow::Result<()> {
    let (events_tx, events_rx) = tokio::sync::mpsc::unbounded_channel();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            match parse_event(&line) {
                Ok(Some(event)) => {
                    if events_tx.send(event).is_err() {
                        break;
                    }
                }
                Ok(None) => {}
                Err(err) => log::warn!("{err}"),
            }
        }
        log::trace!("Stdin closed");
    });

    let mut synchronizer =
        Synchronizer::new(DryRunBus::new(config), ChannelInput::new(events_rx), config)?;
    let mut interval = tokio::time::interval(Duration::from_secs_f64(1.0 / f64::from(rate)));

    log::info!(
        "Driving {} strips at {:#04x} with {} Hz control loop",
        config.strip_count,
        config.address,
        rate
    );
    loop {
        interval.tick().await;
        synchronizer.cycle();

        if synchronizer.input_mut().is_closed() && synchronizer.state().is_synced() {
            break;
        }
    }

    let (bus, _) = synchronizer.release();
    log::info!("Done, {} commands have been sent", bus.writes());
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Run { strips, rate } => run(strips.config()?, rate).await?,

        Command::Encode { strip, selector } => {
            let command = CommandByte::encode(strip, selector)?;
            println!("{command}");
        }

        Command::Decode { command, strips } => {
            println!("{}", describe(command, &strips.config()?));
        }

        Command::Completions { shell } => {
            shell.generate(&mut Cli::command(), &mut std::io::stdout());
        }
    }

    Ok(())
}
