//! Odds-or-evens console binary.
//!
//! Plays against the adaptive robot with typed control lines standing in for
//! the camera, prints lifetime statistics, or wipes the archive.

use clap::Parser;
use clap::Subcommand;
use oddsevens::capture::Hand;
use oddsevens::capture::Manual;
use oddsevens::capture::camera;
use oddsevens::config::Config;
use oddsevens::game::Statistics;
use oddsevens::gameroom::Event;
use oddsevens::gameroom::Orchestrator;
use oddsevens::history::History;
use oddsevens::peripheral::Signal;
use oddsevens::predictor::Predictor;
use oddsevens::presentation::Console;
use std::path::PathBuf;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON config file; missing keys keep their defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Seed for the robot's exploration
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Peripheral address: device path or host:port
    #[arg(long, global = true)]
    link: Option<String>,
    /// Directory holding the archive
    #[arg(long, global = true)]
    data: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    #[command(about = "Play against the robot (default)")]
    Play {
        /// Send TEST to the peripheral after connecting
        #[arg(long)]
        self_test: bool,
    },
    #[command(about = "Print lifetime statistics and the current prediction")]
    Status,
    #[command(about = "Replace the archive with an empty one")]
    Reset,
}

impl Args {
    fn settings(&self) -> anyhow::Result<Config> {
        let mut config = match self.config {
            Some(ref path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(seed) = self.seed {
            config.policy.seed = Some(seed);
        }
        if let Some(ref link) = self.link {
            config.link = Some(link.clone());
        }
        if let Some(ref data) = self.data {
            config.data = data.clone();
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    oddsevens::log()?;
    let config = args.settings()?;
    match args.command {
        None => play(config, false).await,
        Some(Command::Play { self_test }) => play(config, self_test).await,
        Some(Command::Status) => status(config),
        Some(Command::Reset) => reset(config),
    }
}

async fn play(config: Config, self_test: bool) -> anyhow::Result<()> {
    let history = History::open(&config.data, config.predictor);
    let manual = Manual::default();
    let hand = manual.hand();
    let room = Orchestrator::new(config.clone(), history, camera(manual)).with_sink(Box::new(Console));
    let peripheral = oddsevens::peripheral::attach(
        config.link.as_deref(),
        config.timing.probe,
        room.sender(),
    )
    .await;
    if self_test {
        log::info!("[link] sending self-test");
        peripheral.notify(Signal::Test);
    }
    let mut room = room.with_peripheral(peripheral);
    oddsevens::interrupt(room.sender());
    console(room.sender(), hand);
    room.run().await;
    Ok(())
}

fn status(config: Config) -> anyhow::Result<()> {
    let history = History::open(&config.data, config.predictor);
    let stats = Statistics::from(history.records());
    let predictor = Predictor::restore(history.predictor().clone(), config.predictor, history.records());
    println!("{}", stats);
    println!("next move   {}", predictor.predict());
    Ok(())
}

fn reset(config: Config) -> anyhow::Result<()> {
    History::open(&config.data, config.predictor).reset(config.predictor)?;
    println!("archive in {} reset", config.data.display());
    Ok(())
}

/// Read control lines from stdin on a plain thread and feed the room.
/// `show <n>` answers the capture poller; everything else is an [`Event`].
fn console(queue: UnboundedSender<Event>, hand: Hand) {
    println!("commands: start | odds | evens | go | show <n> | abort | quit");
    std::thread::spawn(move || {
        loop {
            let ref mut buffer = String::new();
            match std::io::stdin().read_line(buffer) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            let line = buffer.trim();
            if let Some(n) = line.strip_prefix("show") {
                match n.trim().parse::<u8>() {
                    Ok(n) => hand.show(n),
                    Err(_) => eprintln!("usage: show <0-5>"),
                }
                continue;
            }
            match Event::try_from(line) {
                Ok(event) => {
                    let quit = event == Event::Quit;
                    if queue.send(event).is_err() || quit {
                        break;
                    }
                }
                Err(e) => eprintln!("{}", e),
            }
        }
    });
}
