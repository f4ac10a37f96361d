use super::*;
use crate::game::Outcome;
use crate::game::Parity;
use crate::game::RoundRecord;
use crate::gameroom::Phase;
use crate::gameroom::Tick;
use colored::Colorize;

/// Terminal rendering, one line per meaningful transition.
#[derive(Debug, Clone, Copy, Default)]
pub struct Console;

impl Sink for Console {
    fn render(&mut self, frame: &Frame) {
        match frame.phase {
            Phase::Idle => match frame.fault {
                Some(ref fault) => println!("{} {}", "session aborted:".red(), fault),
                None => println!("{}", "type `start` (or press the button) to play".dimmed()),
            },
            Phase::AwaitingChoice => println!(
                "\nround {}  {}  call {} or {} (`go` keeps {})",
                frame.round,
                frame.score,
                "odds".cyan(),
                "evens".cyan(),
                frame.choice.to_string().cyan()
            ),
            Phase::Countdown(Tick::Go) => println!("{}", "GO! show your hand".bold().yellow()),
            Phase::Countdown(tick) => println!("{}", format!("{}...", tick).yellow()),
            Phase::Capturing(1) => {}
            Phase::Capturing(attempt) => {
                println!("{}", format!("no hand seen, try again ({})", attempt).dimmed())
            }
            Phase::Resolving => {}
            Phase::RoundComplete => match frame.last {
                Some(ref record) => println!("{}", round(record)),
                None => {}
            },
            Phase::GameComplete => match frame.score.human > frame.score.robot {
                true => println!("{} {}", "YOU WIN".bold().green(), frame.score),
                false => println!("{} {}", "ROBOT WINS".bold().red(), frame.score),
            },
        }
    }
}

fn round(record: &RoundRecord) -> String {
    let verdict = match record.outcome() {
        Outcome::HumanWin => "you take the round".green(),
        Outcome::RobotWin => "robot takes the round".red(),
        Outcome::NoContest => "no contest".dimmed(),
    };
    match (record.human(), record.total()) {
        (Some(human), Some(total)) => format!(
            "you {} + robot {} = {} ({}), you called {}: {}",
            human,
            record.robot(),
            total,
            Parity::of(total),
            record.choice(),
            verdict
        ),
        _ => format!("robot showed {}: {}", record.robot(), verdict),
    }
}
