//! Terminal front end: reads commands and scanner input from stdin and
//! prints the active view after every change.

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};

use crate::address::AddressBar;
use crate::app::{render, Adjustment, Controller, ViewState, QUICK_PICKS};
use crate::scan::camera::Camera;
use crate::scan::decoder::{DecodeEvent, DecodeSink};
use crate::scan::line::{FrameFeed, LineDecoder};
use crate::store::RecordStore;

const HELP: &str = "\
Commands:
  scan          start the camera scanner
  cancel        stop scanning
  open <id>     look up an item by id or item number
  + / -         change the amount by one
  amount <n>    set the amount
  pick <n>      quick pick 1, 5, 10 or 25
  take          remove the amount from stock
  add           add the amount to stock
  again         start over
  quit          exit

While scanning, lines other than cancel, again, help and quit are read as
scanner input.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Scan,
    Cancel,
    Open(String),
    StepUp,
    StepDown,
    Amount(String),
    Pick(u32),
    Take,
    Add,
    Again,
    Help,
    Quit,
}

impl Command {
    /// Commands honoured during a scan. Every other line goes to the decoder.
    pub fn runs_while_scanning(&self) -> bool {
        matches!(
            self,
            Command::Cancel | Command::Again | Command::Help | Command::Quit
        )
    }
}

pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_lowercase().as_str() {
        "scan" | "s" => Command::Scan,
        "cancel" | "c" => Command::Cancel,
        "open" | "o" if !rest.is_empty() => Command::Open(rest.to_string()),
        "+" => Command::StepUp,
        "-" => Command::StepDown,
        "amount" | "a" => Command::Amount(rest.to_string()),
        "pick" | "p" => Command::Pick(rest.parse().ok()?),
        "take" | "t" => Command::Take,
        "add" => Command::Add,
        "again" | "new" => Command::Again,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => return None,
    };
    Some(command)
}

pub async fn run<S, C, A>(
    mut controller: Controller<S, C, LineDecoder, A>,
    feed: FrameFeed,
) -> anyhow::Result<()>
where
    S: RecordStore + Clone + 'static,
    C: Camera,
    A: AddressBar,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    controller.boot().await;
    show(&controller);

    loop {
        let deadline = controller.notice_deadline();

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let command = parse_command(&line);

                if matches!(controller.state(), ViewState::Scanning)
                    && !command.as_ref().is_some_and(Command::runs_while_scanning)
                {
                    feed.push(&line).await;
                    continue;
                }

                match command {
                    Some(Command::Quit) => break,
                    Some(command) => dispatch(&mut controller, command, &tx).await,
                    None => {
                        if !line.trim().is_empty() {
                            println!("Unknown command, type 'help'.");
                        }
                        continue;
                    }
                }
            }
            Some(event) = rx.recv() => {
                if event == DecodeEvent::NoSymbol {
                    continue;
                }
                controller.handle_decode_event(event).await;
            }
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                controller.expire_notice(Instant::now());
            }
        }

        show(&controller);
    }

    controller.shutdown().await;
    Ok(())
}

async fn dispatch<S, C, A>(
    controller: &mut Controller<S, C, LineDecoder, A>,
    command: Command,
    sink: &DecodeSink,
) where
    S: RecordStore + Clone + 'static,
    C: Camera,
    A: AddressBar,
{
    match command {
        Command::Scan => {
            controller.start_scan().await;
            if matches!(controller.state(), ViewState::Scanning) {
                // The scanning view has to be on screen before the decoder attaches.
                show(controller);
                controller.attach_decoder(sink.clone()).await;
            }
        }
        Command::Cancel => controller.cancel_scan().await,
        Command::Open(id) => controller.open(&id).await,
        Command::StepUp => controller.step_up(),
        Command::StepDown => controller.step_down(),
        Command::Amount(input) => controller.set_amount(&input),
        Command::Pick(value) => {
            if !controller.quick_pick(value) {
                if let Some(hint) = pick_hint(value) {
                    println!("{}", hint);
                }
            }
        }
        Command::Take => controller.adjust(Adjustment::Take).await,
        Command::Add => controller.adjust(Adjustment::Add).await,
        Command::Again => controller.reset().await,
        Command::Help => println!("{}", HELP),
        Command::Quit => {}
    }
}

/// Only a value outside the quick-pick set earns a hint; outside the detail
/// view a valid pick is simply ignored.
fn pick_hint(value: u32) -> Option<String> {
    (!QUICK_PICKS.contains(&value)).then(|| format!("Quick picks: {:?}", QUICK_PICKS))
}

fn show<S, C, A>(controller: &Controller<S, C, LineDecoder, A>)
where
    S: RecordStore + Clone + 'static,
    C: Camera,
    A: AddressBar,
{
    let link = controller.address().current();
    println!(
        "{}",
        render(
            controller.state(),
            &controller.settings().scan_config,
            link.as_str()
        )
    );
}
