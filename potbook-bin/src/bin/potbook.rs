use std::error::Error;
use std::fs;
use std::io::{stdin, Read};
use std::path::{Path, PathBuf};

use itertools::Itertools;
use potbook_core::display::DisplayPot;
use potbook_core::history::{format_hand, parse_hand};
use potbook_core::log::Log;
use potbook_core::next_hand::{generate_next_hand, Stacks};
use potbook_core::unit::with_commas;
use potbook_core::validate::Validation;
use potbook_core::{Currency, Segment, SeqNum, Unit};
use potbook_messages::{SettleRequest, SettleResponse, ShowdownRequest, ShowdownResponse};
use structopt::StructOpt;

#[derive(StructOpt)]
#[structopt(name = "potbook", about = "Settle live poker pots from recorded actions")]
struct Opt {
    #[structopt(short, long, help = "Print the engine log to stderr")]
    verbose: bool,
    #[structopt(long, help = "Print the full response as JSON")]
    json: bool,
    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(StructOpt)]
enum Command {
    /// Settle a hand through one segment. Reads a settle request as JSON.
    Settle {
        #[structopt(parse(from_os_str), help = "Request file, or - for stdin")]
        input: PathBuf,
        #[structopt(long, help = "Segment to settle through, e.g. flop_more")]
        segment: Option<Segment>,
        #[structopt(long, help = "Unit for amounts entered without one: actual, K or Mil")]
        unit: Option<Unit>,
        #[structopt(long, help = "Chips already in the middle from earlier streets")]
        previous_pot: Option<Currency>,
    },
    /// Pay out the pots and seat the next hand. Reads a showdown request as JSON.
    NextHand {
        #[structopt(parse(from_os_str), help = "Request file, or - for stdin")]
        input: PathBuf,
    },
    /// Move the button on a hand setup, stacks unchanged. Reads hand text.
    Rotate {
        #[structopt(parse(from_os_str), help = "Hand text file, or - for stdin")]
        input: PathBuf,
    },
}

fn read_input(path: &Path) -> Result<String, Box<dyn Error>> {
    if path == Path::new("-") {
        let mut s = String::new();
        stdin().read_to_string(&mut s)?;
        Ok(s)
    } else {
        Ok(fs::read_to_string(path)?)
    }
}

/// Prints what was logged after `seen`, the last entry the input already had.
fn print_log(log: &Log, seen: SeqNum) {
    for (seq, item) in log.since(seen) {
        eprintln!("[{seq:>3}] {item}");
    }
}

fn print_errors(errors: &[String]) {
    for e in errors {
        println!("  ! {e}");
    }
}

fn print_pot(pot: &DisplayPot) {
    println!("{}", pot.description);
    println!(
        "  Eligible: {}",
        pot.eligible_players.iter().map(|p| p.label()).join(", ")
    );
    for x in &pot.excluded_players {
        println!("  Excluded: {} ({})", x.player.label(), x.reason);
    }
    for line in pot.calculation.formula.lines() {
        println!("    {line}");
    }
    println!("  {}", pot.calculation.result);
}

fn print_settled(resp: &SettleResponse) {
    print_errors(&resp.validation.errors);
    let c = &resp.completion;
    println!(
        "Betting {}: {}",
        if c.is_complete { "complete" } else { "open" },
        c.reason
    );
    if !c.pending_players.is_empty() {
        let names = c.pending_players.iter().filter_map(|id| {
            resp.display
                .players
                .iter()
                .find(|p| p.id == *id)
                .map(|p| p.name.as_str())
        });
        println!("  Waiting on {}", names.format(", "));
    }
    println!("Total pot ${}", with_commas(resp.display.total_pot));
    print_pot(&resp.display.main_pot);
    for side in &resp.display.side_pots {
        print_pot(side);
    }
}

fn print_showdown(resp: &ShowdownResponse) {
    print_validation(&resp.showdown.validation);
    for p in &resp.showdown.next_hand {
        println!(
            "{:<12} {:<7} {:>12} ({:+})",
            p.name,
            p.position.label(),
            with_commas(p.stack),
            p.net_change
        );
    }
    if let Some(text) = &resp.next_hand_text {
        println!();
        println!("{text}");
    }
}

fn print_validation(v: &Validation) {
    if !v.is_valid {
        println!("Next hand failed validation:");
        print_errors(&v.errors);
    }
}

fn settle(
    opt: &Opt,
    input: &Path,
    segment: Option<Segment>,
    unit: Option<Unit>,
    previous_pot: Option<Currency>,
) -> Result<(), Box<dyn Error>> {
    let mut req: SettleRequest = serde_json::from_str(&read_input(input)?)?;
    if let Some(segment) = segment {
        req.segment = segment;
    }
    if let Some(unit) = unit {
        req.stack_data.default_unit = unit;
    }
    if let Some(pot) = previous_pot {
        req.previous_street_pot = pot;
    }
    let resp = req.settle();
    if opt.verbose {
        print_log(&resp.log, req.log.last_seq());
    }
    if opt.json {
        println!("{}", serde_json::to_string_pretty(&resp)?);
    } else {
        print_settled(&resp);
    }
    Ok(())
}

fn next_hand(opt: &Opt, input: &Path) -> Result<(), Box<dyn Error>> {
    let req: ShowdownRequest = serde_json::from_str(&read_input(input)?)?;
    let resp = req.resolve()?;
    if opt.verbose {
        print_log(&resp.log, req.log.last_seq());
    }
    if opt.json {
        println!("{}", serde_json::to_string_pretty(&resp)?);
    } else {
        print_showdown(&resp);
    }
    Ok(())
}

fn rotate(opt: &Opt, input: &Path) -> Result<(), Box<dyn Error>> {
    let hand = parse_hand(&read_input(input)?)?;
    let players = hand.players();
    let stacks: Stacks = players.iter().map(|p| (p.name.clone(), p.stack)).collect();
    let mut log = Log::default();
    let next = generate_next_hand(&players, &stacks, &mut log)?;
    if opt.verbose {
        print_log(&log, 0);
    }
    let next_hand = hand.next(&next);
    if opt.json {
        println!("{}", serde_json::to_string_pretty(&next_hand)?);
    } else {
        println!("{}", format_hand(&next_hand));
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let opt = Opt::from_args();
    match &opt.cmd {
        Command::Settle {
            input,
            segment,
            unit,
            previous_pot,
        } => settle(&opt, input, *segment, *unit, *previous_pot),
        Command::NextHand { input } => next_hand(&opt, input),
        Command::Rotate { input } => rotate(&opt, input),
    }
}
