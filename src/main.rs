use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use itertools::Itertools;
use serde::Deserialize;
use tracing::Level;

use oyster_fares::{
    Card, FareTable, StationRegistry, TransitSystem, format_minor,
    station::{BUS_STOP_EARLS_COURT, STATION_EARLS_COURT, STATION_HAMMERSMITH, STATION_HOLBORN},
};

/// Replay a sequence of taps on a new card and print the travel summary.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON station registry. Uses the builtin London stations if not provided.
    #[arg(long)]
    stations: Option<PathBuf>,

    /// JSON fare table. Uses the builtin fares if not provided.
    #[arg(long)]
    fares: Option<PathBuf>,

    /// JSON list of taps. Replays the demo journeys if not provided.
    #[arg(long)]
    taps: Option<PathBuf>,

    /// Initial top up in pence
    #[arg(long, default_value_t = 3000)]
    top_up: i64,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "tap", rename_all = "snake_case")]
enum Tap {
    EnterBus { stop: String },
    EnterTube { station: String },
    ExitTube { station: String },
}

impl Tap {
    fn apply(&self, system: &mut TransitSystem, card_id: &str) -> oyster_fares::Result<()> {
        match self {
            Tap::EnterBus { stop } => system.enter_bus(stop, card_id),
            Tap::EnterTube { station } => system.enter_tube(station, card_id),
            Tap::ExitTube { station } => system.exit_tube(station, card_id),
        }
    }
}

fn demo_taps() -> Vec<Tap> {
    vec![
        Tap::EnterTube {
            station: STATION_HOLBORN.to_owned(),
        },
        Tap::ExitTube {
            station: STATION_EARLS_COURT.to_owned(),
        },
        Tap::EnterBus {
            stop: BUS_STOP_EARLS_COURT.to_owned(),
        },
        Tap::EnterTube {
            station: STATION_EARLS_COURT.to_owned(),
        },
        Tap::ExitTube {
            station: STATION_HAMMERSMITH.to_owned(),
        },
    ]
}

fn load_taps(path: &Path) -> anyhow::Result<Vec<Tap>> {
    let file = std::fs::File::open(path).with_context(|| format!("opening {path:?}"))?;
    serde_json::from_reader(file).with_context(|| format!("parsing taps from {path:?}"))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let stations = match &args.stations {
        Some(path) => StationRegistry::load(path)?,
        None => StationRegistry::london(),
    };
    let fares = match &args.fares {
        Some(path) => FareTable::load(path)?,
        None => FareTable::default(),
    };
    let taps = match &args.taps {
        Some(path) => load_taps(path)?,
        None => demo_taps(),
    };

    let card = Card::new();
    let card_id = card.id.clone();
    let mut system = TransitSystem::new(stations, fares, [card])?;
    system.top_up(&card_id, args.top_up)?;

    for tap in &taps {
        tap.apply(&mut system, &card_id)
            .with_context(|| format!("{tap:?}"))?;
    }

    let card = system.card(&card_id)?;
    println!("Card balance: {}", format_minor(card.balance()));
    println!("Travel Summary:");
    println!("{}", card.journeys().iter().map(|j| j.describe()).join("\n"));

    Ok(())
}
