//! Route Probe
//!
//! Loads a scenario and prints where one unit can move this turn, or its
//! route to a single hex.

use clap::Parser;
use hexmove::map::GameMap;
use hexmove::pathfind::{find_route, reachable_set, ReachableSet, Route};
use hexmove::{Location, Scenario};
use serde::Serialize;
use std::path::PathBuf;
use std::process;

/// Route Probe - inspect unit movement in a scenario file
#[derive(Parser, Debug)]
#[command(name = "route_probe")]
#[command(about = "Print reachable hexes or a single route for a scenario unit")]
struct Args {
    /// Scenario TOML file
    scenario: PathBuf,

    /// Name of the unit to move
    #[arg(long)]
    unit: String,

    /// Destination hex as X,Y; without it the whole reachable set is printed
    #[arg(long, value_parser = parse_location)]
    to: Option<Location>,

    /// Output format: json or grid
    #[arg(long, default_value = "json")]
    format: String,

    /// Enable debug logging
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn parse_location(s: &str) -> Result<Location, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y, got {:?}", s))?;
    let x = x.trim().parse::<i32>().map_err(|e| e.to_string())?;
    let y = y.trim().parse::<i32>().map_err(|e| e.to_string())?;
    Ok(Location::new(x, y))
}

/// JSON output structure
#[derive(Serialize)]
#[serde(untagged)]
enum ProbeResult<'a> {
    Route {
        unit: &'a str,
        from: Location,
        to: Location,
        reachable: bool,
        route: Route,
    },
    Reachable {
        unit: &'a str,
        from: Location,
        moves: i32,
        reachable: ReachableSet,
    },
}

fn main() {
    let args = Args::parse();

    let level = if args.verbose { "hexmove=debug" } else { "hexmove=info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let scenario = match Scenario::load(&args.scenario) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Failed to load scenario '{}': {}", args.scenario.display(), e);
            process::exit(1);
        }
    };

    let Some(placed) = scenario.unit(&args.unit) else {
        eprintln!("No unit named '{}' in scenario", args.unit);
        process::exit(1);
    };

    let ctx = scenario.context();
    let result = match args.to {
        Some(to) => {
            let calc = ctx.calculator(&placed.unit);
            let route = find_route(placed.location, to, placed.unit.moves, &calc);
            tracing::info!(
                "{}: {} -> {} {}",
                placed.name,
                placed.location,
                to,
                if route.is_reachable() { "reachable" } else { "unreachable" }
            );
            ProbeResult::Route {
                unit: &placed.name,
                from: placed.location,
                to,
                reachable: route.is_reachable(),
                route,
            }
        }
        None => {
            let set = reachable_set(&ctx, &placed.unit, placed.location);
            tracing::info!(
                "{}: {} hexes reachable from {}",
                placed.name,
                set.len(),
                placed.location
            );
            ProbeResult::Reachable {
                unit: &placed.name,
                from: placed.location,
                moves: placed.unit.moves,
                reachable: set,
            }
        }
    };

    match args.format.as_str() {
        "json" => match serde_json::to_string_pretty(&result) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Failed to serialize result: {}", e);
                process::exit(1);
            }
        },
        "grid" => print_grid(&scenario, &result),
        other => {
            eprintln!("Unknown format '{}', expected json or grid", other);
            process::exit(2);
        }
    }
}

/// One character per hex: `@` the unit, `#` another unit, a digit for
/// movement left (capped at 9), `*` for hexes on the route, `.` otherwise.
fn print_grid(scenario: &Scenario, result: &ProbeResult<'_>) {
    let width = scenario.map.width() as i32;
    let height = scenario.map.height() as i32;

    for y in 0..height {
        let mut line = String::with_capacity(width as usize * 2);
        for x in 0..width {
            let loc = Location::new(x, y);
            let cell = match result {
                ProbeResult::Route { from, .. } if *from == loc => '@',
                ProbeResult::Reachable { from, .. } if *from == loc => '@',
                _ if scenario.occupancy.is_occupied(loc) => '#',
                ProbeResult::Route { route, .. } if route.steps.contains(&loc) => '*',
                ProbeResult::Reachable { reachable, .. } => match reachable.get(loc) {
                    Some(r) => char::from_digit(r.movement_left.clamp(0, 9) as u32, 10).unwrap_or('9'),
                    None if scenario.map.on_board(loc) => '.',
                    None => ' ',
                },
                _ => '.',
            };
            line.push(cell);
            line.push(' ');
        }
        println!("{:>3} {}", y, line.trim_end());
    }
}
