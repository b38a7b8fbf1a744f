//! Path search over a multi-layer ASCII layout.
//!
//! Run: cargo run --bin navdemo -- [--layout FILE] [--config FILE] [START END]
//!
//! START and END are position literals such as `"<1, 1, 0>"`. Without a
//! layout file the built-in two-layer layout is used. The config file is JSON:
//! `{"search": {"max_expansions": 500}, "cost": {"heuristic_weight": 1.0}, "adjacency": "All"}`.

use std::error::Error;

use tilenav_core::Pos;
use tilenav_demos::{DEFAULT_LAYOUT, DemoConfig, Layout};
use tilenav_paths::{GraphSearch, NavMapSearch};

const DEFAULT_START: &str = "<1, 1, 0>";
const DEFAULT_END: &str = "<3, 3, 1>";

struct Args {
    layout: Option<String>,
    config: Option<String>,
    start: Pos,
    end: Pos,
}

fn parse_args() -> Result<Args, Box<dyn Error>> {
    let mut layout = None;
    let mut config = None;
    let mut positional = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--layout" => layout = Some(args.next().ok_or("--layout needs a file")?),
            "--config" => config = Some(args.next().ok_or("--config needs a file")?),
            _ => positional.push(arg),
        }
    }
    let (start, end): (Pos, Pos) = match positional.as_slice() {
        [] => (DEFAULT_START.parse()?, DEFAULT_END.parse()?),
        [start, end] => (start.parse()?, end.parse()?),
        _ => return Err("expected both START and END positions, or neither".into()),
    };
    Ok(Args {
        layout,
        config,
        start,
        end,
    })
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = parse_args()?;
    let text = match &args.layout {
        Some(path) => std::fs::read_to_string(path)?,
        None => DEFAULT_LAYOUT.to_string(),
    };
    let config: DemoConfig = match &args.config {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => DemoConfig::default(),
    };
    log::debug!("config: {config:?}");

    let layout = Layout::parse(&text)?;
    let map = layout.build_map(config.adjacency);
    let mut engine = GraphSearch::with_config(config.search);
    let search = NavMapSearch::with_config(&map, config.cost);

    match search.find_path(&mut engine, args.start, args.end) {
        Some(path) => {
            println!("{}", layout.render(&path.positions));
            println!();
            println!(
                "{} -> {}: {} steps, cost {:.2}",
                args.start,
                args.end,
                path.positions.len().saturating_sub(1),
                path.cost
            );
        }
        None => {
            println!("{}", layout.render(&[]));
            println!();
            println!("no path from {} to {}", args.start, args.end);
        }
    }
    let stats = engine.stats();
    log::info!(
        "expanded {} nodes, opened {}, skipped {} closed and {} worse candidates",
        stats.expanded,
        stats.opened,
        stats.skipped_closed,
        stats.skipped_worse
    );
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
