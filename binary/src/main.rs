use std::{error::Error, path::PathBuf, time::Instant};

use alpha_discovery::{
    alpha_discover_petri_net_with_activity_key, import_xes_file, replay_log, EventLog,
    Importable, PetriNet, XESImportOptions, ACTIVITY_NAME,
};
use clap::Parser;

/// Discover a Petri net from an event log with the Alpha algorithm
#[derive(Parser, Debug)]
#[command(name = "alpha-discovery")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Event log to discover from (.xes, .xes.gz or .json)
    log: PathBuf,

    /// Event attribute holding the activity label
    #[arg(short, long, default_value = ACTIVITY_NAME)]
    activity_key: String,

    /// Date format tried first when parsing XES dates (chrono strftime syntax)
    #[arg(long)]
    date_format: Option<String>,

    /// Replay every case on the discovered net and report how many fit
    #[arg(short, long)]
    replay: bool,
}

fn import_log(cli: &Cli) -> Result<EventLog, Box<dyn Error>> {
    let path = cli.log.to_string_lossy();
    if path.ends_with(".xes") || path.ends_with(".xes.gz") {
        let options = XESImportOptions {
            date_format: cli.date_format.clone(),
            ..XESImportOptions::default()
        };
        Ok(import_xes_file(&cli.log, &options)?)
    } else {
        Ok(EventLog::import_from_path(&cli.log)?)
    }
}

fn transition_names(net: &PetriNet, ids: &[alpha_discovery::TransitionID]) -> Vec<String> {
    ids.iter()
        .filter_map(|t| net.transition_name(*t))
        .map(str::to_string)
        .collect()
}

fn print_net(net: &PetriNet) {
    println!("Places ({}):", net.num_places());
    for p in net.places() {
        println!(
            "  {}: {:?} -> {:?} (tokens: {})",
            p,
            transition_names(net, &net.preset_of_place(p)),
            transition_names(net, &net.postset_of_place(p)),
            net.get_tokens(p)
        );
    }
    println!("Transitions ({}):", net.num_transitions());
    for (id, t) in net.transitions() {
        println!("  {}: {}", id, t.name);
    }
    println!("Edges: {}", net.num_edges());
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();
    log::debug!("{:?}", cli);

    let now = Instant::now();
    let event_log = import_log(&cli)?;
    println!(
        "Imported log with {} cases and {} events in {:#?}",
        event_log.num_cases(),
        event_log.num_events(),
        now.elapsed()
    );

    let now = Instant::now();
    let net = alpha_discover_petri_net_with_activity_key(&event_log, &cli.activity_key)?;
    println!("Discovered Petri net in {:#?}", now.elapsed());
    print_net(&net);

    if cli.replay {
        let summary = replay_log(&net, &event_log, &cli.activity_key);
        println!(
            "Replay: {} fitting, {} non-fitting cases (fitness {:.4})",
            summary.fitting_cases,
            summary.non_fitting_cases,
            summary.fitness()
        );
    }
    Ok(())
}
