//! Command line front end: load or generate orders, plan routes, write reports.

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::{value_parser, Arg, ArgGroup, ArgMatches, Command};
use rand::rngs::StdRng;
use rand::SeedableRng;

use delivery_router::export::write_outputs;
use delivery_router::io::{load_points, random_points};
use delivery_router::{DeliveryPlanner, LibTracer, PipelineConfig, RoutingError};

const DATA_ARG_NAME: &str = "data";
const RANDOM_ARG_NAME: &str = "random";
const DOCS_ARG_NAME: &str = "docs";
const K_ARG_NAME: &str = "k";
const SEED_ARG_NAME: &str = "seed";
const CONFIG_ARG_NAME: &str = "config";
const LOG_ARG_NAME: &str = "log";
const FLAME_ARG_NAME: &str = "flame";

fn get_app() -> Command {
    Command::new("delivery-router")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Groups delivery orders into vehicles and routes them over a grid map")
        .arg(
            Arg::new(DATA_ARG_NAME)
                .help("CSV file with id,x,y[,demand] columns")
                .long(DATA_ARG_NAME)
                .short('d')
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new(RANDOM_ARG_NAME)
                .help("Generates this many random orders instead of reading a file")
                .long(RANDOM_ARG_NAME)
                .short('r')
                .value_parser(value_parser!(usize)),
        )
        .group(ArgGroup::new("input").args([DATA_ARG_NAME, RANDOM_ARG_NAME]).required(true))
        .arg(
            Arg::new(DOCS_ARG_NAME)
                .help("Directory receiving routes.json, routes_report.html and routes_diagram.svg")
                .long(DOCS_ARG_NAME)
                .default_value("docs")
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new(K_ARG_NAME)
                .help("Number of vehicles (defaults to one per ten orders)")
                .long(K_ARG_NAME)
                .short('k')
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new(SEED_ARG_NAME)
                .help("Seed for centroid initialization and random orders")
                .long(SEED_ARG_NAME)
                .short('s')
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new(CONFIG_ARG_NAME)
                .help("JSON file with pipeline settings")
                .long(CONFIG_ARG_NAME)
                .short('c')
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new(LOG_ARG_NAME)
                .help("File receiving the full debug log")
                .long(LOG_ARG_NAME)
                .value_parser(value_parser!(PathBuf)),
        )
        .arg(
            Arg::new(FLAME_ARG_NAME)
                .help("File receiving folded stacks for flame graphs")
                .long(FLAME_ARG_NAME)
                .value_parser(value_parser!(PathBuf)),
        )
}

fn read_config(matches: &ArgMatches) -> Result<PipelineConfig, RoutingError> {
    let config = match matches.get_one::<PathBuf>(CONFIG_ARG_NAME) {
        Some(path) => PipelineConfig::from_json(&fs::read_to_string(path)?)?,
        None => PipelineConfig::default(),
    };
    Ok(config.with_overrides(
        matches.get_one::<usize>(K_ARG_NAME).copied(),
        matches.get_one::<u64>(SEED_ARG_NAME).copied(),
    ))
}

fn run(matches: &ArgMatches) -> Result<(), RoutingError> {
    let _tracer = LibTracer::init(
        matches.get_one::<PathBuf>(LOG_ARG_NAME).map(PathBuf::as_path),
        matches.get_one::<PathBuf>(FLAME_ARG_NAME).map(PathBuf::as_path),
    )?;

    let config = read_config(matches)?;
    config.validate()?;

    let points = match (matches.get_one::<PathBuf>(DATA_ARG_NAME), matches.get_one::<usize>(RANDOM_ARG_NAME)) {
        (Some(path), _) => load_points(path)?,
        (None, Some(count)) => {
            let mut rng = StdRng::seed_from_u64(config.seed);
            random_points(*count, config.width, config.height, config.cell_size, &mut rng)
        }
        (None, None) => unreachable!("clap requires one input"),
    };

    let plan = DeliveryPlanner::new(config.clone()).plan(&points)?;
    let docs = matches.get_one::<PathBuf>(DOCS_ARG_NAME).cloned().unwrap_or_else(|| PathBuf::from("docs"));
    for path in write_outputs(&plan, &points, &config, docs)? {
        println!("{}", path.display());
    }

    Ok(())
}

fn main() {
    let matches = get_app().get_matches();

    if let Err(err) = run(&matches) {
        eprintln!("error: {}", err);
        process::exit(1);
    }
}
