use clap::{Parser, ValueEnum};
use log::info;
use std::fs;
use std::path::PathBuf;

use tsp_bnb::{
    solve_local_cluster, solve_parallel, solve_sequential, ClusterConfig, Error, ParallelConfig,
    Problem, ProblemBuilder, Result, Solution,
};

#[derive(Parser)]
#[command(name = "tsp-bnb")]
#[command(about = "Exact TSP solver by branch and bound")]
#[command(version)]
struct Args {
    /// Input file: a "nCities nRoads" header, then one "cityA cityB cost"
    /// line per road
    input: PathBuf,

    /// Prune every tour costing this much or more
    max_tour_cost: f64,

    /// Which engine runs the search
    #[arg(long, value_enum, default_value = "sequential")]
    engine: Engine,

    /// Worker threads for the threads engine (defaults to the CPU count)
    #[arg(long)]
    workers: Option<usize>,

    /// Ranks for the cluster engine, coordinator included
    #[arg(long, default_value = "4")]
    ranks: usize,

    /// Seed nodes streamed to each cluster worker before the event loop
    #[arg(long)]
    seed_batch: Option<usize>,
}

/// CLI engine selection
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Engine {
    /// Single thread, one priority queue
    Sequential,
    /// Shared-memory worker threads
    Threads,
    /// In-process cluster of message-passing ranks
    Cluster,
}

/// Parse the road-list format: a `nCities nRoads` header followed by one
/// `cityA cityB cost` line per road. Blank lines are ignored.
fn parse_problem(text: &str) -> Result<Problem> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let header = lines
        .next()
        .ok_or_else(|| Error::invalid_input("missing header line"))?;
    let (n_cities, n_roads) = {
        let mut fields = header.split_whitespace();
        let n_cities = parse_field::<usize>(fields.next(), "city count")?;
        let n_roads = parse_field::<usize>(fields.next(), "road count")?;
        (n_cities, n_roads)
    };

    let mut builder = ProblemBuilder::new(n_cities)?;
    for index in 0..n_roads {
        let line = lines.next().ok_or_else(|| {
            Error::invalid_input(format!("expected {n_roads} roads, got {index}"))
        })?;
        let mut fields = line.split_whitespace();
        let a = parse_field::<usize>(fields.next(), "road endpoint")?;
        let b = parse_field::<usize>(fields.next(), "road endpoint")?;
        let cost = parse_field::<f64>(fields.next(), "road cost")?;
        builder = builder.road(a, b, cost)?;
    }
    Ok(builder.build())
}

fn parse_field<T: std::str::FromStr>(field: Option<&str>, what: &str) -> Result<T> {
    field
        .ok_or_else(|| Error::invalid_input(format!("missing {what}")))?
        .parse()
        .map_err(|_| Error::invalid_input(format!("malformed {what}")))
}

fn run(args: &Args) -> Result<Solution> {
    let text = fs::read_to_string(&args.input)
        .map_err(|error| Error::invalid_input(format!("{}: {error}", args.input.display())))?;
    let problem = parse_problem(&text)?;
    info!(
        "{} cities, engine {:?}, ceiling {}",
        problem.n_cities(),
        args.engine,
        args.max_tour_cost
    );

    match args.engine {
        Engine::Sequential => Ok(solve_sequential(&problem, args.max_tour_cost)),
        Engine::Threads => {
            let mut config = ParallelConfig::default();
            if let Some(workers) = args.workers {
                config = config.with_workers(workers);
            }
            Ok(solve_parallel(&problem, args.max_tour_cost, &config))
        }
        Engine::Cluster => {
            let mut config = ClusterConfig::default();
            if let Some(batch) = args.seed_batch {
                config = config.with_seed_batch_per_worker(batch);
            }
            solve_local_cluster(&problem, args.max_tour_cost, args.ranks, &config)
        }
    }
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    match run(&args) {
        Ok(solution) => match solution.tour() {
            Some(tour) => {
                println!("{:.1}", solution.cost());
                let cities: Vec<String> = tour.iter().map(|city| city.to_string()).collect();
                println!("{} 0", cities.join(" "));
            }
            None => println!("NO SOLUTION"),
        },
        Err(error) => {
            eprintln!("Error: {error}");
            std::process::exit(1);
        }
    }
}
