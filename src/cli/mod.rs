use crate::{
    BudgetAdvisor, BudgetRequest, ItineraryGenerator, PlannerError, RequestSchema, Result,
    SourceConfig, TripWindow, Validator,
};
use chrono::{Local, NaiveDateTime};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn command() -> Command {
    Command::new("trip-engine")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generate trip itineraries and review travel budgets")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("itinerary")
                .about("Generate a day-by-day itinerary from a trip request")
                .arg(
                    Arg::new("request")
                        .help("Path to the trip request JSON")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("seed")
                        .short('s')
                        .long("seed")
                        .value_name("SEED")
                        .help("Fix the shuffle seed for a reproducible schedule")
                        .value_parser(value_parser!(u64)),
                )
                .arg(
                    Arg::new("offline")
                        .long("offline")
                        .help("Use the static activity table and skip the weather forecast")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("text")
                        .long("text")
                        .help("Print a readable schedule instead of JSON")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("budget")
                .about("Analyze expenses against a budget and suggest adjustments")
                .arg(
                    Arg::new("request")
                        .help("Path to the budget request JSON")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("now")
                        .long("now")
                        .value_name("DATETIME")
                        .help("Reference time for the pace projection, e.g. 2025-06-02T12:00:00"),
                ),
        )
        .subcommand(
            Command::new("schema")
                .about("Print the JSON Schema of a request document")
                .arg(
                    Arg::new("kind")
                        .required(true)
                        .index(1)
                        .value_parser(["itinerary", "budget"]),
                ),
        )
}

/// CLI entry point for the trip-engine binary
pub async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match command().get_matches().subcommand() {
        Some(("itinerary", matches)) => itinerary(matches).await,
        Some(("budget", matches)) => budget(matches),
        Some(("schema", matches)) => schema(matches),
        _ => Err(PlannerError::Unknown("unrecognized subcommand".to_string())),
    }
}

fn read_request<T: RequestSchema>(matches: &ArgMatches) -> Result<T> {
    let path = matches
        .get_one::<String>("request")
        .ok_or_else(|| PlannerError::Validation("request path is required".to_string()))?;
    let raw = fs::read_to_string(path)?;
    Validator::Strict.decode::<T>(&raw)
}

async fn itinerary(matches: &ArgMatches) -> Result<()> {
    let trip: TripWindow = read_request(matches)?;
    trip.validate()?;

    let mut generator = if matches.get_flag("offline") {
        ItineraryGenerator::offline()
    } else {
        ItineraryGenerator::from_config(&SourceConfig::from_env()?)?
    };
    if let Some(seed) = matches.get_one::<u64>("seed") {
        generator = generator.with_seed(*seed);
    }

    info!(
        target: "tripengine::itinerary",
        destination = %trip.destination,
        days = trip.total_days(),
        "generating itinerary"
    );
    let itinerary = generator.generate(&trip).await;

    if matches.get_flag("text") {
        println!("{}", itinerary.render_text());
    } else {
        println!("{}", serde_json::to_string_pretty(&itinerary)?);
    }
    Ok(())
}

fn budget(matches: &ArgMatches) -> Result<()> {
    let request: BudgetRequest = read_request(matches)?;
    request.validate()?;

    let now = match matches.get_one::<String>("now") {
        Some(raw) => raw.parse::<NaiveDateTime>().map_err(|err| {
            PlannerError::Validation(format!("--now must look like 2025-06-02T12:00:00: {err}"))
        })?,
        None => Local::now().naive_local(),
    };

    let report = BudgetAdvisor::default().review(&request, now);
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

fn schema(matches: &ArgMatches) -> Result<()> {
    let handle = match matches.get_one::<String>("kind").map(String::as_str) {
        Some("budget") => BudgetRequest::schema(),
        _ => TripWindow::schema(),
    };
    println!("{}", serde_json::to_string_pretty(handle.schema_json())?);
    Ok(())
}
