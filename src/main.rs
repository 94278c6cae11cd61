use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::{SeedableRng, rngs::StdRng};
use serde::Serialize;

use civicroute::{
    CivicRouteConfig, Coordinate, FieldDispatcher, IssueFilter, IssueLocation, IssueSource,
    JsonFileSource, Priority, SampleIssues, Status, api::AppState, logging, web,
};

#[derive(Parser)]
#[command(name = "civicroute", version, about = "Field dispatch route advisor for civic issue reports")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find the nearest unresolved issue
    Nearest {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// JSON issue file, overrides the configured source
        #[arg(long)]
        issues: Option<PathBuf>,
    },
    /// Plan a greedy nearest-neighbor route over unresolved issues
    Route {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Priorities to include, e.g. High,Emergency
        #[arg(long, value_delimiter = ',')]
        priority: Vec<Priority>,
        /// Include every priority
        #[arg(long, conflicts_with = "priority")]
        all_priorities: bool,
        #[arg(long)]
        issues: Option<PathBuf>,
    },
    /// Look up the region and a display address for a coordinate
    Classify {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lng: f64,
        /// Seed for reproducible address selection
        #[arg(long)]
        seed: Option<u64>,
    },
    /// List issues, optionally filtered by status and priority
    List {
        /// e.g. "In Progress" or in-progress
        #[arg(long)]
        status: Option<Status>,
        #[arg(long)]
        priority: Option<Priority>,
        #[arg(long)]
        issues: Option<PathBuf>,
    },
    /// Show issue counts by status, type and department
    Stats {
        #[arg(long)]
        issues: Option<PathBuf>,
    },
    /// Serve the JSON API
    Serve {
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = CivicRouteConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;
    logging::init(&config.logging, cli.verbose)?;

    let dispatcher = FieldDispatcher::from_config(&config)?;

    match cli.command {
        Command::Nearest { lat, lng, issues } => {
            let issues = load_issues(&config, issues)?;
            let outcome = dispatcher.nearest(Coordinate::new(lat, lng)?, &issues)?;
            if cli.json {
                print_json(&outcome)?;
            } else {
                println!("{}", outcome.message);
                if let Some(issue) = &outcome.issue {
                    print_issue(issue);
                }
            }
        }
        Command::Route {
            lat,
            lng,
            priority,
            all_priorities,
            issues,
        } => {
            let issues = load_issues(&config, issues)?;
            let filter = route_filter(priority, all_priorities);

            let outcome = dispatcher.optimize(Coordinate::new(lat, lng)?, &issues, filter)?;
            if cli.json {
                print_json(&outcome)?;
            } else {
                println!("{}", outcome.message);
                for (n, step) in outcome.plan.steps.iter().enumerate() {
                    println!(
                        "  {}. {} at {} (+{:.2} km)",
                        n + 1,
                        step.issue_id,
                        step.coordinate.format_coordinates(),
                        step.leg_distance_km
                    );
                }
            }
        }
        Command::Classify { lat, lng, seed } => {
            let coordinate = Coordinate::new(lat, lng)?;
            let classification = match seed {
                Some(seed) => dispatcher.locate_with_rng(coordinate, &mut StdRng::seed_from_u64(seed))?,
                None => dispatcher.locate(coordinate)?,
            };

            if cli.json {
                print_json(&classification)?;
            } else {
                println!(
                    "Region: {}",
                    classification.region.as_deref().unwrap_or("unknown")
                );
                println!(
                    "Address: {}",
                    classification.address.as_deref().unwrap_or("not available")
                );
            }
        }
        Command::List {
            status,
            priority,
            issues,
        } => {
            let filter = IssueFilter { status, priority };
            let issues = filter.apply(load_issues(&config, issues)?);
            if cli.json {
                print_json(&issues)?;
            } else if issues.is_empty() {
                println!("No issues match the current filters");
            } else {
                for issue in &issues {
                    print_issue(issue);
                }
            }
        }
        Command::Stats { issues } => {
            let issues = load_issues(&config, issues)?;
            let stats = dispatcher.stats(&issues);
            if cli.json {
                print_json(&stats)?;
            } else {
                println!("Total issues:  {}", stats.total);
                println!("Submitted:     {}", stats.submitted);
                println!("Acknowledged:  {}", stats.acknowledged);
                println!("In progress:   {}", stats.in_progress);
                println!("Resolved:      {}", stats.resolved);
                println!("By type:");
                for (issue_type, count) in &stats.by_type {
                    println!("  {issue_type}: {count}");
                }
                println!("By department:");
                for (department, count) in &stats.by_department {
                    println!("  {department}: {count}");
                }
            }
        }
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            let state = AppState {
                dispatcher,
                source: issue_source(&config, None),
            };
            web::run(&config.server, state).await?;
        }
    }

    Ok(())
}

/// Priorities a route covers; `None` leaves the choice to the configured default
fn route_filter(priority: Vec<Priority>, all_priorities: bool) -> Option<HashSet<Priority>> {
    if all_priorities {
        Some(Priority::ALL.into_iter().collect())
    } else if priority.is_empty() {
        None
    } else {
        Some(priority.into_iter().collect())
    }
}

fn issue_source(config: &CivicRouteConfig, override_path: Option<PathBuf>) -> Box<dyn IssueSource> {
    match override_path.or_else(|| config.issues.file.clone()) {
        Some(path) => Box::new(JsonFileSource::new(path)),
        None => Box::new(SampleIssues),
    }
}

fn load_issues(config: &CivicRouteConfig, override_path: Option<PathBuf>) -> Result<Vec<IssueLocation>> {
    Ok(issue_source(config, override_path).load_issues()?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_issue(issue: &IssueLocation) {
    println!(
        "  {} - {} [{} / {}]",
        issue.id,
        issue.display_type(),
        issue.priority,
        issue.status
    );
    if let Some(address) = &issue.address {
        println!("  Address: {address}");
    }
    println!("  Coordinates: {}", issue.coordinate.format_coordinates());
}
