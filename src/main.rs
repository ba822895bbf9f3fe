//! CLI interface for the route planner

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use georoute::catalog::{build_index, load_places};
use georoute::distance::sort_by_distance;
use georoute::{
    haversine_km, solve_exhaustive, solve_with_deadline, CostMatrix, GeoIndex, HaversineProvider,
    PlannerConfig, PlanningPipeline, Point, RouteSolver, SpatialIndex, TravelMode,
};

/// Largest instance `solve --verify` will brute-force.
const MAX_VERIFY_STOPS: usize = 10;

#[derive(Parser)]
#[command(name = "georoute")]
#[command(about = "Find nearby places and order them into the shortest round trip", long_about = None)]
struct Cli {
    /// JSON file with an array of {name, lat, lon, category} places
    #[arg(long, global = true)]
    places: Option<PathBuf>,

    /// JSON planner config; missing keys fall back to defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all places in ascending latitude
    List,
    /// Find places within a radius
    Search {
        /// Center as "lat,lon"
        #[arg(long)]
        at: String,
        /// Radius in kilometers
        #[arg(short, long, default_value = "1.0")]
        radius: f64,
    },
    /// Solve a cost matrix given as a JSON array of rows (null = no edge)
    Solve {
        /// Path to the matrix file
        matrix: PathBuf,
        /// Cross-check against exhaustive enumeration (small instances only)
        #[arg(long)]
        verify: bool,
        /// Abandon the search after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Plan a round trip through places near a starting point
    Plan {
        /// Start as "lat,lon"
        #[arg(long)]
        from: String,
        /// walking or driving
        #[arg(long, default_value = "walking")]
        mode: TravelMode,
        /// Search radius in kilometers (defaults to the mode's configured radius)
        #[arg(short, long)]
        radius: Option<f64>,
        /// Multiplier applied to straight-line distances
        #[arg(long, default_value = "1.0")]
        detour: f64,
    },
}

fn open_index(places: Option<&Path>, config: &PlannerConfig) -> Result<GeoIndex<String>> {
    let path = places.context("--places is required for this command")?;
    let places = load_places(path)?;
    Ok(build_index(&places, config.pruning)?)
}

fn load_matrix(path: &Path) -> Result<CostMatrix> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let rows: Vec<Vec<Option<f64>>> = serde_json::from_str(&text)?;
    Ok(CostMatrix::from_optional_rows(rows)?)
}

async fn run_solve(path: &Path, verify: bool, timeout_ms: Option<u64>) -> Result<()> {
    let matrix = load_matrix(path)?;

    let (tour, stats) = match timeout_ms {
        Some(ms) => solve_with_deadline(matrix.clone(), Duration::from_millis(ms)).await?,
        None => RouteSolver::new().solve_with_stats(&matrix)?,
    };

    println!("Optimal tour over {} stops:", matrix.size());
    let order: Vec<String> = tour.order.iter().map(|i| i.to_string()).collect();
    println!("  order: {}", order.join(" -> "));
    println!("  cost:  {:.4}", tour.total_cost);
    println!(
        "  search: {} expanded, {} pruned, peak frontier {}",
        stats.expanded, stats.pruned, stats.peak_frontier
    );

    if verify {
        if matrix.size() > MAX_VERIFY_STOPS {
            log::warn!(
                "skipping verification: {} stops exceeds {}",
                matrix.size(),
                MAX_VERIFY_STOPS
            );
        } else {
            let reference = solve_exhaustive(&matrix)?;
            if (reference.total_cost - tour.total_cost).abs() > 1e-9 {
                anyhow::bail!(
                    "verification failed: exhaustive cost {:.4}, branch-and-bound cost {:.4}",
                    reference.total_cost,
                    tour.total_cost
                );
            }
            println!("  verified against exhaustive search");
        }
    }
    Ok(())
}

fn run_list(index: &GeoIndex<String>) {
    if index.is_empty() {
        println!("No places loaded");
        return;
    }
    println!("Places ({} total):", index.len());
    for (point, name) in index.iter() {
        println!("  ({:.5}, {:.5}) {}", point.latitude(), point.longitude(), name);
    }
}

fn run_search(index: &GeoIndex<String>, at: &str, radius: f64) -> Result<()> {
    let center = Point::from_str(at)?;
    let mut results = index.search_radius(&center, radius);
    sort_by_distance(&center, &mut results);

    if results.is_empty() {
        println!("No places within {} km", radius);
    } else {
        println!("{} places within {} km:", results.len(), radius);
        for (i, (point, name)) in results.iter().enumerate() {
            println!(
                "{}. {} ({:.3} km)",
                i + 1,
                name,
                haversine_km(&center, point)
            );
        }
    }
    Ok(())
}

fn run_plan(
    index: &GeoIndex<String>,
    config: PlannerConfig,
    from: &str,
    mode: TravelMode,
    radius: Option<f64>,
    detour: f64,
) -> Result<()> {
    let origin = Point::from_str(from)?;
    let provider = HaversineProvider::new(detour)?;
    let pipeline = PlanningPipeline::with_config(provider, config)?.with_mode(mode);
    let tour = pipeline.plan_near(index, &origin, radius)?;

    println!("Route ({}, {} stops):", mode, tour.stops.len());
    for (i, stop) in tour.stops.iter().enumerate() {
        println!("{}. {}", i + 1, stop);
    }
    println!("Total: {:.2} km", tour.total_cost);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| writeln!(buf, "[{:5}] {}", record.level(), record.args()))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => PlannerConfig::from_json_file(path)?,
        None => PlannerConfig::default(),
    };
    let places = cli.places.as_deref();

    match cli.command {
        Commands::List => {
            let index = open_index(places, &config)?;
            run_list(&index);
        }
        Commands::Search { at, radius } => {
            let index = open_index(places, &config)?;
            run_search(&index, &at, radius)?;
        }
        Commands::Solve {
            matrix,
            verify,
            timeout_ms,
        } => {
            run_solve(&matrix, verify, timeout_ms).await?;
        }
        Commands::Plan {
            from,
            mode,
            radius,
            detour,
        } => {
            let index = open_index(places, &config)?;
            run_plan(&index, config, &from, mode, radius, detour)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solve_parses_without_places() {
        let cli = Cli::try_parse_from(["georoute", "solve", "matrix.json", "--verify"]).unwrap();
        assert!(cli.places.is_none());
        assert!(matches!(
            cli.command,
            Commands::Solve {
                verify: true,
                timeout_ms: None,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_run_solve_needs_no_index() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "[[null, 10, 15, 20], [10, null, 35, 25], [15, 35, null, 30], [20, 25, 30, null]]"
        )
        .unwrap();

        run_solve(file.path(), true, None).await.unwrap();
        run_solve(file.path(), false, Some(5_000)).await.unwrap();
    }

    #[test]
    fn test_index_commands_require_places() {
        let err = open_index(None, &PlannerConfig::default()).unwrap_err();
        assert!(err.to_string().contains("--places"));
    }
}
