//! tabfit CLI — fit k-means or k-NN on a CSV table and print the result.

mod commands;

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// tabfit: off-the-shelf clustering and classification on CSV files
#[derive(Parser, Debug)]
#[command(name = "tabfit", version, about, long_about = None)]
struct Cli {
    /// Workspace directory; relative dataset paths resolve against it
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Extra configuration file, merged over the user and workspace configs
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Cluster an unlabeled numeric table with k-means
    Kmeans {
        /// Dataset path (default: data/kmeans_dataset.csv)
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Number of clusters
        #[arg(short = 'k', long)]
        clusters: Option<usize>,
        /// Seed for centroid initialisation
        #[arg(long)]
        seed: Option<u64>,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Fit a k-nearest-neighbors classifier and classify one point
    Knn {
        /// Dataset path (default: data/knn_dataset.csv)
        #[arg(short, long)]
        data: Option<PathBuf>,
        /// Number of neighbors
        #[arg(short = 'k', long)]
        neighbors: Option<usize>,
        /// Point to classify, one value per feature column
        #[arg(
            long,
            value_delimiter = ',',
            allow_hyphen_values = true,
            default_values_t = [168.0, 60.0]
        )]
        point: Vec<f64>,
        /// Log the classifier's accuracy on its own training rows
        #[arg(long)]
        score: bool,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(clap::Subcommand, Debug)]
enum ConfigAction {
    /// Create default configuration file
    Init,
    /// Show the effective configuration
    Show,
}

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let filter = match cli.verbose {
        _ if cli.quiet => "error",
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    // Logs go to stderr; stdout carries results only
    let text_layer = (!cli.log_json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .with_filter(EnvFilter::new(filter))
    });
    let json_layer = cli.log_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_filter(EnvFilter::new(filter))
    });

    tracing_subscriber::registry()
        .with(text_layer)
        .with(json_layer)
        .init();

    let workspace = cli
        .workspace
        .canonicalize()
        .unwrap_or_else(|_| cli.workspace.clone());

    commands::handle_command(cli.command, &workspace, cli.config.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_knn_default_point() {
        let cli = Cli::parse_from(["tabfit", "knn"]);
        match cli.command {
            Commands::Knn {
                point, data, score, ..
            } => {
                assert_eq!(point, vec![168.0, 60.0]);
                assert!(data.is_none());
                assert!(!score);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_kmeans_flags() {
        let cli = Cli::parse_from(["tabfit", "-vv", "kmeans", "-k", "4", "--seed", "7"]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Kmeans {
                clusters, seed, ..
            } => {
                assert_eq!(clusters, Some(4));
                assert_eq!(seed, Some(7));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_knn_score_flag() {
        let cli = Cli::parse_from(["tabfit", "knn", "--score", "--point", "180,80"]);
        match cli.command {
            Commands::Knn { point, score, .. } => {
                assert!(score);
                assert_eq!(point, vec![180.0, 80.0]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["tabfit", "-q", "-v", "knn"]).is_err());
        let cli = Cli::try_parse_from(["tabfit", "-q", "knn"]).unwrap();
        assert!(cli.quiet);
        assert_eq!(cli.verbose, 0);
    }
}
