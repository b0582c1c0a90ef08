//! CLI subcommand handlers.

use crate::Commands;
use crate::ConfigAction;
use anyhow::Context;
use std::path::Path;
use tabfit_ml::algorithms::{KMeansReport, accuracy, summarize_clusters};
use tabfit_ml::config::{config_exists, load_config, workspace_config_path};
use tabfit_ml::{TabfitConfig, predict_label, train_kmeans, train_knn};
use tracing::info;

/// Handle a CLI subcommand.
pub fn handle_command(
    command: Commands,
    workspace: &Path,
    config_file: Option<&Path>,
) -> anyhow::Result<()> {
    match command {
        Commands::Kmeans {
            data,
            clusters,
            seed,
            json,
        } => {
            let mut config = effective_config(workspace, config_file)?;
            if let Some(path) = data {
                config.kmeans.dataset_path = path;
            }
            if let Some(n) = clusters {
                config.kmeans.n_clusters = n;
            }
            if let Some(seed) = seed {
                config.kmeans.random_state = seed;
            }
            config.resolve_paths(workspace);
            handle_kmeans(&config, json)
        }
        Commands::Knn {
            data,
            neighbors,
            point,
            score,
        } => {
            let mut config = effective_config(workspace, config_file)?;
            if let Some(path) = data {
                config.knn.dataset_path = path;
            }
            if let Some(k) = neighbors {
                config.knn.n_neighbors = k;
            }
            config.resolve_paths(workspace);
            handle_knn(&config, &point, score)
        }
        Commands::Config { action } => handle_config(action, workspace, config_file),
    }
}

fn effective_config(
    workspace: &Path,
    config_file: Option<&Path>,
) -> anyhow::Result<TabfitConfig> {
    load_config(Some(workspace), config_file, None).context("Failed to load config")
}

fn handle_kmeans(config: &TabfitConfig, json: bool) -> anyhow::Result<()> {
    let (model, data) = train_kmeans(&config.kmeans, &config.data).with_context(|| {
        format!(
            "k-means on {} failed",
            config.kmeans.dataset_path.display()
        )
    })?;

    let records = data.features()?;
    let report = KMeansReport {
        algorithm: model.algorithm().to_string(),
        rows: data.row_count(),
        columns: data.columns.clone(),
        inertia: model.inertia(&records)?,
        clusters: summarize_clusters(&model),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_kmeans_report(&report));
    }
    Ok(())
}

fn render_kmeans_report(report: &KMeansReport) -> String {
    let mut out = format!(
        "{}\nRows: {}\nInertia: {:.4}\n",
        report.algorithm, report.rows, report.inertia
    );
    for cluster in &report.clusters {
        let centroid = report
            .columns
            .iter()
            .zip(&cluster.centroid)
            .map(|(name, value)| format!("{name}={value:.3}"))
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!(
            "Cluster {}: {} rows, centroid [{}]\n",
            cluster.cluster, cluster.size, centroid
        ));
    }
    out
}

fn handle_knn(config: &TabfitConfig, point: &[f64], score: bool) -> anyhow::Result<()> {
    let (model, encoder) = train_knn(&config.knn, &config.data).with_context(|| {
        format!("k-NN on {} failed", config.knn.dataset_path.display())
    })?;

    // Re-queries every training row.
    if score {
        let training = model.predict(model.records().view())?;
        if let (Some(predicted), Some(truth)) =
            (training.as_slice(), model.targets().as_slice())
        {
            info!(accuracy = accuracy(predicted, truth)?, "Training-set accuracy");
        }
    }

    let label = predict_label(&model, &encoder, point)?;
    print!("{}", render_prediction(&config.knn.label_column, &label));
    Ok(())
}

fn render_prediction(label_column: &str, label: &str) -> String {
    format!("Predicted {label_column}: {label}\n")
}

fn handle_config(
    action: ConfigAction,
    workspace: &Path,
    config_file: Option<&Path>,
) -> anyhow::Result<()> {
    match action {
        ConfigAction::Init => {
            let config_path = workspace_config_path(workspace);
            if config_path.exists() {
                println!(
                    "Configuration file already exists at: {}",
                    config_path.display()
                );
                return Ok(());
            }
            write_default_config(&config_path)?;
            println!(
                "Created default configuration at: {}",
                config_path.display()
            );
            Ok(())
        }
        ConfigAction::Show => {
            if config_file.is_none() && !config_exists(Some(workspace)) {
                info!("No configuration file found, showing defaults");
            }
            let config = effective_config(workspace, config_file)?;
            println!("{}", toml::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

fn write_default_config(config_path: &Path) -> anyhow::Result<()> {
    if let Some(dir) = config_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let toml_str = toml::to_string_pretty(&TabfitConfig::default())?;
    std::fs::write(config_path, toml_str)?;
    Ok(())
}
