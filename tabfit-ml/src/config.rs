//! Configuration system for tabfit.
//!
//! Uses `figment` for layered configuration: defaults -> config files -> environment -> overrides.
//! Configuration is loaded from the user config directory and/or `.tabfit/config.toml`
//! in the workspace directory.

use crate::error::MlError;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabfitConfig {
    /// CSV parsing options shared by both pipelines.
    #[serde(default)]
    pub data: DataConfig,
    /// K-means clustering pipeline.
    #[serde(default)]
    pub kmeans: KMeansConfig,
    /// K-nearest-neighbors classification pipeline.
    #[serde(default)]
    pub knn: KnnConfig,
}

impl TabfitConfig {
    /// Make relative dataset paths relative to `base` instead of the process cwd.
    pub fn resolve_paths(&mut self, base: &Path) {
        for path in [&mut self.kmeans.dataset_path, &mut self.knn.dataset_path] {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}

/// CSV parsing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Field delimiter.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
        }
    }
}

fn default_delimiter() -> char {
    ','
}

/// K-means configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KMeansConfig {
    /// Unlabeled numeric table; every column is a feature.
    #[serde(default = "default_kmeans_dataset")]
    pub dataset_path: PathBuf,
    #[serde(default = "default_n_clusters")]
    pub n_clusters: usize,
    /// Seed for centroid initialisation.
    #[serde(default = "default_random_state")]
    pub random_state: u64,
    /// Independent initialisations; the lowest-inertia run wins.
    #[serde(default = "default_n_runs")]
    pub n_runs: usize,
    #[serde(default = "default_max_n_iterations")]
    pub max_n_iterations: u64,
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
}

impl Default for KMeansConfig {
    fn default() -> Self {
        Self {
            dataset_path: default_kmeans_dataset(),
            n_clusters: default_n_clusters(),
            random_state: default_random_state(),
            n_runs: default_n_runs(),
            max_n_iterations: default_max_n_iterations(),
            tolerance: default_tolerance(),
        }
    }
}

fn default_kmeans_dataset() -> PathBuf {
    PathBuf::from("data/kmeans_dataset.csv")
}

fn default_n_clusters() -> usize {
    3
}

fn default_random_state() -> u64 {
    42
}

fn default_n_runs() -> usize {
    10
}

fn default_max_n_iterations() -> u64 {
    300
}

fn default_tolerance() -> f64 {
    1e-4
}

/// K-nearest-neighbors configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnnConfig {
    #[serde(default = "default_knn_dataset")]
    pub dataset_path: PathBuf,
    /// Feature columns, in the order prediction points are given.
    #[serde(default = "default_feature_columns")]
    pub feature_columns: Vec<String>,
    /// Categorical target column.
    #[serde(default = "default_label_column")]
    pub label_column: String,
    #[serde(default = "default_n_neighbors")]
    pub n_neighbors: usize,
}

impl Default for KnnConfig {
    fn default() -> Self {
        Self {
            dataset_path: default_knn_dataset(),
            feature_columns: default_feature_columns(),
            label_column: default_label_column(),
            n_neighbors: default_n_neighbors(),
        }
    }
}

fn default_knn_dataset() -> PathBuf {
    PathBuf::from("data/knn_dataset.csv")
}

fn default_feature_columns() -> Vec<String> {
    vec!["Height".to_string(), "Weight".to_string()]
}

fn default_label_column() -> String {
    "Gender".to_string()
}

fn default_n_neighbors() -> usize {
    3
}

fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "tabfit", "tabfit")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Path of the workspace-level config file.
pub fn workspace_config_path(workspace: &Path) -> PathBuf {
    workspace.join(".tabfit").join("config.toml")
}

/// Load configuration from layered sources.
///
/// Priority (highest to lowest):
/// 1. Explicit overrides (passed as argument)
/// 2. Environment variables (prefixed with `TABFIT_`)
/// 3. An explicit config file (`config_file`)
/// 4. Workspace-local config (`.tabfit/config.toml`)
/// 5. User config (`~/.config/tabfit/config.toml`)
/// 6. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    config_file: Option<&Path>,
    overrides: Option<&TabfitConfig>,
) -> Result<TabfitConfig, MlError> {
    let mut figment = Figment::from(Serialized::defaults(TabfitConfig::default()));

    if let Some(user_config) = user_config_path() {
        if user_config.exists() {
            figment = figment.merge(Toml::file(&user_config));
        }
    }

    if let Some(ws) = workspace {
        let ws_config = workspace_config_path(ws);
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    if let Some(path) = config_file {
        if !path.exists() {
            return Err(MlError::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        figment = figment.merge(Toml::file(path));
    }

    // TABFIT_KMEANS__N_CLUSTERS, TABFIT_KNN__N_NEIGHBORS, etc.
    figment = figment.merge(Env::prefixed("TABFIT_").split("__"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    Ok(figment.extract()?)
}

/// Check whether any tabfit configuration file exists (user-level or workspace-level).
pub fn config_exists(workspace: Option<&Path>) -> bool {
    if user_config_path().is_some_and(|p| p.exists()) {
        return true;
    }
    workspace.is_some_and(|ws| workspace_config_path(ws).exists())
}
