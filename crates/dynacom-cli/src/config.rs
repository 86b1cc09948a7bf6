mod defaults;
mod models;

pub use models::AppConfig;

use crate::cli::AnalyzeArgs;
use crate::error::{CliError, Result};
use defaults::{DefaultsConfig, SCORES_SUFFIX};
use dynacom::engine::config as core_config;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialGnmConfig {
    cutoff: Option<f64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialSelectionConfig {
    chain: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialCommunitiesConfig {
    count: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialOutputConfig {
    report: Option<PathBuf>,
    scores: Option<PathBuf>,
}

/// Settings read from a TOML file; every key is optional.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PartialDciConfig {
    gnm: Option<PartialGnmConfig>,
    selection: Option<PartialSelectionConfig>,
    communities: Option<PartialCommunitiesConfig>,
    output: Option<PartialOutputConfig>,
}

impl PartialDciConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Reads the file named by `--config`, or starts empty when none was given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        path.map_or_else(|| Ok(Self::default()), Self::from_file)
    }

    /// Resolves every setting: command-line flags first, then the file, then defaults.
    ///
    /// `structure_id` names the default score table, `<structure_id>_CH_Score.csv`.
    pub fn merge_with_cli(self, args: &AnalyzeArgs, structure_id: &str) -> Result<AppConfig> {
        let defaults = DefaultsConfig::default();
        let gnm = self.gnm.unwrap_or_default();
        let selection = self.selection.unwrap_or_default();
        let communities = self.communities.unwrap_or_default();
        let output = self.output.unwrap_or_default();

        let core_config = core_config::DciConfigBuilder::new()
            .cutoff(args.cutoff.or(gnm.cutoff).unwrap_or(defaults.cutoff))
            .chain(args.chain.clone().or(selection.chain))
            .n_communities(args.n_communities.or(communities.count))
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        let report_path = args
            .report
            .clone()
            .or(output.report)
            .unwrap_or_else(|| PathBuf::from(defaults.report));
        let scores_path = args
            .scores
            .clone()
            .or(output.scores)
            .unwrap_or_else(|| PathBuf::from(format!("{structure_id}{SCORES_SUFFIX}")));

        Ok(AppConfig {
            input_path: args.file.clone(),
            format: args.format,
            report_path,
            scores_path,
            core_config,
        })
    }
}
