use dynacom::core::io::StructureFormat;
use dynacom::engine::config as core_config;
use std::path::PathBuf;

/// Fully resolved settings of one `analyze` invocation.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub input_path: PathBuf,
    pub format: Option<StructureFormat>,
    pub report_path: PathBuf,
    pub scores_path: PathBuf,
    pub core_config: core_config::DciConfig,
}
