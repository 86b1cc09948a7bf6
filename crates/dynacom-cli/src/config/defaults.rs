use dynacom::engine::config::DEFAULT_CUTOFF;

pub const SCORES_SUFFIX: &str = "_CH_Score.csv";

pub struct DefaultsConfig {
    pub cutoff: f64,
    pub report: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            report: "DCI_pymol_output.txt".to_string(),
        }
    }
}
