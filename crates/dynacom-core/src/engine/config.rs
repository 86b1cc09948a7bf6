use serde::Deserialize;
use thiserror::Error;

/// Default contact cutoff of the elastic network, in Angstroms.
pub const DEFAULT_CUTOFF: f64 = 7.0;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{parameter}': {reason}")]
    InvalidValue {
        parameter: &'static str,
        reason: String,
    },
}

/// Parameters of a dynamic community analysis.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct DciConfig {
    /// Contact cutoff between alpha-carbons, in Angstroms.
    pub cutoff: f64,
    /// Restrict the analysis to one chain of the first model.
    pub chain: Option<String>,
    /// Cut the tree at exactly this many communities instead of sweeping.
    pub n_communities: Option<usize>,
}

impl Default for DciConfig {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_CUTOFF,
            chain: None,
            n_communities: None,
        }
    }
}

impl DciConfig {
    /// Checks the parameters that do not depend on the structure being analysed.
    ///
    /// The upper bound of `n_communities` is checked against the residue count at run time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.cutoff.is_finite() || self.cutoff <= 0.0 {
            return Err(ConfigError::InvalidValue {
                parameter: "cutoff",
                reason: format!("must be a positive number of Angstroms, got {}", self.cutoff),
            });
        }
        if let Some(k) = self.n_communities {
            if k < 2 {
                return Err(ConfigError::InvalidValue {
                    parameter: "n_communities",
                    reason: format!("must be at least 2, got {k}"),
                });
            }
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct DciConfigBuilder {
    cutoff: Option<f64>,
    chain: Option<String>,
    n_communities: Option<usize>,
}

impl DciConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cutoff(mut self, cutoff: f64) -> Self {
        self.cutoff = Some(cutoff);
        self
    }
    pub fn chain(mut self, chain: Option<String>) -> Self {
        self.chain = chain;
        self
    }
    pub fn n_communities(mut self, n: Option<usize>) -> Self {
        self.n_communities = n;
        self
    }

    pub fn build(self) -> Result<DciConfig, ConfigError> {
        let config = DciConfig {
            cutoff: self.cutoff.ok_or(ConfigError::MissingParameter("cutoff"))?,
            chain: self.chain,
            n_communities: self.n_communities,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_requires_cutoff() {
        let result = DciConfigBuilder::new().build();
        assert_eq!(result, Err(ConfigError::MissingParameter("cutoff")));
    }

    #[test]
    fn builder_accepts_valid_parameters() {
        let config = DciConfigBuilder::new()
            .cutoff(8.5)
            .chain(Some("A".to_string()))
            .n_communities(Some(4))
            .build()
            .unwrap();
        assert_eq!(config.cutoff, 8.5);
        assert_eq!(config.chain.as_deref(), Some("A"));
        assert_eq!(config.n_communities, Some(4));
    }

    #[test]
    fn non_positive_or_non_finite_cutoff_is_rejected() {
        for cutoff in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = DciConfigBuilder::new().cutoff(cutoff).build();
            assert!(matches!(
                result,
                Err(ConfigError::InvalidValue { parameter: "cutoff", .. })
            ));
        }
    }

    #[test]
    fn community_count_below_two_is_rejected() {
        let result = DciConfigBuilder::new().cutoff(7.0).n_communities(Some(1)).build();
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { parameter: "n_communities", .. })
        ));
    }

    #[test]
    fn deserializes_kebab_case_with_defaults() {
        let config: DciConfig = toml::from_str("n-communities = 3").unwrap();
        assert_eq!(config.cutoff, DEFAULT_CUTOFF);
        assert_eq!(config.n_communities, Some(3));
        assert!(config.chain.is_none());

        assert!(toml::from_str::<DciConfig>("radius = 3.0").is_err());
    }
}
