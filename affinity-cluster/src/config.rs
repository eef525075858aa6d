use crate::ClusterError;

/// Number of seeds tried when none is configured.
pub const DEFAULT_N_SEEDS: usize = 2;

/// Iteration budget asking the partition finder to iterate until convergence.
pub const RUN_TO_CONVERGENCE: i64 = -1;

/// Settings of a multi-seed clustering run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LeidenClusterConfig {
    /// Number of independent attempts. Attempt `s` (1-based) runs with seed `s * 100`.
    pub n_seeds: usize,
    /// Refinement budget handed unchanged to the partition finder. Negative runs to convergence.
    pub n_leiden_iterations: i64,
    /// Report the quality of every attempt to the observer.
    pub verbose: bool,
}

impl Default for LeidenClusterConfig {
    fn default() -> Self {
        LeidenClusterConfig {
            n_seeds: DEFAULT_N_SEEDS,
            n_leiden_iterations: RUN_TO_CONVERGENCE,
            verbose: false,
        }
    }
}

impl LeidenClusterConfig {
    /// Set the number of seeds.
    pub fn with_n_seeds(mut self, n_seeds: usize) -> Self {
        self.n_seeds = n_seeds;
        self
    }

    /// Set the iteration budget of each attempt.
    pub fn with_n_leiden_iterations(mut self, n_leiden_iterations: i64) -> Self {
        self.n_leiden_iterations = n_leiden_iterations;
        self
    }

    /// Turn per-seed quality reporting on or off.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Reject configurations that can never produce a clustering.
    pub fn validate(&self) -> Result<(), ClusterError> {
        if self.n_seeds == 0 {
            return Err(ClusterError::NoSeeds);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LeidenClusterConfig::default();
        assert_eq!(config.n_seeds, 2);
        assert_eq!(config.n_leiden_iterations, -1);
        assert!(!config.verbose);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_seeds_rejected() {
        let config = LeidenClusterConfig::default().with_n_seeds(0);
        assert!(matches!(config.validate(), Err(ClusterError::NoSeeds)));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_fills_defaults() {
        let config: LeidenClusterConfig = serde_json::from_str(r#"{"n_seeds": 5}"#).unwrap();
        assert_eq!(config, LeidenClusterConfig::default().with_n_seeds(5));
    }
}
