//! Injector configuration.
//!
//! ```
//! use ligand_container::config::InjectorConfig;
//!
//! let config = InjectorConfig::default();
//! assert_eq!(config.max_depth, 128);
//! assert!(config.eager_bootstrap);
//! ```

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InjectorConfig {
    /// Longest resolution chain before failing with `DepthExceeded`.
    pub max_depth: usize,
    /// Run the eager singleton passes when the injector is built.
    pub eager_bootstrap: bool,
}

impl Default for InjectorConfig {
    fn default() -> Self {
        Self {
            max_depth: 128,
            eager_bootstrap: true,
        }
    }
}
