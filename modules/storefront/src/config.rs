use serde::{Deserialize, Serialize};

/// Configuration for the storefront module (`modules.storefront` in YAML)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InventoryConfig {
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
    /// Minimum similarity ratio for the fuzzy search fallback.
    #[serde(default = "default_fuzzy_cutoff")]
    pub fuzzy_cutoff: f64,
    #[serde(default = "default_fuzzy_max_candidates")]
    pub fuzzy_max_candidates: usize,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            max_name_length: default_max_name_length(),
            fuzzy_cutoff: default_fuzzy_cutoff(),
            fuzzy_max_candidates: default_fuzzy_max_candidates(),
        }
    }
}

fn default_max_name_length() -> usize {
    200
}

fn default_fuzzy_cutoff() -> f64 {
    0.5
}

fn default_fuzzy_max_candidates() -> usize {
    5
}
