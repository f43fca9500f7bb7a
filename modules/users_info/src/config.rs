use serde::{Deserialize, Serialize};

/// Configuration for the users_info module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UsersInfoConfig {
    /// Start with the two sample users (ids 1 and 2).
    #[serde(default = "default_seed_sample_data")]
    pub seed_sample_data: bool,
    #[serde(default = "default_max_profile_fields")]
    pub max_profile_fields: usize,
}

impl Default for UsersInfoConfig {
    fn default() -> Self {
        Self {
            seed_sample_data: default_seed_sample_data(),
            max_profile_fields: default_max_profile_fields(),
        }
    }
}

fn default_seed_sample_data() -> bool {
    true
}

fn default_max_profile_fields() -> usize {
    100
}
