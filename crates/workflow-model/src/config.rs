//! Configuration for the workflow model

use serde::{Deserialize, Serialize};

/// Default values for [`ModelConfig`]
pub mod defaults {
    /// Separator between a base id and its disambiguating number
    pub const ID_SUFFIX_SEPARATOR: char = '_';
    /// Step id used when a process id has no usable characters
    pub const STEP_ID: &str = "step";
}

/// Settings that shape generated identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelConfig {
    /// Separator placed before the numeric suffix of a disambiguated id
    /// (`tool`, `tool_1`, `tool_2`, ...)
    pub id_suffix_separator: char,
    /// Fallback base id for steps whose process id sanitizes to nothing
    pub default_step_id: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            id_suffix_separator: defaults::ID_SUFFIX_SEPARATOR,
            default_step_id: defaults::STEP_ID.to_string(),
        }
    }
}
