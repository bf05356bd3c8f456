use serde::{Deserialize, Serialize};

/// Packaging configuration, shared between the CLI and any future frontends.
/// Every field is optional so that env, config file and CLI layers can be
/// merged field by field; unset fields fall back to the built-in manifest.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub output: Option<String>,
    pub config: Option<String>,
    pub root: Option<String>,
    pub dry: Option<bool>,
    pub compress: Option<bool>,
    pub max_size: Option<String>,
    pub files: Option<Vec<String>>,
    pub dirs: Option<Vec<String>>,
    pub skip: Option<Vec<String>>,
}
