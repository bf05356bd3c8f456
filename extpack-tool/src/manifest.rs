//! The built-in packaging manifest: the files and directories that make up
//! the extension bundle, as shipped to the browser store.
//!
//! Config files, env vars and CLI arguments can replace these lists; absent
//! any override, this is what gets packaged.

/// Files expected directly under the project root.
pub const EXTENSION_FILES: &[&str] = &[
    "manifest.json",
    "config.js",
    "background.js",
    "content.js",
    "dashboard-bridge.js",
    "dashboard-sync.js",
    "success-page-activator.js",
    "popup.html",
    "popup.js",
    "popup.css",
];

/// Directories whose regular files are packaged recursively.
pub const EXTENSION_DIRS: &[&str] = &["icons"];

/// Default output name template; placeholders are rendered by the naming
/// module (`%version%` comes from the extension's manifest.json).
pub const DEFAULT_OUTPUT_TEMPLATE: &str = "extension-v%version%.zip";

pub fn default_files() -> Vec<String> {
    EXTENSION_FILES.iter().map(|s| s.to_string()).collect()
}

pub fn default_dirs() -> Vec<String> {
    EXTENSION_DIRS.iter().map(|s| s.to_string()).collect()
}
