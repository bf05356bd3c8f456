use chrono::Utc;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// The handful of fields we care about in the extension's manifest.json.
#[derive(Debug, Deserialize)]
struct ExtensionManifest {
    #[serde(default)]
    version: String,
}

/// Reads the `version` field from `manifest.json` under the project root.
/// A missing or unreadable manifest yields "0.0.0" rather than failing the
/// build; the version only feeds the output file name.
pub fn manifest_version(root: &Path) -> String {
    fs::read_to_string(root.join("manifest.json"))
        .ok()
        .and_then(|content| serde_json::from_str::<ExtensionManifest>(&content).ok())
        .map(|m| m.version)
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "0.0.0".to_string())
}

/// Renders an output-name template into a concrete file name.
///
/// Supported placeholders (case-insensitive):
/// `%version%` - extension version from manifest.json
/// `%datetime%`, `%date%`, `%time%` - current UTC time
pub fn render_output_name(template: &str, root: &Path) -> String {
    let now = Utc::now();

    let replacements = vec![
        ("%version%", manifest_version(root)),
        ("%datetime%", now.format("%Y-%m-%d_%H-%M-%S").to_string()),
        ("%date%", now.format("%Y-%m-%d").to_string()),
        ("%time%", now.format("%H-%M-%S").to_string()),
    ];

    let mut name = template.to_string();
    for (pattern, value) in replacements {
        name = replace_case_insensitive(&name, pattern, &value);
    }
    name
}

/// Helper for case-insensitive substring replacement
fn replace_case_insensitive(s: &str, pattern: &str, replacement: &str) -> String {
    let mut result = String::new();
    let lower_s = s.to_lowercase();
    let lower_pattern = pattern.to_lowercase();

    // Lowercasing can change byte length in some scripts (e.g. İ), and the
    // match offsets below index into the original string. Such templates
    // pass through literally.
    if lower_s.len() != s.len() {
        return s.to_string();
    }

    let mut last_end = 0;
    let mut search_start = 0;

    while let Some(pos) = lower_s[search_start..].find(&lower_pattern) {
        let abs_pos = search_start + pos;
        result.push_str(&s[last_end..abs_pos]);
        result.push_str(replacement);
        last_end = abs_pos + pattern.len();
        search_start = last_end;
    }

    result.push_str(&s[last_end..]);
    result
}
