use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

use glob::Pattern;

/// Compile skip patterns with proper error handling.
pub fn compile_skip_patterns(patterns: Option<&[String]>) -> Result<Vec<Pattern>> {
    patterns
        .map(|patterns| {
            patterns
                .iter()
                .map(|p| Pattern::new(p).with_context(|| format!("invalid skip pattern: {p}")))
                .collect::<Result<Vec<_>>>()
        })
        .transpose()
        .map(Option::unwrap_or_default)
}

fn is_skipped(path: &Path, patterns: &[Pattern]) -> bool {
    let path_str = path.to_string_lossy();
    patterns.iter().any(|p| p.matches(&path_str))
}

/// Recursively lists all regular files under `dir`, excluding any path that
/// matches a skip pattern. Entries are visited in name order so that console
/// output stays stable across runs.
pub fn walk_dir(dir: &Path, patterns: &[Pattern], result: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .with_context(|| format!("reading directory {dir:?}"))?
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let path = entry.path();

        if is_skipped(&path, patterns) {
            continue;
        }

        if path.is_dir() {
            walk_dir(&path, patterns, result)?;
        } else if path.is_file() {
            result.push(path);
        }
    }
    Ok(())
}

/// Compute total size of all files, for the dry-run report.
pub fn total_size(files: &[PathBuf]) -> Result<u64> {
    let mut total: u64 = 0;
    for path in files {
        if path.is_file() {
            let meta = fs::metadata(path)?;
            total += meta.len();
        }
    }
    Ok(total)
}

/// Parse human-readable sizes in both binary (Ki/Mi/Gi) and decimal (KB/MB/GB) units.
/// Examples: "512Mi", "10Gi", "1MB", "500kb", "1024", "2.5GB"
pub fn parse_size(s: &str) -> Result<u64> {
    let s = s.trim().to_ascii_lowercase();

    let (multiplier, number_str) = if s.ends_with("ki") {
        (1024_u64, &s[..s.len() - 2])
    } else if s.ends_with("mi") {
        (1024_u64.pow(2), &s[..s.len() - 2])
    } else if s.ends_with("gi") {
        (1024_u64.pow(3), &s[..s.len() - 2])
    } else if s.ends_with("ti") {
        (1024_u64.pow(4), &s[..s.len() - 2])
    } else if s.ends_with("kb") {
        (1000_u64, &s[..s.len() - 2])
    } else if s.ends_with("mb") {
        (1000_u64.pow(2), &s[..s.len() - 2])
    } else if s.ends_with("gb") {
        (1000_u64.pow(3), &s[..s.len() - 2])
    } else if s.ends_with("tb") {
        (1000_u64.pow(4), &s[..s.len() - 2])
    } else {
        (1_u64, s.as_str())
    };

    let number: f64 = number_str
        .trim()
        .parse()
        .with_context(|| format!("Invalid size format: {}", s))?;

    Ok((number * multiplier as f64) as u64)
}

/// Convert bytes into a human-friendly string using binary (KiB, MiB, GiB...) units.
pub fn encode_size(bytes: u64) -> String {
    const UNITS: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    // Format with one decimal if needed (e.g., 1.0 MiB -> 1 MiB)
    if (size * 10.0) % 10.0 == 0.0 {
        format!("{:.0} {}", size, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    #[test]
    fn parse_size_accepts_binary_and_decimal_units() {
        assert_eq!(parse_size("1024").unwrap(), 1024);
        assert_eq!(parse_size("1Ki").unwrap(), 1024);
        assert_eq!(parse_size("512Mi").unwrap(), 512 * 1024 * 1024);
        assert_eq!(parse_size("1MB").unwrap(), 1_000_000);
        assert_eq!(parse_size("2.5GB").unwrap(), 2_500_000_000);
        assert_eq!(parse_size(" 10gi ").unwrap(), 10 * 1024 * 1024 * 1024);
    }

    #[test]
    fn parse_size_rejects_garbage() {
        assert!(parse_size("lots").is_err());
        assert!(parse_size("12Q").is_err());
    }

    #[test]
    fn encode_size_picks_binary_units() {
        assert_eq!(encode_size(0), "0 B");
        assert_eq!(encode_size(512), "512 B");
        assert_eq!(encode_size(1024), "1 KiB");
        assert_eq!(encode_size(1536), "1.5 KiB");
        assert_eq!(encode_size(5 * 1024 * 1024), "5 MiB");
    }

    #[test]
    fn walk_dir_recurses_and_honors_skips() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        std::fs::create_dir_all(root.join("icons/small")).unwrap();
        File::create(root.join("icons/icon48.png"))
            .unwrap()
            .write_all(b"png")
            .unwrap();
        File::create(root.join("icons/small/icon16.png"))
            .unwrap()
            .write_all(b"png")
            .unwrap();
        File::create(root.join("icons/notes.tmp")).unwrap();

        let raw = vec!["**/*.tmp".to_string()];
        let patterns = compile_skip_patterns(Some(&raw)).unwrap();
        let mut found = Vec::new();
        walk_dir(&root.join("icons"), &patterns, &mut found).unwrap();

        let names: Vec<_> = found
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["icons/icon48.png", "icons/small/icon16.png"]);
    }

    #[test]
    fn compile_skip_patterns_reports_bad_globs() {
        let raw = vec!["[".to_string()];
        assert!(compile_skip_patterns(Some(&raw)).is_err());
        assert!(compile_skip_patterns(None).unwrap().is_empty());
    }

    #[test]
    fn total_size_sums_regular_files() {
        let tmp = tempfile::tempdir().unwrap();
        let a = tmp.path().join("a.txt");
        let b = tmp.path().join("b.txt");
        std::fs::write(&a, b"12345").unwrap();
        std::fs::write(&b, b"678").unwrap();
        assert_eq!(total_size(&[a, b]).unwrap(), 8);
    }
}
