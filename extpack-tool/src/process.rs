use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use extpack_lib::Config;
use glob::Pattern;

use crate::fs_utils::{compile_skip_patterns, encode_size, parse_size, total_size, walk_dir};
use crate::manifest;
use crate::naming::render_output_name;
use crate::packaging::{Compressor, FileEntry, ZipBuilder};

/// One manifest item in listed order: either a file to package or an
/// absence to warn about. Keeping the misses in the plan lets the status
/// lines come out in manifest position, the way the manifests are authored.
#[derive(Debug)]
enum ManifestItem {
    Present(FileEntry),
    MissingFile(String),
    MissingDir(String),
}

impl ManifestItem {
    fn warn(&self) {
        match self {
            ManifestItem::Present(_) => {}
            ManifestItem::MissingFile(name) => println!("⚠ Warning: {name} not found"),
            ManifestItem::MissingDir(dir) => println!("⚠ Warning: {dir} directory not found"),
        }
    }
}

/// Runs one packaging pass: plan the manifest entries, write the archive,
/// enforce the size limit, print the summary. Returns the archive path.
pub fn run(config: &Config) -> Result<PathBuf> {
    let root = resolve_root(config)?;

    let template = config
        .output
        .as_deref()
        .unwrap_or(manifest::DEFAULT_OUTPUT_TEMPLATE);
    let output_name = render_output_name(template, &root);
    let zip_path = root.join(&output_name);

    let skip_patterns = compile_skip_patterns(config.skip.as_deref())?;
    let files = config.files.clone().unwrap_or_else(manifest::default_files);
    let dirs = config.dirs.clone().unwrap_or_else(manifest::default_dirs);

    let items = plan_entries(&root, &files, &dirs, &skip_patterns)?;

    if config.dry.unwrap_or(false) {
        let sources: Vec<PathBuf> = items
            .iter()
            .filter_map(|item| match item {
                ManifestItem::Present(entry) => Some(entry.path.clone()),
                _ => None,
            })
            .collect();
        println!("Dry run - would create archive with {} files", sources.len());
        for item in &items {
            match item {
                ManifestItem::Present(entry) => {
                    println!("  {} -> {}", entry.path.display(), entry.name_in_archive);
                }
                _ => item.warn(),
            }
        }
        println!("Total size: {}", encode_size(total_size(&sources)?));
        println!("Output: {}", zip_path.display());
        return Ok(zip_path);
    }

    let compressor = if config.compress.unwrap_or(true) {
        Compressor::Deflate
    } else {
        Compressor::Stored
    };

    let mut builder = ZipBuilder::create(&zip_path, compressor)?;
    for item in &items {
        match item {
            ManifestItem::Present(entry) => {
                builder.add_file(entry)?;
                println!("✓ Added: {}", entry.name_in_archive);
            }
            _ => item.warn(),
        }
    }
    let archive_size = builder.finish()?;

    check_size_limit(config, archive_size)?;

    println!("\n✅ Extension built successfully!");
    println!("📦 Output: {output_name}");
    println!("📊 Size: {:.2} MiB", archive_size as f64 / (1024.0 * 1024.0));

    Ok(zip_path)
}

/// The project root everything is resolved against. Defaults to the
/// directory holding the tool itself, so the build lands in the same place
/// no matter where it is invoked from.
fn resolve_root(config: &Config) -> Result<PathBuf> {
    if let Some(root) = &config.root {
        return Ok(PathBuf::from(root));
    }
    let exe = env::current_exe().context("resolving the tool's own location")?;
    Ok(exe
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(".")))
}

/// Walks the file and directory manifests in listed order. Misses stay in
/// the plan as warnings so they surface in manifest position; the run never
/// aborts for them.
fn plan_entries(
    root: &Path,
    files: &[String],
    dirs: &[String],
    skip_patterns: &[Pattern],
) -> Result<Vec<ManifestItem>> {
    let mut items = Vec::new();

    for name in files {
        let path = root.join(name);
        if path.is_file() {
            items.push(ManifestItem::Present(FileEntry {
                path,
                name_in_archive: name.clone(),
            }));
        } else {
            items.push(ManifestItem::MissingFile(name.clone()));
        }
    }

    for dir in dirs {
        let dir_path = root.join(dir);
        if dir_path.is_dir() {
            let mut found = Vec::new();
            walk_dir(&dir_path, skip_patterns, &mut found)?;
            for path in found {
                let name_in_archive = archive_name(root, &path);
                items.push(ManifestItem::Present(FileEntry {
                    path,
                    name_in_archive,
                }));
            }
        } else {
            items.push(ManifestItem::MissingDir(dir.clone()));
        }
    }

    Ok(items)
}

/// Archive entry name for a file under the project root: the root-relative
/// path with forward-slash separators, regardless of platform.
fn archive_name(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Store uploads reject oversized bundles, so a configured limit fails the
/// build outright. Exit code 42 distinguishes this from I/O failures.
fn check_size_limit(config: &Config, archive_size: u64) -> Result<()> {
    if let Some(limit_str) = &config.max_size {
        let limit = parse_size(limit_str)?;
        if limit > 0 && archive_size > limit {
            eprintln!(
                "Error: archive size {} bytes exceeds limit {} ({} bytes)",
                archive_size, limit_str, limit
            );
            std::process::exit(42);
        }
    }
    Ok(())
}
