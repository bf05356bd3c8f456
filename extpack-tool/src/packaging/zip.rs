use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Represents a file to include in the ZIP archive.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: PathBuf,
    pub name_in_archive: String,
}

/// Compression algorithm to use when creating the ZIP.
#[derive(Debug, Clone, Copy)]
pub enum Compressor {
    Deflate,
    Stored,
}

/// A scoped writer for one archive: create it, add entries, then `finish`
/// to write the central directory and learn the final size. Dropping the
/// builder without calling `finish` leaves a truncated archive behind.
pub struct ZipBuilder {
    writer: ZipWriter<File>,
    options: SimpleFileOptions,
}

impl ZipBuilder {
    /// Opens a fresh archive at `path`, deleting any previous file there
    /// first. Overwrite semantics, never append.
    pub fn create(path: &Path, compressor: Compressor) -> Result<Self> {
        if path.exists() {
            fs::remove_file(path)
                .with_context(|| format!("removing old archive {}", path.display()))?;
        }

        let file =
            File::create(path).with_context(|| format!("creating archive {}", path.display()))?;

        let method = match compressor {
            Compressor::Deflate => CompressionMethod::Deflated,
            Compressor::Stored => CompressionMethod::Stored,
        };
        let options = SimpleFileOptions::default()
            .compression_method(method)
            .unix_permissions(0o644);

        Ok(Self {
            writer: ZipWriter::new(file),
            options,
        })
    }

    /// Copies one source file into the archive under its archive name.
    pub fn add_file(&mut self, entry: &FileEntry) -> Result<()> {
        self.writer
            .start_file(entry.name_in_archive.as_str(), self.options)
            .with_context(|| format!("starting archive entry {}", entry.name_in_archive))?;

        let mut source = File::open(&entry.path)
            .with_context(|| format!("opening {}", entry.path.display()))?;
        io::copy(&mut source, &mut self.writer)
            .with_context(|| format!("writing {} into archive", entry.name_in_archive))?;
        Ok(())
    }

    /// Finalizes the archive and flushes it to disk; returns its size in bytes.
    pub fn finish(self) -> Result<u64> {
        let mut file = self.writer.finish().context("finalizing archive")?;
        file.flush().context("flushing archive")?;
        let size = file.metadata().context("measuring archive")?.len();
        Ok(size)
    }
}
