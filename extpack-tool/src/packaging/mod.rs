pub mod zip;

pub use zip::{Compressor, FileEntry, ZipBuilder};
