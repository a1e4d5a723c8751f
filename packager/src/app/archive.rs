//! Submission archive assembly
//!
//! Every file lands in the archive root under its base name. A later file with
//! the same base name replaces the earlier entry.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::PackagingError;

/// Result of assembling an archive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveReport {
    pub path: PathBuf,
    /// Entry names written, in archive order
    pub added: Vec<String>,
    /// Requested paths that did not exist
    pub missing: Vec<String>,
}

impl ArchiveReport {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

fn display_requested(path: &Path) -> String {
    if path.as_os_str().is_empty() {
        "<unset path>".to_string()
    } else {
        path.display().to_string()
    }
}

/// Pair each existing file with its flattened entry name; collect the rest as missing
fn plan_entries(files: &[PathBuf]) -> (Vec<(String, PathBuf)>, Vec<String>) {
    let mut entries: Vec<(String, PathBuf)> = Vec::new();
    let mut missing = Vec::new();

    for file in files {
        let name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .filter(|_| file.is_file());

        match name {
            Some(name) => {
                if let Some(existing) = entries.iter_mut().find(|(n, _)| *n == name) {
                    tracing::warn!(
                        entry = %name,
                        replaced = %existing.1.display(),
                        by = %file.display(),
                        "Archive entry name collision"
                    );
                    existing.1 = file.clone();
                } else {
                    entries.push((name, file.clone()));
                }
            }
            None => {
                tracing::error!("Missing file: {}", display_requested(file));
                missing.push(display_requested(file));
            }
        }
    }

    (entries, missing)
}

fn write_archive(output: &Path, entries: &[(String, PathBuf)]) -> Result<(), PackagingError> {
    let io_error = |source: io::Error| PackagingError::Io {
        file: output.display().to_string(),
        source: Some(source),
    };

    let mut zip = ZipWriter::new(File::create(output).map_err(io_error)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, path) in entries {
        zip.start_file(name.as_str(), options)
            .map_err(|e| io_error(e.into()))?;
        let mut source = File::open(path).map_err(io_error)?;
        io::copy(&mut source, &mut zip).map_err(io_error)?;
        tracing::info!("OK: Added {}", name);
    }

    zip.finish().map_err(|e| io_error(e.into()))?;
    Ok(())
}

/// Zip `files` into `output`
///
/// With `strict` set, any missing file aborts: the partial archive is removed
/// and the error lists every missing path. Otherwise the archive is kept and
/// the report carries the missing paths.
pub fn assemble_archive(
    output: &Path,
    files: &[PathBuf],
    strict: bool,
) -> Result<ArchiveReport, PackagingError> {
    let (entries, missing) = plan_entries(files);
    write_archive(output, &entries)?;

    if !missing.is_empty() {
        if strict {
            if let Err(e) = fs::remove_file(output) {
                tracing::warn!("Could not remove partial archive {}: {}", output.display(), e);
            }
            return Err(PackagingError::Incomplete { missing });
        }
        tracing::warn!(
            "Missing files with strict mode disabled ({}). Submission may be incomplete.",
            missing.join(", ")
        );
    }

    Ok(ArchiveReport {
        path: output.to_path_buf(),
        added: entries.into_iter().map(|(name, _)| name).collect(),
        missing,
    })
}
