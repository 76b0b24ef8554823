//! Input enumeration: files, directory trees and image folders

use crate::config::PackConfig;
use crate::constants::NAME_SEPARATOR;
use crate::error::PackError;
use std::fs;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// A regular file selected for encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Where the file lives on disk
    pub path: PathBuf,

    /// Name stored in the container
    pub name: String,

    /// Size reported by the filesystem at enumeration time
    pub len: u64,
}

/// An input left out of a batch, and why
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedInput {
    /// The offending path
    pub path: PathBuf,

    /// What went wrong
    pub error: PackError,
}

impl SkippedInput {
    pub(crate) fn new(path: impl Into<PathBuf>, error: PackError) -> Self {
        let path = path.into();

        #[cfg(feature = "logging")]
        warn!("Skipping {}: {}", path.display(), error);

        Self { path, error }
    }
}

/// Result of enumerating encode inputs
#[derive(Debug, Default)]
pub struct Sources {
    /// Files to encode, in input order
    pub files: Vec<SourceFile>,

    /// Inputs that could not be enumerated
    pub skipped: Vec<SkippedInput>,
}

impl Sources {
    /// Sum of the enumerated file sizes
    pub fn total_bytes(&self) -> u64 {
        self.files.iter().map(|f| f.len).sum()
    }
}

/// Resolve encode inputs into the list of files to frame.
///
/// Plain files keep their base name. Directories are walked recursively in
/// file-name order and every regular file beneath them is stored as
/// `<dir name>/<relative path>`. Symlinks inside directories are ignored
/// unless `config.follow_links` is set.
pub fn collect_sources(inputs: &[PathBuf], config: &PackConfig) -> Sources {
    let mut sources = Sources::default();

    for input in inputs {
        let metadata = match fs::metadata(input) {
            Ok(m) => m,
            Err(e) => {
                sources
                    .skipped
                    .push(SkippedInput::new(input, PackError::read(input, e)));
                continue;
            }
        };

        if metadata.is_dir() {
            walk_directory(input, config, &mut sources);
        } else if metadata.is_file() {
            match base_name(input) {
                Ok(name) => sources.files.push(SourceFile {
                    path: input.clone(),
                    name,
                    len: metadata.len(),
                }),
                Err(e) => sources.skipped.push(SkippedInput::new(input, e)),
            }
        } else {
            sources.skipped.push(SkippedInput::new(
                input,
                PackError::read(input, "not a regular file or directory"),
            ));
        }
    }

    #[cfg(feature = "logging")]
    debug!(
        "Enumerated {} files ({} bytes), skipped {}",
        sources.files.len(),
        sources.total_bytes(),
        sources.skipped.len()
    );

    sources
}

fn walk_directory(dir: &Path, config: &PackConfig, sources: &mut Sources) {
    let root_name = match directory_name(dir) {
        Ok(name) => name,
        Err(e) => {
            sources.skipped.push(SkippedInput::new(dir, e));
            return;
        }
    };

    for entry in WalkDir::new(dir)
        .follow_links(config.follow_links)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e.path().unwrap_or(dir).to_path_buf();
                let error = PackError::read(&path, &e);
                sources.skipped.push(SkippedInput::new(path, error));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
        let name = match stored_name(&root_name, relative) {
            Ok(name) => name,
            Err(e) => {
                sources.skipped.push(SkippedInput::new(entry.path(), e));
                continue;
            }
        };

        match entry.metadata() {
            Ok(metadata) => sources.files.push(SourceFile {
                path: entry.path().to_path_buf(),
                name,
                len: metadata.len(),
            }),
            Err(e) => {
                let error = PackError::read(entry.path(), &e);
                sources.skipped.push(SkippedInput::new(entry.path(), error));
            }
        }
    }
}

/// Resolve decode inputs into image paths.
///
/// Plain paths are passed through untouched (a missing or broken image is
/// reported when it is read). Directories are walked for files carrying
/// `config.image_extension`.
pub fn collect_images(
    inputs: &[PathBuf],
    config: &PackConfig,
) -> (Vec<PathBuf>, Vec<SkippedInput>) {
    let mut images = Vec::new();
    let mut skipped = Vec::new();

    for input in inputs {
        if !input.is_dir() {
            images.push(input.clone());
            continue;
        }

        for entry in WalkDir::new(input)
            .follow_links(config.follow_links)
            .sort_by_file_name()
        {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && config.is_image_path(entry.path()) {
                        images.push(entry.into_path());
                    }
                }
                Err(e) => {
                    let path = e.path().unwrap_or(input.as_path()).to_path_buf();
                    let error = PackError::ImageRead {
                        path: path.clone(),
                        reason: e.to_string(),
                    };
                    skipped.push(SkippedInput::new(path, error));
                }
            }
        }
    }

    (images, skipped)
}

fn base_name(path: &Path) -> Result<String, PackError> {
    path.file_name()
        .ok_or_else(|| PackError::InvalidName(format!("{} has no file name", path.display())))?
        .to_str()
        .map(str::to_string)
        .ok_or_else(|| PackError::InvalidName(format!("{} is not valid UTF-8", path.display())))
}

/// Name of a directory input, resolving `.` and `..` through the filesystem
fn directory_name(dir: &Path) -> Result<String, PackError> {
    match base_name(dir) {
        Ok(name) => Ok(name),
        Err(_) => {
            let resolved = fs::canonicalize(dir).map_err(|e| PackError::read(dir, e))?;
            base_name(&resolved)
        }
    }
}

/// Join a directory's own name and a path relative to it with `/`
fn stored_name(root_name: &str, relative: &Path) -> Result<String, PackError> {
    let mut name = root_name.to_string();

    for component in relative.components() {
        let Component::Normal(part) = component else {
            continue;
        };
        let part = part.to_str().ok_or_else(|| {
            PackError::InvalidName(format!("{} is not valid UTF-8", relative.display()))
        })?;
        name.push(NAME_SEPARATOR);
        name.push_str(part);
    }

    Ok(name)
}
