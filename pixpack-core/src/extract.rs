//! Writing decoded records to disk, all or nothing per image
//!
//! Records are first staged as temporary files next to their targets. Only
//! once every record of an image is staged are they renamed into place, so
//! a failing image never touches files that were already on disk.

use crate::decoder::record_path;
use crate::error::PackError;
use crate::types::Record;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[cfg(feature = "logging")]
use tracing::{debug, warn};

#[derive(Debug)]
struct Staged {
    target: PathBuf,
    file: NamedTempFile,
    existed: bool,
}

/// Stages the files of one image and tracks every directory created for
/// them, so a failure can undo everything
#[derive(Debug)]
pub struct Extraction {
    root: PathBuf,
    staged: Vec<Staged>,
    created_dirs: Vec<PathBuf>,
}

impl Extraction {
    /// Start extracting under `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            staged: Vec::new(),
            created_dirs: Vec::new(),
        }
    }

    /// Stage one record below the root, creating parent directories as
    /// needed. The target itself is not touched until [`commit`](Self::commit).
    pub fn write(&mut self, record: &Record) -> Result<PathBuf, PackError> {
        let target = self.root.join(record_path(&record.name)?);

        // A staged file cannot also be a directory of another record
        if let Some(file) = self
            .staged
            .iter()
            .find(|s| target != s.target && target.starts_with(&s.target))
        {
            return Err(conflict(&target, &file.target));
        }
        if target.is_dir() {
            return Err(extract_error(&target, "target is a directory"));
        }

        let parent = target.parent().unwrap_or(&self.root).to_path_buf();
        self.create_dirs(&parent)?;

        let mut file = stage_in(&parent).map_err(|e| extract_error(&target, e))?;
        file.write_all(&record.data)
            .map_err(|e| extract_error(&target, e))?;

        #[cfg(feature = "logging")]
        debug!("Staged {} ({} bytes)", target.display(), record.data.len());

        // A repeated name replaces the earlier record
        if let Some(previous) = self.staged.iter_mut().find(|s| s.target == target) {
            previous.file = file;
        } else {
            let existed = target.exists();
            self.staged.push(Staged {
                target: target.clone(),
                file,
                existed,
            });
        }

        Ok(target)
    }

    fn create_dirs(&mut self, dir: &Path) -> Result<(), PackError> {
        let missing: Vec<&Path> = dir.ancestors().take_while(|d| !d.exists()).collect();

        for dir in missing.into_iter().rev() {
            match fs::create_dir(dir) {
                Ok(()) => self.created_dirs.push(dir.to_path_buf()),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {}
                Err(e) => return Err(extract_error(dir, e)),
            }
        }

        Ok(())
    }

    /// Number of records staged so far
    pub fn pending(&self) -> usize {
        self.staged.len()
    }

    /// Move every staged file into place and return the written paths.
    ///
    /// If a rename fails, the files this extraction newly created are
    /// removed again and the remaining staged files are discarded.
    pub fn commit(mut self) -> Result<Vec<PathBuf>, PackError> {
        let mut placed: Vec<(PathBuf, bool)> = Vec::with_capacity(self.staged.len());
        let mut staged = std::mem::take(&mut self.staged).into_iter();

        while let Some(Staged {
            target,
            file,
            existed,
        }) = staged.next()
        {
            if let Err(e) = file.persist(&target) {
                let error = extract_error(&target, e.error);

                #[cfg(feature = "logging")]
                warn!("Commit under {} failed: {}", self.root.display(), error);

                // Dropping the iterator deletes the staged files left in it
                drop(staged);
                for (path, existed) in placed.iter().rev() {
                    if !existed {
                        remove_quietly(path);
                    }
                }
                remove_dirs(&self.created_dirs);
                return Err(error);
            }
            placed.push((target, existed));
        }

        #[cfg(feature = "logging")]
        debug!("Committed {} files under {}", placed.len(), self.root.display());

        Ok(placed.into_iter().map(|(path, _)| path).collect())
    }

    /// Discard every staged file and every directory created
    pub fn rollback(self) {
        #[cfg(feature = "logging")]
        warn!(
            "Rolling back {} staged files under {}",
            self.staged.len(),
            self.root.display()
        );

        // Temporary files delete themselves on drop
        drop(self.staged);
        remove_dirs(&self.created_dirs);
    }
}

/// Write all records under `root`, or none of them.
///
/// Files already on disk are only replaced once every record has been
/// staged successfully.
pub fn extract_records(records: &[Record], root: &Path) -> Result<Vec<PathBuf>, PackError> {
    let mut extraction = Extraction::new(root);

    for record in records {
        if let Err(e) = extraction.write(record) {
            extraction.rollback();
            return Err(e);
        }
    }

    extraction.commit()
}

/// Create a temporary file in `dir` that can later be renamed over a
/// sibling path
pub(crate) fn stage_in(dir: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".pixpack");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o644));
    }

    builder.tempfile_in(dir)
}

fn remove_dirs(dirs: &[PathBuf]) {
    for dir in dirs.iter().rev() {
        // Only succeeds once the directory is empty again
        let _ = fs::remove_dir(dir);
    }
}

fn remove_quietly(file: &Path) {
    if let Err(e) = fs::remove_file(file) {
        if e.kind() != ErrorKind::NotFound {
            #[cfg(feature = "logging")]
            warn!("Failed to remove {}: {}", file.display(), e);
        }
    }
}

fn conflict(path: &Path, file: &Path) -> PackError {
    extract_error(
        path,
        format!("conflicts with file {} in the same image", file.display()),
    )
}

fn extract_error(path: &Path, err: impl ToString) -> PackError {
    PackError::Extract {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}
