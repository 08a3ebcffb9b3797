//! Crash-safe file replacement.
//!
//! Contents are written to a hidden sibling named
//! `.<name>.tmp.<pid>.<nanos>.<counter>`, flushed to disk, then renamed over
//! the target. A reader therefore sees either the old file or the new one,
//! never a prefix of the new one. If the process dies before the rename the
//! staging file is left behind; it never shadows the target and is swept on
//! the next [`sweep_staging_residue`].

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use cap_std::fs::{Dir, OpenOptions};
use tracing::debug;

static STAGING_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Failure while staging or committing a file.
#[derive(Debug, thiserror::Error)]
#[error("failed to {action} {path}: {source}")]
pub(crate) struct AtomicWriteError {
    action: &'static str,
    path: Utf8PathBuf,
    #[source]
    source: io::Error,
}

impl AtomicWriteError {
    fn new(action: &'static str, path: impl Into<Utf8PathBuf>, source: io::Error) -> Self {
        Self {
            action,
            path: path.into(),
            source,
        }
    }
}

/// A fully written, synced staging file that has not yet replaced its target.
///
/// Dropping it without calling [`StagedFile::commit`] deletes the staging
/// file and leaves the target untouched.
#[derive(Debug)]
pub(crate) struct StagedFile<'dir> {
    dir: &'dir Dir,
    staging_name: String,
    target_name: String,
    committed: bool,
}

impl StagedFile<'_> {
    /// Name of the hidden staging file inside the directory.
    #[cfg(test)]
    pub(crate) fn staging_name(&self) -> &str {
        &self.staging_name
    }

    /// Atomically replace the target with the staged contents.
    pub(crate) fn commit(mut self) -> Result<(), AtomicWriteError> {
        rename_over(self.dir, &self.staging_name, &self.target_name)
            .map_err(|err| AtomicWriteError::new("replace", self.target_name.as_str(), err))?;
        self.committed = true;
        sync_directory(self.dir);
        Ok(())
    }
}

impl Drop for StagedFile<'_> {
    fn drop(&mut self) {
        if !self.committed && self.dir.remove_file(&self.staging_name).is_err() {
            debug!(staging = %self.staging_name, "staging file already gone");
        }
    }
}

/// Reject anything but a bare file name so writes stay inside `dir`.
fn bare_file_name(path: &Utf8Path) -> Result<&str, AtomicWriteError> {
    let mut components = path.components();
    match (components.next(), components.next()) {
        (Some(Utf8Component::Normal(name)), None) => Ok(name),
        _ => Err(AtomicWriteError::new(
            "stage",
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "target must be a bare file name"),
        )),
    }
}

fn staging_prefix(target_name: &str) -> String {
    format!(".{target_name}.tmp.")
}

/// Write `contents` to a fresh staging file next to `target`.
pub(crate) fn stage<'dir>(
    dir: &'dir Dir,
    target: &Utf8Path,
    contents: &[u8],
) -> Result<StagedFile<'dir>, AtomicWriteError> {
    let target_name = bare_file_name(target)?;
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let counter = STAGING_COUNTER.fetch_add(1, Ordering::Relaxed);
    let staging_name = format!(
        "{}{}.{}.{}",
        staging_prefix(target_name),
        std::process::id(),
        nanos,
        counter
    );

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir
        .open_with(&staging_name, &options)
        .map_err(|err| AtomicWriteError::new("create", staging_name.as_str(), err))?;

    // From here on the guard owns cleanup of the staging file.
    let staged = StagedFile {
        dir,
        staging_name,
        target_name: target_name.to_owned(),
        committed: false,
    };
    file.write_all(contents)
        .and_then(|()| file.sync_all())
        .map_err(|err| AtomicWriteError::new("write", staged.staging_name.as_str(), err))?;
    Ok(staged)
}

/// Stage and commit in one step.
pub(crate) fn write_atomic(
    dir: &Dir,
    target: &Utf8Path,
    contents: &[u8],
) -> Result<(), AtomicWriteError> {
    stage(dir, target, contents)?.commit()
}

/// Remove staging files left by interrupted writes of `target`.
///
/// Returns how many were removed. Only call this while no write to `target`
/// can be in flight.
pub(crate) fn sweep_staging_residue(dir: &Dir, target: &Utf8Path) -> usize {
    let Ok(target_name) = bare_file_name(target) else {
        return 0;
    };
    let prefix = staging_prefix(target_name);
    let Ok(entries) = dir.entries() else {
        return 0;
    };
    entries
        .filter_map(Result::ok)
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.starts_with(&prefix))
        .filter(|name| dir.remove_file(name).is_ok())
        .count()
}

#[cfg(windows)]
fn rename_over(dir: &Dir, from: &str, to: &str) -> io::Result<()> {
    match dir.remove_file(to) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    dir.rename(from, dir, to)
}

#[cfg(not(windows))]
fn rename_over(dir: &Dir, from: &str, to: &str) -> io::Result<()> {
    dir.rename(from, dir, to)
}

fn sync_directory(dir: &Dir) {
    if let Err(err) = dir.open(".").and_then(|handle| handle.sync_all()) {
        debug!(error = %err, "directory sync skipped");
    }
}
