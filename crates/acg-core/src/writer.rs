//! All-or-nothing output of a generation pass.
//!
//! Files are staged in a temporary directory inside the target (so renames
//! stay on one filesystem) and promoted together on [`TransactionalWriter::commit`].
//! A failed promotion moves every already-promoted file back.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::WriteError;
use crate::{GeneratedFile, WritePolicy};

const STAGED: &str = "staged";
const BACKUP: &str = "backup";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    /// Files written by this commit, relative to the target.
    pub written: Vec<PathBuf>,
    /// `IfMissing` files left untouched because they already existed.
    pub preserved: Vec<PathBuf>,
}

#[derive(Debug)]
struct StagedFile {
    relative: PathBuf,
    policy: WritePolicy,
}

/// A promoted file and whether an older version was moved aside for it.
struct Promoted {
    relative: PathBuf,
    backed_up: bool,
}

/// Stages generated files and promotes them as one batch.
///
/// Dropping the writer without calling `commit` discards everything staged.
#[derive(Debug)]
pub struct TransactionalWriter {
    target: PathBuf,
    staging: TempDir,
    staged: Vec<StagedFile>,
}

impl TransactionalWriter {
    pub fn new(target: impl Into<PathBuf>) -> Result<Self, WriteError> {
        let target = target.into();
        fs::create_dir_all(&target).map_err(|source| WriteError::Stage {
            path: target.clone(),
            source,
        })?;
        let staging = tempfile::Builder::new()
            .prefix(".acg-staging-")
            .tempdir_in(&target)
            .map_err(|source| WriteError::Stage {
                path: target.clone(),
                source,
            })?;
        Ok(Self {
            target,
            staging,
            staged: Vec::new(),
        })
    }

    /// Write `file` into the staging area.
    pub fn stage(&mut self, file: &GeneratedFile) -> Result<(), WriteError> {
        let relative = PathBuf::from(&file.path);
        let dest = self.staging.path().join(STAGED).join(&relative);
        write_with_parents(&dest, &file.content).map_err(|source| WriteError::Stage {
            path: relative.clone(),
            source,
        })?;
        self.staged.push(StagedFile {
            relative,
            policy: file.policy,
        });
        Ok(())
    }

    pub fn stage_all<'a>(
        &mut self,
        files: impl IntoIterator<Item = &'a GeneratedFile>,
    ) -> Result<(), WriteError> {
        files.into_iter().try_for_each(|f| self.stage(f))
    }

    /// Promote every staged file into the target directory.
    pub fn commit(self) -> Result<CommitSummary, WriteError> {
        let mut summary = CommitSummary::default();
        let mut promoted: Vec<Promoted> = Vec::new();

        for file in &self.staged {
            let dest = self.target.join(&file.relative);
            if file.policy == WritePolicy::IfMissing && dest.exists() {
                log::debug!("preserving existing {}", dest.display());
                summary.preserved.push(file.relative.clone());
                continue;
            }

            match self.promote(&file.relative, &dest) {
                Ok(backed_up) => {
                    promoted.push(Promoted {
                        relative: file.relative.clone(),
                        backed_up,
                    });
                    summary.written.push(file.relative.clone());
                }
                Err(err) => {
                    self.rollback(&promoted)?;
                    return Err(err);
                }
            }
        }

        Ok(summary)
    }

    /// Move any existing file aside, then rename the staged file into place.
    /// Returns whether a backup was taken.
    fn promote(&self, relative: &Path, dest: &Path) -> Result<bool, WriteError> {
        let staged = self.staging.path().join(STAGED).join(relative);
        let backup = self.staging.path().join(BACKUP).join(relative);
        let promote_err = |source| WriteError::Promote {
            path: dest.to_path_buf(),
            source,
        };

        let backed_up = dest.exists();
        if backed_up {
            rename_with_parents(dest, &backup).map_err(promote_err)?;
        }

        if let Err(source) = rename_with_parents(&staged, dest) {
            if backed_up {
                fs::rename(&backup, dest).map_err(|source| WriteError::Rollback {
                    path: dest.to_path_buf(),
                    source,
                })?;
            }
            return Err(promote_err(source));
        }

        Ok(backed_up)
    }

    fn rollback(&self, promoted: &[Promoted]) -> Result<(), WriteError> {
        for file in promoted.iter().rev() {
            let dest = self.target.join(&file.relative);
            let restored = if file.backed_up {
                fs::rename(self.staging.path().join(BACKUP).join(&file.relative), &dest)
            } else {
                fs::remove_file(&dest)
            };
            restored.map_err(|source| WriteError::Rollback { path: dest, source })?;
        }
        Ok(())
    }
}

fn write_with_parents(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

fn rename_with_parents(from: &Path, to: &Path) -> io::Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::rename(from, to)
}
