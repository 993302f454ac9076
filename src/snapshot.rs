// src/snapshot.rs

use crate::error::{CurateError, Result};
use crate::names::package_path;
use chrono::{DateTime, TimeZone, Utc};
use git2::{Commit, ObjectType, Repository, Tree};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Directories that held at least one source file at some commit.
///
/// Every entry starts with `/` and is relative to the repository root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitFolderIndex {
    folders: BTreeSet<String>,
}

/// `/src/a/B.java` -> `/src/a`, `/src`
fn ancestor_folders(path: &str) -> impl Iterator<Item = &str> {
    std::iter::successors(Some(path), |&p| p.rfind('/').map(|i| &p[..i]))
        .skip(1)
        .filter(|p| !p.is_empty())
}

impl CommitFolderIndex {
    /// Build the index from the repository-relative paths of source files.
    pub fn from_source_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let folders = paths.into_iter().fold(BTreeSet::new(), |mut acc, path| {
            let rooted = format!("/{}", path.as_ref().trim_start_matches('/'));
            acc.extend(ancestor_folders(&rooted).map(str::to_string));
            acc
        });
        Self { folders }
    }

    /// Build the index from folder paths directly.
    pub fn from_folders<I, S>(folders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            folders: folders.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether some indexed folder ends with the package's directory path.
    ///
    /// Only the trailing components are compared since the source root
    /// (`src/main/java`, `app/src`, ...) is not known.
    pub fn contains_package(&self, package: &str) -> bool {
        let suffix = package_path(package);
        self.folders.iter().any(|folder| folder.ends_with(&suffix))
    }

    pub fn contains_folder(&self, folder: &str) -> bool {
        self.folders.contains(folder)
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.folders.iter().map(String::as_str)
    }
}

/// Folder indexes on both sides of one commit
#[derive(Debug, Clone)]
pub struct FolderEvidence {
    pub before: CommitFolderIndex,
    pub after: CommitFolderIndex,
    pub committed_at: Option<DateTime<Utc>>,
}

/// Read access to a local clone
pub struct GitRepository {
    repo: Repository,
}

impl GitRepository {
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::open(path).map_err(|source| CurateError::RepositoryOpen {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { repo })
    }

    /// Local clone location for `clone_url` under `repos_dir`, named after
    /// the last URL segment without `.git`.
    pub fn clone_dir(repos_dir: &Path, clone_url: &str) -> PathBuf {
        let name = clone_url.trim_end_matches('/').rsplit('/').next().unwrap_or(clone_url);
        repos_dir.join(name.strip_suffix(".git").unwrap_or(name))
    }

    /// Resolve a full or abbreviated sha (or any revspec) to a commit.
    pub fn resolve_commit(&self, id: &str) -> Result<Commit<'_>> {
        let not_found = |e: git2::Error| CurateError::CommitNotFound {
            commit: id.to_string(),
            reason: e.message().to_string(),
        };
        self.repo
            .revparse_single(id)
            .map_err(not_found)?
            .peel_to_commit()
            .map_err(not_found)
    }

    /// First parent of `commit`.
    pub fn parent<'r>(&self, commit: &Commit<'r>) -> Result<Commit<'r>> {
        if commit.parent_count() == 0 {
            return Err(CurateError::CommitNotFound {
                commit: format!("{}^", commit.id()),
                reason: "commit has no parent".to_string(),
            });
        }
        commit.parent(0).map_err(|e| CurateError::CommitNotFound {
            commit: format!("{}^", commit.id()),
            reason: e.message().to_string(),
        })
    }

    /// Repository-relative paths of every file in the commit's tree whose
    /// name ends with `suffix`.
    ///
    /// Any subtree that cannot be loaded fails the whole listing. Names that
    /// are not valid UTF-8 are decoded lossily.
    pub fn source_files(&self, commit: &Commit<'_>, suffix: &str) -> Result<Vec<String>> {
        let tree_error = |source| CurateError::TreeReadError {
            commit: commit.id().to_string(),
            source,
        };
        let tree = commit.tree().map_err(tree_error)?;

        let mut paths = Vec::new();
        self.collect_source_files(&tree, "", suffix, &mut paths).map_err(tree_error)?;

        Ok(paths)
    }

    fn collect_source_files(
        &self,
        tree: &Tree<'_>,
        prefix: &str,
        suffix: &str,
        paths: &mut Vec<String>,
    ) -> std::result::Result<(), git2::Error> {
        for entry in tree.iter() {
            let name = String::from_utf8_lossy(entry.name_bytes());
            match entry.kind() {
                Some(ObjectType::Blob) if name.ends_with(suffix) => {
                    paths.push(format!("{prefix}{name}"));
                }
                Some(ObjectType::Tree) => {
                    let subtree = self.repo.find_tree(entry.id())?;
                    let prefix = format!("{prefix}{name}/");
                    self.collect_source_files(&subtree, &prefix, suffix, paths)?;
                }
                // Submodule commits and non-source blobs
                _ => {}
            }
        }
        Ok(())
    }

    pub fn index_folders(&self, commit: &Commit<'_>, suffix: &str) -> Result<CommitFolderIndex> {
        let paths = self.source_files(commit, suffix)?;
        let index = CommitFolderIndex::from_source_paths(&paths);
        tracing::debug!(
            commit = %commit.id(),
            files = paths.len(),
            folders = index.len(),
            "indexed source folders"
        );
        Ok(index)
    }

    /// Index the commit and its first parent.
    pub fn folder_evidence(&self, commit_id: &str, suffix: &str) -> Result<FolderEvidence> {
        let commit = self.resolve_commit(commit_id)?;
        let parent = self.parent(&commit)?;
        Ok(FolderEvidence {
            before: self.index_folders(&parent, suffix)?,
            after: self.index_folders(&commit, suffix)?,
            committed_at: Utc.timestamp_opt(commit.time().seconds(), 0).single(),
        })
    }
}
