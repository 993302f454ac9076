use git2::{IndexAddOption, Oid, Repository, Signature, Tree};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Throwaway repository whose commits are whole working-tree snapshots
pub struct TestRepo {
    _dir: TempDir,
    pub repo: Repository,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        Self { _dir: dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.repo.workdir().unwrap()
    }

    /// Replace the working tree with exactly `files` and commit it on HEAD.
    pub fn commit_snapshot(&self, files: &[&str], message: &str) -> Oid {
        let workdir = self.path().to_path_buf();
        for entry in fs::read_dir(&workdir).unwrap() {
            let entry = entry.unwrap();
            if entry.file_name() == ".git" {
                continue;
            }
            if entry.file_type().unwrap().is_dir() {
                fs::remove_dir_all(entry.path()).unwrap();
            } else {
                fs::remove_file(entry.path()).unwrap();
            }
        }
        for file in files {
            let path = workdir.join(file);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(&path, format!("// {file}\n")).unwrap();
        }

        let mut index = self.repo.index().unwrap();
        index.clear().unwrap();
        index.add_all(["*"].iter(), IndexAddOption::DEFAULT, None).unwrap();
        index.write().unwrap();
        let tree = self.repo.find_tree(index.write_tree().unwrap()).unwrap();
        self.commit_tree(&tree, message)
    }

    /// Commit a tree built from raw path bytes, bypassing the working tree.
    pub fn commit_raw_paths(&self, files: &[&[u8]], message: &str) -> Oid {
        let tree = self.repo.find_tree(self.build_tree(files)).unwrap();
        self.commit_tree(&tree, message)
    }

    /// Id of the object at `path` inside the tree of `commit`.
    pub fn tree_entry_id(&self, commit: Oid, path: &str) -> Oid {
        let commit = self.repo.find_commit(commit).unwrap();
        commit.tree().unwrap().get_path(Path::new(path)).unwrap().id()
    }

    /// Remove a loose object from the object database.
    pub fn delete_object(&self, oid: Oid) {
        let hex = oid.to_string();
        let path = self.repo.path().join("objects").join(&hex[..2]).join(&hex[2..]);
        fs::remove_file(path).unwrap();
    }

    fn build_tree(&self, files: &[&[u8]]) -> Oid {
        let mut blobs = Vec::new();
        let mut dirs: BTreeMap<&[u8], Vec<&[u8]>> = BTreeMap::new();
        for &file in files {
            match file.iter().position(|&b| b == b'/') {
                Some(i) => dirs.entry(&file[..i]).or_default().push(&file[i + 1..]),
                None => blobs.push(file),
            }
        }

        let mut builder = self.repo.treebuilder(None).unwrap();
        for name in blobs {
            let blob = self.repo.blob(name).unwrap();
            builder.insert(name, blob, 0o100644).unwrap();
        }
        for (name, children) in dirs {
            let subtree = self.build_tree(&children);
            builder.insert(name, subtree, 0o040000).unwrap();
        }
        builder.write().unwrap()
    }

    fn commit_tree(&self, tree: &Tree<'_>, message: &str) -> Oid {
        let sig = Signature::now("Test User", "test@example.com").unwrap();
        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<_> = parent.iter().collect();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, tree, &parents)
            .unwrap()
    }
}
