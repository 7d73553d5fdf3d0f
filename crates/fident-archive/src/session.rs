use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{Error, Result};

const PREFIX: &str = "fident";

/// Isolated temporary directory owned by one extraction.
///
/// The directory is removed on drop unless [`TempSession::persist`] is called.
#[derive(Debug)]
pub struct TempSession {
    dir: TempDir,
}

impl TempSession {
    /// Create `fident-<tag>-<random>` under `temp_root`, or under the OS temp
    /// directory when no root is given.
    pub fn allocate(tag: &str, temp_root: Option<&Path>) -> Result<Self> {
        let prefix = format!("{PREFIX}-{tag}-");
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);

        let dir = match temp_root {
            Some(root) => {
                std::fs::create_dir_all(root)
                    .map_err(|source| Error::SessionAllocation { source })?;
                builder.tempdir_in(root)
            }
            None => builder.tempdir(),
        }
        .map_err(|source| Error::SessionAllocation { source })?;

        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Detach the directory from this session so it survives the process.
    pub fn persist(self) -> PathBuf {
        self.dir.keep()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_uses_tagged_prefix() {
        let scratch = tempfile::tempdir().unwrap();
        let session = TempSession::allocate("unzipped", Some(scratch.path())).unwrap();

        let name = session.root().file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("fident-unzipped-"), "{name}");
        assert!(name.len() > "fident-unzipped-".len());
        assert_eq!(session.root().parent(), Some(scratch.path()));
        assert!(session.root().is_dir());
    }

    #[test]
    fn allocate_creates_missing_root() {
        let scratch = tempfile::tempdir().unwrap();
        let root = scratch.path().join("nested/sessions");
        let session = TempSession::allocate("unrar", Some(&root)).unwrap();
        assert!(session.root().starts_with(&root));
    }

    #[test]
    fn sessions_never_collide() {
        let scratch = tempfile::tempdir().unwrap();
        let sessions: Vec<_> = (0..16)
            .map(|_| TempSession::allocate("sevenzip", Some(scratch.path())).unwrap())
            .collect();

        let mut roots: Vec<_> = sessions.iter().map(|s| s.root().to_path_buf()).collect();
        roots.sort();
        roots.dedup();
        assert_eq!(roots.len(), sessions.len());
    }

    #[test]
    fn drop_removes_directory() {
        let scratch = tempfile::tempdir().unwrap();
        let root = {
            let session = TempSession::allocate("unzipped", Some(scratch.path())).unwrap();
            std::fs::write(session.root().join("a.txt"), b"hello").unwrap();
            session.root().to_path_buf()
        };
        assert!(!root.exists());
    }

    #[test]
    fn persist_keeps_directory() {
        let scratch = tempfile::tempdir().unwrap();
        let session = TempSession::allocate("unzipped", Some(scratch.path())).unwrap();
        let root = session.persist();
        assert!(root.is_dir());
    }

    #[test]
    fn allocate_fails_when_root_is_a_file() {
        let scratch = tempfile::tempdir().unwrap();
        let file = scratch.path().join("occupied");
        std::fs::write(&file, b"").unwrap();

        let err = TempSession::allocate("unzipped", Some(&file)).unwrap_err();
        assert!(matches!(err, Error::SessionAllocation { .. }));
    }
}
