//! Asset store rooted at a local directory.

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use super::AssetStore;

/// Stores assets as plain files below `root`, served under `base_url`.
#[derive(Debug, Clone)]
pub struct FileSystemStore {
    root: PathBuf,
    base_url: String,
}

impl FileSystemStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Physical path for a logical name.
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(name.trim_start_matches('/'))
    }
}

impl AssetStore for FileSystemStore {
    fn exists(&self, name: &str) -> bool {
        self.path(name).exists()
    }

    fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>> {
        let path = self.path(name);
        if path.is_dir() {
            return Err(io::Error::other(format!("`{}` is a directory", path.display())));
        }
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }

    fn save(&self, name: &str, content: &mut dyn Read) -> io::Result<String> {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(&path)?;
        io::copy(content, &mut file)?;
        Ok(name.replace('\\', "/"))
    }

    fn delete(&self, name: &str) -> io::Result<()> {
        fs::remove_file(self.path(name))
    }

    fn url(&self, name: &str) -> String {
        format!("{}{}", self.base_url, name.trim_start_matches('/'))
    }
}
