//! Asset stores: where originals are read from and fingerprinted copies go.

mod fs;
mod hashed;

pub use fs::FileSystemStore;
pub use hashed::HashedStorage;

use std::io::{self, Read};

/// Backend holding assets under slash-separated logical names.
///
/// Implementations decide where bytes physically live; callers only ever
/// see logical names and served URLs.
pub trait AssetStore {
    /// Whether anything (file or directory) exists under `name`.
    fn exists(&self, name: &str) -> bool;

    /// Open readable content. Fails for names that are not readable files.
    fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>>;

    /// Store `content` under `name`, returning the name actually used.
    fn save(&self, name: &str, content: &mut dyn Read) -> io::Result<String>;

    fn delete(&self, name: &str) -> io::Result<()>;

    /// Served URL for `name`.
    fn url(&self, name: &str) -> String;
}

impl<S: AssetStore + ?Sized> AssetStore for &S {
    fn exists(&self, name: &str) -> bool {
        (**self).exists(name)
    }

    fn open(&self, name: &str) -> io::Result<Box<dyn Read + '_>> {
        (**self).open(name)
    }

    fn save(&self, name: &str, content: &mut dyn Read) -> io::Result<String> {
        (**self).save(name, content)
    }

    fn delete(&self, name: &str) -> io::Result<()> {
        (**self).delete(name)
    }

    fn url(&self, name: &str) -> String {
        (**self).url(name)
    }
}
