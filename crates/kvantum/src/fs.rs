// Copyright (c) 2025 Zensical and contributors

// SPDX-License-Identifier: MIT
// Third-party contributions licensed under DCO

// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to
// deal in the Software without restriction, including without limitation the
// rights to use, copy, modify, merge, publish, distribute, sublicense, and/or
// sell copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:

// The above copyright notice and this permission notice shall be included in
// all copies or substantial portions of the Software.

// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NON-INFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING
// FROM, OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS
// IN THE SOFTWARE.

// ----------------------------------------------------------------------------

//! File system access.
//!
//! File-backed views never touch the disk directly, but go through a
//! [`FileSystem`], so that they can be served from anywhere.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

// ----------------------------------------------------------------------------
// Traits
// ----------------------------------------------------------------------------

/// File system.
///
/// Paths are relative to the root of the file system. Implementations must
/// not resolve paths outside of it.
pub trait FileSystem: Send + Sync + 'static {
    /// Returns whether a file exists at the given path.
    fn exists(&self, path: &Path) -> bool;

    /// Returns the length of the file in bytes.
    fn length(&self, path: &Path) -> io::Result<u64>;

    /// Returns the modification time of the file.
    fn modified(&self, path: &Path) -> io::Result<SystemTime>;

    /// Opens the file for reading.
    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>>;
}

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// File system rooted at a local directory.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use kvantum::fs::{FileSystem, LocalFileSystem};
///
/// // Create file system and check traversal
/// let fs = LocalFileSystem::new("public");
/// assert!(!fs.exists(Path::new("../Cargo.toml")));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LocalFileSystem {
    /// Root directory.
    root: PathBuf,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl LocalFileSystem {
    /// Creates a file system rooted at the given directory.
    pub fn new<P>(root: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves the given path against the root directory.
    ///
    /// Leading separators are ignored, so absolute paths stay inside the
    /// root. Parent directory components and prefixes are rejected.
    ///
    /// # Errors
    ///
    /// This method returns [`io::ErrorKind::InvalidInput`], if the path would
    /// escape the root directory.
    pub fn resolve(&self, path: &Path) -> io::Result<PathBuf> {
        let mut resolved = self.root.clone();
        for component in path.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::RootDir | Component::CurDir => {}
                Component::ParentDir | Component::Prefix(_) => {
                    return Err(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("path escapes root: {}", path.display()),
                    ));
                }
            }
        }
        Ok(resolved)
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl FileSystem for LocalFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).is_ok_and(|path| path.is_file())
    }

    fn length(&self, path: &Path) -> io::Result<u64> {
        fs::metadata(self.resolve(path)?).map(|metadata| metadata.len())
    }

    fn modified(&self, path: &Path) -> io::Result<SystemTime> {
        fs::metadata(self.resolve(path)?)?.modified()
    }

    fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
        let file = File::open(self.resolve(path)?)?;
        Ok(Box::new(file))
    }
}

// ----------------------------------------------------------------------------

impl fmt::Debug for dyn FileSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileSystem").finish_non_exhaustive()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::BTreeMap;
    use std::io::Cursor;
    use std::time::{Duration, UNIX_EPOCH};

    use super::*;

    /// In-memory file system.
    #[derive(Default)]
    pub(crate) struct Memory {
        files: BTreeMap<PathBuf, Vec<u8>>,
    }

    impl Memory {
        pub(crate) fn file<P, C>(mut self, path: P, content: C) -> Self
        where
            P: Into<PathBuf>,
            C: Into<Vec<u8>>,
        {
            self.files.insert(path.into(), content.into());
            self
        }

        fn get(&self, path: &Path) -> io::Result<&Vec<u8>> {
            self.files
                .get(path)
                .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
        }
    }

    impl FileSystem for Memory {
        fn exists(&self, path: &Path) -> bool {
            self.files.contains_key(path)
        }

        fn length(&self, path: &Path) -> io::Result<u64> {
            self.get(path).map(|content| content.len() as u64)
        }

        fn modified(&self, path: &Path) -> io::Result<SystemTime> {
            self.get(path)?;
            Ok(UNIX_EPOCH + Duration::from_secs(784_111_777))
        }

        fn open(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
            let content = self.get(path)?.clone();
            Ok(Box::new(Cursor::new(content)))
        }
    }

    #[test]
    fn resolve_stays_inside_root() {
        let fs = LocalFileSystem::new("public");
        for (path, expected) in [
            ("index.html", Some("public/index.html")),
            ("/css/main.css", Some("public/css/main.css")),
            ("./a/./b.txt", Some("public/a/b.txt")),
            ("../secret.txt", None),
            ("a/../../secret.txt", None),
        ] {
            let resolved = fs.resolve(Path::new(path)).ok();
            assert_eq!(resolved, expected.map(PathBuf::from), "{path}");
        }
    }

    #[test]
    fn local_file_system_reads_files() {
        let root = std::env::temp_dir().join(format!("kvantum-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(root.join("css")).expect("create root");
        fs::write(root.join("css/main.css"), "body {}").expect("write file");

        let fs = LocalFileSystem::new(&root);
        let path = Path::new("css/main.css");
        assert!(fs.exists(path));
        assert!(!fs.exists(Path::new("css")));
        assert_eq!(fs.length(path).expect("length"), 7);
        assert!(fs.modified(path).is_ok());

        let mut content = String::new();
        fs.open(path)
            .expect("open")
            .read_to_string(&mut content)
            .expect("read");
        assert_eq!(content, "body {}");

        std::fs::remove_dir_all(&root).expect("remove root");
    }
}
