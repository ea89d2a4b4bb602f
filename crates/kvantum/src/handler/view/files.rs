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

//! Static file resolver.

use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{trace, warn};

use crate::fs::FileSystem;
use crate::handler::{Error, Result};
use crate::http::request::meta;
use crate::http::{Body, Header, Request, Response, Status};
use crate::pattern::{Template, EXTENSION, FILE, FOLDER};

use super::{Extension, Resolver};

// ----------------------------------------------------------------------------
// Constants
// ----------------------------------------------------------------------------

/// Default file name substituted for an empty `{file}` variable.
const DEFAULT_FILE: &str = "index";

/// Default size up to which files are read into memory.
const DEFAULT_BUFFER: u64 = 64 * 1024;

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Static file resolver.
///
/// Renders a file name from the variables captured by a file pattern, and
/// serves it if it exists and has a whitelisted extension. A captured
/// `{folder}` is prepended, unless the template contains it. Files larger
/// than the buffer size are streamed.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use std::sync::Arc;
/// use kvantum::fs::LocalFileSystem;
/// use kvantum::handler::{StaticFiles, View};
/// use kvantum::handler::view::Extension;
/// use kvantum::pattern::FilePattern;
///
/// // Create resolver for stylesheets
/// let files = StaticFiles::new(Arc::new(LocalFileSystem::new("public")))
///     .folder("css")
///     .extensions([Extension::CSS])
///     .default_extension("css");
///
/// // Create view serving them
/// let view = View::builder(FilePattern::new("/css/{file}.{extension}")?, files)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct StaticFiles {
    /// File system.
    fs: Arc<dyn FileSystem>,
    /// Folder relative to the file system root.
    folder: PathBuf,
    /// File name template.
    template: Template,
    /// Whitelisted extensions.
    extensions: Vec<Extension>,
    /// Extension used when none is captured.
    default_extension: Option<String>,
    /// File name used when `{file}` is empty.
    default_file: String,
    /// Extension rewrites, from requested to stored.
    rewrites: BTreeMap<String, String>,
    /// Size up to which files are read into memory.
    buffer: u64,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl StaticFiles {
    /// Creates a static file resolver.
    ///
    /// By default, files are looked up at the root of the file system, with
    /// the `{file}.{extension}` template and all built-in extensions.
    #[must_use]
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            folder: PathBuf::new(),
            template: Template::default(),
            extensions: Extension::ALL.to_vec(),
            default_extension: None,
            default_file: DEFAULT_FILE.to_string(),
            rewrites: BTreeMap::new(),
            buffer: DEFAULT_BUFFER,
        }
    }

    /// Sets the folder relative to the file system root.
    #[inline]
    #[must_use]
    pub fn folder<P>(mut self, folder: P) -> Self
    where
        P: Into<PathBuf>,
    {
        self.folder = folder.into();
        self
    }

    /// Sets the file name template.
    #[inline]
    #[must_use]
    pub fn template(mut self, template: Template) -> Self {
        self.template = template;
        self
    }

    /// Sets the whitelisted extensions.
    #[inline]
    #[must_use]
    pub fn extensions<I>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = Extension>,
    {
        self.extensions = extensions.into_iter().collect();
        self
    }

    /// Sets the extension used when the pattern captures none.
    #[inline]
    #[must_use]
    pub fn default_extension<S>(mut self, extension: S) -> Self
    where
        S: Into<String>,
    {
        self.default_extension = Some(extension.into());
        self
    }

    /// Sets the file name used when `{file}` is empty.
    #[inline]
    #[must_use]
    pub fn default_file<S>(mut self, file: S) -> Self
    where
        S: Into<String>,
    {
        self.default_file = file.into();
        self
    }

    /// Adds an extension rewrite, e.g., to serve `.html` requests from
    /// `.htm` files.
    #[inline]
    #[must_use]
    pub fn rewrite<F, T>(mut self, from: F, to: T) -> Self
    where
        F: Into<String>,
        T: Into<String>,
    {
        self.rewrites.insert(from.into(), to.into());
        self
    }

    /// Sets the size up to which files are read into memory.
    #[inline]
    #[must_use]
    pub fn buffer(mut self, buffer: u64) -> Self {
        self.buffer = buffer;
        self
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Resolver for StaticFiles {
    /// Checks that the rendered file exists and has a whitelisted extension.
    ///
    /// The file path, its length and extension are stored in the request's
    /// metadata, along with the variables after default substitution.
    fn passes(&self, req: &mut Request) -> Result<bool> {
        let Some(mut variables) = req.variables().cloned() else {
            return Ok(false);
        };

        // Substitute defaults for absent or empty variables
        if let Some(extension) = &self.default_extension {
            if variables.get(EXTENSION).is_none_or(str::is_empty) {
                variables.insert(EXTENSION, extension.as_str());
            }
        }
        if variables.get(FILE).is_none_or(str::is_empty) {
            variables.insert(FILE, self.default_file.as_str());
        }

        // Render file name
        let Some(mut name) = self.template.render(&variables) else {
            trace!(template = self.template.as_str(), "incomplete variables");
            return Ok(false);
        };

        // Determine extension and check whitelist
        let requested = match variables.get(EXTENSION) {
            Some(value) => value.to_string(),
            None => match Path::new(&name).extension().and_then(OsStr::to_str) {
                Some(value) => value.to_string(),
                None => return Ok(false),
            },
        };
        let Some(extension) =
            self.extensions.iter().find(|ext| ext.matches(&requested)).copied()
        else {
            warn!(extension = requested.as_str(), "unknown extension");
            return Ok(false);
        };

        // Apply extension rewrite
        if let Some(target) = self.rewrites.get(&requested) {
            if let Some(stem) = name.strip_suffix(requested.as_str()) {
                name = format!("{stem}{target}");
            }
        }

        // Prefix captured folder, unless the template placed it already
        let mut path = self.folder.clone();
        if !self.template.contains(FOLDER) {
            if let Some(folder) = variables.get(FOLDER) {
                path.push(folder.trim_start_matches('/'));
            }
        }

        // Check that the file exists
        path.push(name.trim_start_matches('/'));
        if !self.fs.exists(&path) {
            trace!(path = %path.display(), "file not found");
            return Ok(false);
        }
        let length = self.fs.length(&path)?;

        req.meta.insert(meta::FILE, path);
        req.meta.insert(meta::FILE_LENGTH, length);
        req.meta.insert(meta::EXTENSION, extension);
        req.meta.insert(meta::VARIABLES, variables);
        Ok(true)
    }

    fn generate(&self, req: &mut Request) -> Result<Response> {
        let path = req
            .meta
            .get::<PathBuf>(meta::FILE)
            .ok_or(Error::Missing(meta::FILE))?;
        let length = req
            .meta
            .get::<u64>(meta::FILE_LENGTH)
            .copied()
            .ok_or(Error::Missing(meta::FILE_LENGTH))?;
        let extension = req
            .meta
            .get::<Extension>(meta::EXTENSION)
            .copied()
            .ok_or(Error::Missing(meta::EXTENSION))?;

        // Add headers
        let mut res = Response::new()
            .status(Status::Ok)
            .header(Header::ContentType, extension.content_type())
            .header(Header::ContentLength, length);
        if let Ok(modified) = self.fs.modified(path) {
            let value = httpdate::fmt_http_date(modified);
            res = res.header(Header::LastModified, value);
        }

        // Stream large files, read small ones
        let mut reader = self.fs.open(path)?;
        let body = if length > self.buffer {
            Body::Stream { reader, length }
        } else {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes)?;
            Body::Bytes(bytes)
        };
        Ok(res.body(body))
    }
}

// ----------------------------------------------------------------------------

impl fmt::Debug for StaticFiles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticFiles")
            .field("folder", &self.folder)
            .field("template", &self.template.as_str())
            .field("extensions", &self.extensions)
            .field("default_extension", &self.default_extension)
            .field("default_file", &self.default_file)
            .field("rewrites", &self.rewrites)
            .field("buffer", &self.buffer)
            .finish_non_exhaustive()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::tests::Memory;
    use crate::handler::{RequestHandler, View};
    use crate::pattern::FilePattern;

    fn site() -> Arc<dyn FileSystem> {
        Arc::new(
            Memory::default()
                .file("public/index.html", "<h1>home</h1>")
                .file("public/about.html", "<h1>about</h1>")
                .file("public/legacy.htm", "<h1>legacy</h1>")
                .file("public/css/main.css", "body {}")
                .file("public/notes.md", "# notes")
                .file("public/video.mp4", vec![0; 32]),
        )
    }

    fn view(pattern: &str, files: StaticFiles) -> View<StaticFiles> {
        View::builder(FilePattern::new(pattern), files.folder("public"))
            .build()
            .expect("view")
    }

    #[test]
    fn serves_existing_files() {
        let view = view("/{folder}/{file}.{extension}", StaticFiles::new(site()));
        let mut req = Request::new().uri("/css/main.css");

        assert!(view.matches(&mut req).expect("no error"));
        let res = view.generate(&mut req).expect("response");
        assert_eq!(res.status, Status::Ok);
        assert_eq!(res.headers.get(Header::ContentType), Some("text/css"));
        assert_eq!(res.headers.get(Header::ContentLength), Some("7"));
        assert_eq!(
            res.headers.get(Header::LastModified),
            Some("Sun, 06 Nov 1994 08:49:37 GMT")
        );
        assert_eq!(res.body.into_bytes().expect("body"), b"body {}");
    }

    #[test]
    fn rejects_missing_and_unlisted_files() {
        let files = StaticFiles::new(site()).extensions([Extension::HTML]);
        let view = view("/{file}.{extension}", files);
        for path in ["/missing.html", "/notes.md", "/video.mp4"] {
            let mut req = Request::new().uri(path);
            assert!(!view.matches(&mut req).expect("no error"), "{path}");
            assert!(!req.meta.contains(meta::FILE), "{path}");
        }
    }

    #[test]
    fn substitutes_defaults() {
        let files = StaticFiles::new(site()).default_extension("html");
        let view = view("/{file}", files);
        for (path, expected) in [
            ("/", "<h1>home</h1>"), // fmt
            ("/about", "<h1>about</h1>"),
        ] {
            let mut req = Request::new().uri(path);
            assert!(view.matches(&mut req).expect("no error"), "{path}");
            let res = view.generate(&mut req).expect("response");
            assert_eq!(res.body.into_bytes().expect("body"), expected.as_bytes());
        }
    }

    #[test]
    fn rewrites_extensions() {
        let files = StaticFiles::new(site()).rewrite("html", "htm");
        let view = view("/{file}.{extension}", files);
        let mut req = Request::new().uri("/legacy.html");

        assert!(view.matches(&mut req).expect("no error"));
        assert_eq!(
            req.meta.get::<PathBuf>(meta::FILE),
            Some(&PathBuf::from("public/legacy.htm"))
        );
        assert_eq!(
            req.meta.get::<Extension>(meta::EXTENSION),
            Some(&Extension::HTML)
        );
    }

    #[test]
    fn streams_large_files() {
        let view = view("/{file}.{extension}", StaticFiles::new(site()).buffer(16));
        let mut req = Request::new().uri("/video.mp4");

        assert!(view.matches(&mut req).expect("no error"));
        let res = view.generate(&mut req).expect("response");
        assert!(res.body.is_stream());
        assert_eq!(res.body.len(), 32);
        assert_eq!(res.headers.get(Header::ContentType), Some("video/mp4"));
    }

    #[test]
    fn generate_requires_metadata() {
        let files = StaticFiles::new(site());
        let err = files.generate(&mut Request::new()).expect_err("missing");
        assert!(matches!(err, Error::Missing(meta::FILE)));
    }
}
