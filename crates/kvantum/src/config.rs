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

//! Configuration.
//!
//! All settings are optional, so an empty file yields the defaults. Settings
//! are grouped by concern, e.g., `[ssl]` or `[files]`.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

mod error;

pub use error::{Error, Result};

// ----------------------------------------------------------------------------
// Structs
// ----------------------------------------------------------------------------

/// Configuration.
///
/// # Examples
///
/// ```
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use kvantum::config::Config;
///
/// // Parse configuration
/// let config: Config = r#"
///     debug = true
///     web_address = "example.com"
///
///     [ssl]
///     port = 8443
/// "#.parse()?;
/// assert!(config.debug);
/// assert_eq!(config.ssl.port, 8443);
/// assert_eq!(config.files.buffer, 65536);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Whether to enable debug middleware and outcomes.
    pub debug: bool,
    /// Public address, used in redirects.
    pub web_address: String,
    /// TLS settings.
    pub ssl: Ssl,
    /// Static file settings.
    pub files: Files,
}

/// TLS settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Ssl {
    /// Port HTTPS requests are redirected to.
    pub port: u16,
}

/// Static file settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Files {
    /// Root directory.
    pub root: PathBuf,
    /// Size up to which files are read into memory, in bytes.
    pub buffer: u64,
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Config {
    /// Loads and parses the configuration file at the given path.
    ///
    /// # Errors
    ///
    /// This method returns [`Error::Io`], if the file can't be read, and
    /// [`Error::Toml`], if it isn't valid.
    pub fn from_path<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        fs::read_to_string(path)?.parse()
    }
}

// ----------------------------------------------------------------------------
// Trait implementations
// ----------------------------------------------------------------------------

impl Default for Config {
    fn default() -> Self {
        Self {
            debug: false,
            web_address: String::from("localhost"),
            ssl: Ssl::default(),
            files: Files::default(),
        }
    }
}

impl Default for Ssl {
    fn default() -> Self {
        Self { port: 443 }
    }
}

impl Default for Files {
    fn default() -> Self {
        Self {
            root: PathBuf::from("public"),
            buffer: 64 * 1024,
        }
    }
}

// ----------------------------------------------------------------------------

impl FromStr for Config {
    type Err = Error;

    /// Parses a configuration from TOML.
    fn from_str(value: &str) -> Result<Self> {
        toml::from_str(value).map_err(Into::into)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yields_defaults() {
        let config: Config = "".parse().expect("config");
        assert_eq!(config, Config::default());
        assert_eq!(config.web_address, "localhost");
        assert_eq!(config.ssl.port, 443);
        assert_eq!(config.files.root, PathBuf::from("public"));
    }

    #[test]
    fn partial_sections_keep_defaults() {
        let config: Config = "[files]\nroot = \"site\"".parse().expect("config");
        assert_eq!(config.files.root, PathBuf::from("site"));
        assert_eq!(config.files.buffer, 65536);
        assert!(!config.debug);
    }

    #[test]
    fn invalid_toml_is_rejected() {
        for value in ["debug = 1", "[ssl]\nport = -1", "web_address ="] {
            let res = value.parse::<Config>();
            assert!(matches!(res, Err(Error::Toml(_))), "{value}");
        }
    }

    #[test]
    fn missing_file_is_io_error() {
        let res = Config::from_path("does/not/exist.toml");
        assert!(matches!(res, Err(Error::Io(_))));
    }
}
