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

//! Pattern tokenizer.

use std::collections::HashSet;
use std::mem;

use super::error::{Error, Result};

// ----------------------------------------------------------------------------
// Enums
// ----------------------------------------------------------------------------

/// Pattern token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Token {
    /// Literal text.
    Literal(String),
    /// Named placeholder.
    Variable(String),
    /// Named placeholder that may be absent, with an optional default.
    Optional {
        /// Variable name.
        name: String,
        /// Value bound when absent.
        default: Option<String>,
    },
}

// ----------------------------------------------------------------------------
// Implementations
// ----------------------------------------------------------------------------

impl Token {
    /// Returns the variable name, if the token is a placeholder.
    pub fn name(&self) -> Option<&str> {
        match self {
            Token::Literal(_) => None,
            Token::Variable(name) | Token::Optional { name, .. } => Some(name),
        }
    }
}

// ----------------------------------------------------------------------------
// Functions
// ----------------------------------------------------------------------------

/// Strips a single leading `./` or `/` from a path or pattern.
pub fn strip_leading(value: &str) -> &str {
    value
        .strip_prefix("./")
        .or_else(|| value.strip_prefix('/'))
        .unwrap_or(value)
}

/// Strips a single leading `./` or `/`, and a single trailing `/`.
pub fn normalize(value: &str) -> &str {
    let value = strip_leading(value);
    value.strip_suffix('/').unwrap_or(value)
}

/// Splits a pattern into literals and `{name}` placeholders.
///
/// Adjacent literal characters are merged into a single token, so literal
/// and placeholder tokens alternate, unless two placeholders are adjacent.
/// A placeholder written as `{name?}` may be absent, and `{name=value}` is
/// absent with a default value.
pub fn tokenize(pattern: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut names = HashSet::new();

    // Consume characters, collecting literal text until a placeholder opens
    let mut literal = String::new();
    let mut chars = pattern.chars();
    while let Some(char) = chars.next() {
        match char {
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') => {
                            return Err(Error::Nested(pattern.to_string()));
                        }
                        Some(char) => name.push(char),
                        None => {
                            return Err(Error::Unclosed(pattern.to_string()));
                        }
                    }
                }

                // Split off optional marker or default value
                let token = if let Some((key, default)) = name.split_once('=') {
                    Token::Optional {
                        name: key.to_string(),
                        default: (!default.is_empty())
                            .then(|| default.to_string()),
                    }
                } else if let Some(key) = name.strip_suffix('?') {
                    Token::Optional { name: key.to_string(), default: None }
                } else {
                    Token::Variable(name)
                };

                // Placeholder names must be present and unique
                let name = token.name().unwrap_or_default();
                if name.is_empty() {
                    return Err(Error::Empty(pattern.to_string()));
                }
                if !names.insert(name.to_string()) {
                    return Err(Error::Duplicate {
                        pattern: pattern.to_string(),
                        name: name.to_string(),
                    });
                }

                // Flush pending literal before the placeholder
                if !literal.is_empty() {
                    tokens.push(Token::Literal(mem::take(&mut literal)));
                }
                tokens.push(token);
            }
            '}' => return Err(Error::Unopened(pattern.to_string())),
            _ => literal.push(char),
        }
    }

    // Flush trailing literal
    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }
    Ok(tokens)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn literal(value: &str) -> Token {
        Token::Literal(value.to_string())
    }

    fn variable(value: &str) -> Token {
        Token::Variable(value.to_string())
    }

    #[test]
    fn normalizes_slashes() {
        for (value, expected) in [
            ("/", ""),
            ("", ""),
            ("./a/b/", "a/b"),
            ("//a//", "/a/"),
            ("a/b", "a/b"),
        ] {
            assert_eq!(normalize(value), expected, "{value:?}");
        }
    }

    #[test]
    fn strips_leading_slashes_only() {
        assert_eq!(strip_leading("./user/"), "user/");
        assert_eq!(strip_leading("//user"), "/user");
        assert_eq!(strip_leading(".//user"), "/user");
    }

    #[test]
    fn splits_literals_and_placeholders() {
        assert_eq!(
            tokenize("plot/{world}/{id}").ok(),
            Some(vec![
                literal("plot/"),
                variable("world"),
                literal("/"),
                variable("id"),
            ])
        );
        assert_eq!(
            tokenize("{file}.{extension}").ok(),
            Some(vec![variable("file"), literal("."), variable("extension")])
        );
        assert_eq!(tokenize("").ok(), Some(vec![]));
    }

    #[test]
    fn parses_optional_placeholders() {
        assert_eq!(
            tokenize("news/{page=0}/{tag?}/{sort=}").ok(),
            Some(vec![
                literal("news/"),
                Token::Optional {
                    name: "page".into(),
                    default: Some("0".into()),
                },
                literal("/"),
                Token::Optional { name: "tag".into(), default: None },
                literal("/"),
                Token::Optional { name: "sort".into(), default: None },
            ])
        );
    }

    #[test]
    fn rejects_malformed_placeholders() {
        for (pattern, error) in [
            ("a/{b", Error::Unclosed("a/{b".into())),
            ("a/b}", Error::Unopened("a/b}".into())),
            ("a/{b{c}}", Error::Nested("a/{b{c}}".into())),
            ("a/{}", Error::Empty("a/{}".into())),
            ("a/{?}", Error::Empty("a/{?}".into())),
            ("a/{=1}", Error::Empty("a/{=1}".into())),
            (
                "{x}/{x?}",
                Error::Duplicate { pattern: "{x}/{x?}".into(), name: "x".into() },
            ),
            (
                "{x}/{x}",
                Error::Duplicate { pattern: "{x}/{x}".into(), name: "x".into() },
            ),
        ] {
            assert_eq!(tokenize(pattern), Err(error), "{pattern:?}");
        }
    }
}
