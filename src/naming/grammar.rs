//! The array file name grammar.
//!
//! ```text
//! name        := ident ("." ident)* "." backend ["." compression]
//! ident       := [A-Za-z0-9_-]+
//! backend     := [A-Za-z0-9_-]+
//! ```
//!
//! The grammar itself cannot tell a backend from a compression tag, so a post-pass
//! reinterprets the trailing token when it names a known compression.

use hashbrown::HashSet;
use std::fmt;

/// The structured result of parsing one file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub prefixes: Vec<String>,
    pub backend: String,
    pub compression: Option<String>,
}

/// Where and why parsing stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarError {
    pub input: String,
    /// Zero-based character position of the failure.
    pub position: usize,
    pub expected: String,
    pub found: Option<char>,
}

impl GrammarError {
    /// A human-readable explanation with a caret under the failing column.
    pub fn explain(&self) -> String {
        let found = match self.found {
            Some(c) => format!("found '{}'", c),
            None => "found end of name".to_string(),
        };
        format!(
            "Expected {}, {} (at char {}), (line:1, col:{})\n{}\n{}^",
            self.expected,
            found,
            self.position,
            self.position + 1,
            self.input,
            " ".repeat(self.position)
        )
    }
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.explain())
    }
}

impl std::error::Error for GrammarError {}

pub fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Parses sanitized file names. Holds the set of tags that count as compression.
#[derive(Debug, Clone, Default)]
pub struct NameGrammar {
    compression_tags: HashSet<String>,
}

impl NameGrammar {
    pub fn new<I, S>(compression_tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            compression_tags: compression_tags.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_compression_tag(&self, tag: &str) -> bool {
        self.compression_tags.contains(tag)
    }

    /// Parses a whole file name; partial matches are rejected.
    pub fn parse(&self, name: &str) -> Result<ParsedName, GrammarError> {
        let chars: Vec<char> = name.chars().collect();
        let tokens = tokenize(name, &chars)?;

        let Some((trailing, idents)) = tokens.split_last() else {
            return Err(error_at(name, 0, "identifier [A-Za-z0-9_-]", chars.first()));
        };
        if idents.is_empty() {
            return Err(error_at(
                name,
                chars.len(),
                "'.' followed by a backend tag",
                None,
            ));
        }

        let mut prefixes: Vec<String> = idents.to_vec();
        if !self.is_compression_tag(trailing) {
            return Ok(ParsedName {
                prefixes,
                backend: trailing.clone(),
                compression: None,
            });
        }

        // The trailing token is a compression tag: the one before it is the backend.
        let backend = prefixes.pop().unwrap_or_default();
        if prefixes.is_empty() {
            return Err(error_at(
                name,
                0,
                &format!(
                    "an identifier and a backend tag before compression tag '{}'",
                    trailing
                ),
                chars.first(),
            ));
        }
        Ok(ParsedName {
            prefixes,
            backend,
            compression: Some(trailing.clone()),
        })
    }
}

/// Splits `name` into tokens, enforcing the identifier class and
/// that every '.' separates two non-empty tokens.
fn tokenize(name: &str, chars: &[char]) -> Result<Vec<String>, GrammarError> {
    let mut tokens = Vec::new();
    let mut pos = 0;
    loop {
        let start = pos;
        while pos < chars.len() && is_ident_char(chars[pos]) {
            pos += 1;
        }
        if pos == start {
            return Err(error_at(
                name,
                pos,
                "identifier [A-Za-z0-9_-]",
                chars.get(pos),
            ));
        }
        tokens.push(chars[start..pos].iter().collect());

        if pos == chars.len() {
            return Ok(tokens);
        }
        if chars[pos] != '.' {
            return Err(error_at(name, pos, "'.' or end of name", chars.get(pos)));
        }
        pos += 1;
    }
}

fn error_at(name: &str, position: usize, expected: &str, found: Option<&char>) -> GrammarError {
    GrammarError {
        input: name.to_string(),
        position,
        expected: expected.to_string(),
        found: found.copied(),
    }
}
