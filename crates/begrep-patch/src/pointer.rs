//! RFC 6901 JSON pointers

use crate::PatchError;
use std::fmt;

/// A parsed JSON pointer: a list of unescaped reference tokens
///
/// The empty pointer (`""`) addresses the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JsonPointer {
    tokens: Vec<String>,
}

impl JsonPointer {
    /// The pointer to the whole document
    pub fn root() -> Self {
        Self { tokens: Vec::new() }
    }

    /// Parse a pointer string
    ///
    /// # Examples
    ///
    /// ```
    /// use begrep_patch::JsonPointer;
    ///
    /// let pointer = JsonPointer::parse("/internalFields/a~1b").unwrap();
    /// assert_eq!(pointer.tokens(), ["internalFields", "a/b"]);
    /// assert!(JsonPointer::parse("preferredTerm").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, PatchError> {
        if s.is_empty() {
            return Ok(Self::root());
        }
        let rest = s
            .strip_prefix('/')
            .ok_or_else(|| PatchError::InvalidPointer(s.to_string()))?;

        let tokens = rest
            .split('/')
            .map(|token| unescape(token).ok_or_else(|| PatchError::InvalidPointer(s.to_string())))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { tokens })
    }

    /// Build a pointer from unescaped tokens
    pub fn from_tokens<I, T>(tokens: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            tokens: tokens.into_iter().map(Into::into).collect(),
        }
    }

    /// Unescaped reference tokens
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Whether this is the root pointer
    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Pointer to a child of this location
    pub fn child(&self, token: impl Into<String>) -> Self {
        let mut tokens = self.tokens.clone();
        tokens.push(token.into());
        Self { tokens }
    }

    /// Parent pointer and last token; `None` for the root
    pub fn split_last(&self) -> Option<(JsonPointer, &str)> {
        let (last, parent) = self.tokens.split_last()?;
        Some((
            JsonPointer {
                tokens: parent.to_vec(),
            },
            last.as_str(),
        ))
    }

    /// Whether `self` equals `other` or lies below it
    pub fn starts_with(&self, other: &JsonPointer) -> bool {
        self.tokens.len() >= other.tokens.len()
            && self.tokens[..other.tokens.len()] == other.tokens[..]
    }

    /// Whether one pointer contains the other
    pub fn overlaps(&self, other: &JsonPointer) -> bool {
        self.starts_with(other) || other.starts_with(self)
    }
}

impl fmt::Display for JsonPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.tokens {
            write!(f, "/{}", escape(token))?;
        }
        Ok(())
    }
}

/// Escape a reference token (`~` → `~0`, `/` → `~1`)
pub fn escape(token: &str) -> String {
    token.replace('~', "~0").replace('/', "~1")
}

fn unescape(token: &str) -> Option<String> {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();
    while let Some(c) = chars.next() {
        if c == '~' {
            match chars.next() {
                Some('0') => out.push('~'),
                Some('1') => out.push('/'),
                _ => return None,
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        let pointer = JsonPointer::parse("/preferredTerm/nb").unwrap();
        assert_eq!(pointer.tokens(), ["preferredTerm", "nb"]);
        assert_eq!(pointer.to_string(), "/preferredTerm/nb");

        let escaped = JsonPointer::parse("/a~0b/c~1d").unwrap();
        assert_eq!(escaped.tokens(), ["a~b", "c/d"]);
        assert_eq!(escaped.to_string(), "/a~0b/c~1d");
    }

    #[test]
    fn test_root_and_empty_tokens() {
        assert!(JsonPointer::parse("").unwrap().is_root());
        assert_eq!(JsonPointer::parse("/").unwrap().tokens(), [""]);
    }

    #[test]
    fn test_invalid_pointers() {
        assert!(JsonPointer::parse("id").is_err());
        assert!(JsonPointer::parse("/a~2").is_err());
        assert!(JsonPointer::parse("/a~").is_err());
    }

    #[test]
    fn test_prefix_relations() {
        let history = JsonPointer::parse("/history").unwrap();
        let change = JsonPointer::parse("/history/changeElement/0").unwrap();
        let other = JsonPointer::parse("/historyNotes").unwrap();

        assert!(change.starts_with(&history));
        assert!(!history.starts_with(&change));
        assert!(history.overlaps(&change));
        assert!(!other.overlaps(&history));
        assert!(JsonPointer::root().overlaps(&history));
    }
}
