//! Semantic version triple for concept versions

use serde::{Deserialize, Serialize};
use std::fmt;

/// `major.minor.patch` version of a concept
///
/// Field order matters: the derived `Ord` compares (major, minor, patch)
/// lexicographically, which is the ordering of versions within a lineage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SemVer {
    /// Major version
    pub major: u32,
    /// Minor version
    pub minor: u32,
    /// Patch version
    pub patch: u32,
}

impl SemVer {
    /// Create a version from its parts
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self { major, minor, patch }
    }

    /// Version assigned to the first version of a new lineage
    pub fn initial() -> Self {
        Self::new(0, 1, 0)
    }

    /// The version following this one for a new revision
    ///
    /// `None` when the patch number is exhausted.
    pub fn next_patch(&self) -> Option<Self> {
        let patch = self.patch.checked_add(1)?;
        Some(Self::new(self.major, self.minor, patch))
    }

    /// Parse a strict `N.N.N` string
    ///
    /// # Examples
    ///
    /// ```
    /// use begrep_domain::SemVer;
    ///
    /// assert_eq!(SemVer::parse("1.0.2").unwrap(), SemVer::new(1, 0, 2));
    /// assert!(SemVer::parse("1").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, String> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3
            || parts
                .iter()
                .any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()))
        {
            return Err(format!("'{}' is not a major.minor.patch version", s));
        }

        let number = |p: &str| {
            p.parse::<u32>()
                .map_err(|e| format!("version part '{}' out of range: {}", p, e))
        };

        Ok(Self::new(number(parts[0])?, number(parts[1])?, number(parts[2])?))
    }
}

impl fmt::Display for SemVer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl std::str::FromStr for SemVer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(SemVer::parse("1.0.0").unwrap(), SemVer::new(1, 0, 0));
        assert_eq!(SemVer::parse("10.20.30").unwrap(), SemVer::new(10, 20, 30));
    }

    #[test]
    fn test_parse_invalid() {
        for bad in ["1", "1.0", "1.0.0.0", "a.b.c", "1..0", "", "1.0.-1", " 1.0.0"] {
            assert!(SemVer::parse(bad).is_err(), "{} should be rejected", bad);
        }
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        assert!(SemVer::new(1, 0, 0) > SemVer::new(0, 9, 9));
        assert!(SemVer::new(1, 2, 0) > SemVer::new(1, 1, 9));
        assert!(SemVer::new(1, 1, 2) > SemVer::new(1, 1, 1));
    }

    #[test]
    fn test_next_patch() {
        assert_eq!(SemVer::new(1, 0, 0).next_patch(), Some(SemVer::new(1, 0, 1)));
        assert_eq!(SemVer::initial(), SemVer::new(0, 1, 0));
    }

    #[test]
    fn test_next_patch_exhausted() {
        let last = SemVer::parse("1.0.4294967295").unwrap();
        assert_eq!(last.next_patch(), None);
    }
}
