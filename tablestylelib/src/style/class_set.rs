//! Ordered-unique CSS class tokens.

use std::fmt;

use serde::{Deserialize, Serialize};

use polars::prelude::{Column, DataType, PolarsResult, Series};

/// An ordered set of class names.
///
/// Tokens keep their first-insertion order; re-adding a token is a no-op.
/// Strings containing whitespace are split into separate tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassSet {
    tokens: Vec<String>,
}

impl ClassSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one or more whitespace-separated tokens.
    pub fn insert(&mut self, tokens: &str) {
        for token in tokens.split_whitespace() {
            if !self.tokens.iter().any(|t| t == token) {
                self.tokens.push(token.to_string());
            }
        }
    }

    /// Union another set into this one, keeping this set's order first.
    pub fn union(&mut self, other: &ClassSet) {
        for token in &other.tokens {
            self.insert(token);
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Attribute-ready form: tokens joined by a single space.
    pub fn to_attr(&self) -> String {
        self.tokens.join(" ")
    }

    /// Read a class set from one element of a list column. Null tokens are
    /// skipped; non-string tokens are cast.
    pub fn from_series(tokens: &Series) -> PolarsResult<Self> {
        let tokens = tokens.cast(&DataType::String)?;
        Ok(tokens.str()?.into_iter().flatten().collect())
    }

    /// Attribute strings for every row of a `List(String)` column.
    pub fn column_attrs(column: &Column) -> PolarsResult<Vec<String>> {
        column
            .as_materialized_series()
            .list()?
            .into_iter()
            .map(|row| match row {
                Some(tokens) => Ok(Self::from_series(&tokens)?.to_attr()),
                None => Ok(String::new()),
            })
            .collect()
    }
}

impl fmt::Display for ClassSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_attr())
    }
}

impl<S: AsRef<str>> FromIterator<S> for ClassSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = Self::new();
        for token in iter {
            set.insert(token.as_ref());
        }
        set
    }
}

impl<S: AsRef<str>> Extend<S> for ClassSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for token in iter {
            self.insert(token.as_ref());
        }
    }
}

impl From<&str> for ClassSet {
    fn from(tokens: &str) -> Self {
        let mut set = Self::new();
        set.insert(tokens);
        set
    }
}

impl From<String> for ClassSet {
    fn from(tokens: String) -> Self {
        Self::from(tokens.as_str())
    }
}

impl From<Vec<&str>> for ClassSet {
    fn from(tokens: Vec<&str>) -> Self {
        tokens.into_iter().collect()
    }
}

impl From<Vec<String>> for ClassSet {
    fn from(tokens: Vec<String>) -> Self {
        tokens.into_iter().collect()
    }
}

impl<const N: usize> From<[&str; N]> for ClassSet {
    fn from(tokens: [&str; N]) -> Self {
        tokens.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{IntoColumn, NamedFrom};

    #[test]
    fn test_insert_splits_and_dedupes() {
        let mut set = ClassSet::from("ui celled table");
        set.insert("table selectable");
        assert_eq!(set.to_attr(), "ui celled table selectable");
    }

    #[test]
    fn test_union_is_idempotent() {
        let mut set = ClassSet::from(["a", "b"]);
        let other = ClassSet::from(["b", "c"]);
        set.union(&other);
        let once = set.clone();
        set.union(&other);
        assert_eq!(set, once);
        assert_eq!(set.to_attr(), "a b c");
    }

    #[test]
    fn test_empty_renders_empty() {
        assert_eq!(ClassSet::new().to_attr(), "");
        assert!(ClassSet::from("   ").is_empty());
    }

    #[test]
    fn test_from_series_splits_and_skips_nulls() {
        let tokens = Series::new("t".into(), [Some("z a"), None, Some("a")]);
        let set = ClassSet::from_series(&tokens).unwrap();
        assert_eq!(set.tokens(), ["z".to_string(), "a".to_string()]);
    }

    #[test]
    fn test_column_attrs_per_row() {
        let rows = Series::new(
            "c".into(),
            [
                Series::new("".into(), ["x", "y", "x"]),
                Series::new_empty("".into(), &DataType::String),
            ],
        );
        let attrs = ClassSet::column_attrs(&rows.into_column()).unwrap();
        assert_eq!(attrs, vec!["x y".to_string(), String::new()]);
    }

    #[test]
    fn test_markup_passes_through() {
        let set = ClassSet::from("<b>&");
        assert_eq!(set.to_attr(), "<b>&");
    }
}
