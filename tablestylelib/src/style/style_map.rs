//! Ordered CSS property maps with per-field merge.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use polars::prelude::{Column, DataType, PolarsResult};

/// CSS property name -> optional value, in insertion order.
///
/// A `None` value marks a field as explicitly unset: it survives merges as
/// "absent" and is skipped when serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleMap {
    fields: IndexMap<String, Option<String>>,
}

impl StyleMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set a property.
    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(property, value);
        self
    }

    /// Builder: explicitly unset a property.
    pub fn without(mut self, property: impl Into<String>) -> Self {
        self.fields.insert(property.into(), None);
        self
    }

    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(property.into(), Some(value.into()));
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.fields.get(property).and_then(|v| v.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.values().all(Option::is_none)
    }

    /// Fields in insertion order, including unset ones.
    pub fn fields(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_deref()))
    }

    /// Merge `other` into `self`: fields named in `other` win, all others are
    /// left untouched. Existing fields keep their position.
    pub fn merge(&mut self, other: &StyleMap) {
        for (property, value) in &other.fields {
            self.fields.insert(property.clone(), value.clone());
        }
    }

    /// Attribute-ready form: `key: value` pairs joined by `"; "`, unset
    /// fields skipped.
    pub fn to_css(&self) -> String {
        self.fields
            .iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| format!("{}: {}", k, v)))
            .collect::<Vec<_>>()
            .join("; ")
    }

    /// CSS strings for every row of a struct column. Each struct field is a
    /// property; null fields are treated as unset.
    pub fn column_css(column: &Column) -> PolarsResult<Vec<String>> {
        let fields = column
            .as_materialized_series()
            .struct_()?
            .fields_as_series()
            .into_iter()
            .map(|field| Ok((field.name().to_string(), field.cast(&DataType::String)?)))
            .collect::<PolarsResult<Vec<_>>>()?;

        (0..column.len())
            .map(|row| {
                let mut map = Self::new();
                for (property, values) in &fields {
                    let value = values.str()?.get(row).map(String::from);
                    map.fields.insert(property.clone(), value);
                }
                Ok(map.to_css())
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StyleMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for StyleMap {
    fn from(fields: [(K, V); N]) -> Self {
        fields.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>> From<Vec<(K, V)>> for StyleMap {
    fn from(fields: Vec<(K, V)>) -> Self {
        fields.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_disjoint_fields_both_survive() {
        let mut style = StyleMap::from([("color", "red")]);
        style.merge(&StyleMap::from([("font-weight", "bold")]));
        assert_eq!(style.to_css(), "color: red; font-weight: bold");
    }

    #[test]
    fn test_merge_same_field_last_wins_in_place() {
        let mut style = StyleMap::from([("color", "red"), ("font-weight", "bold")]);
        style.merge(&StyleMap::from([("color", "blue")]));
        assert_eq!(style.to_css(), "color: blue; font-weight: bold");
    }

    #[test]
    fn test_unset_fields_are_skipped() {
        let style = StyleMap::new().with("color", "red").without("border");
        assert_eq!(style.to_css(), "color: red");
        let empty = StyleMap::new().without("border");
        assert!(empty.is_empty());
        assert_eq!(empty.to_css(), "");
    }

    #[test]
    fn test_column_css_from_struct() {
        use polars::prelude::*;

        let df = df!(
            "foo" => [Some(2i64), None],
            "bar" => [Some("baz"), Some("qux")]
        )
        .unwrap();
        let out = df
            .lazy()
            .select([as_struct(vec![col("foo"), col("bar")]).alias("style")])
            .collect()
            .unwrap();
        let css = StyleMap::column_css(out.column("style").unwrap()).unwrap();
        assert_eq!(css, vec!["foo: 2; bar: baz", "bar: qux"]);
    }
}
