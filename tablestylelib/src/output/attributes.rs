//! Table-level rendering metadata: classes, labels and the page window.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::StylerError;
use crate::style::ClassSet;
use crate::Result;

/// A validated pagination window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub index: usize,
    pub size: usize,
}

impl Page {
    /// Rejects a negative index or a non-positive size.
    pub fn new(page_index: i64, page_size: i64) -> Result<Self> {
        if page_index < 0 || page_size <= 0 {
            return Err(StylerError::InvalidRange {
                page_index,
                page_size,
            });
        }
        Ok(Self {
            index: page_index as usize,
            size: page_size as usize,
        })
    }

    /// First row of the page.
    pub fn offset(&self) -> usize {
        self.index.saturating_mul(self.size)
    }
}

/// Classes, display labels and pagination for one table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableAttributes {
    pub table_classes: ClassSet,
    pub header_classes: ClassSet,
    labels: IndexMap<String, String>,
    page: Option<Page>,
}

impl TableAttributes {
    /// Identity labels for `columns`, in order.
    pub fn new<S: AsRef<str>>(columns: &[S]) -> Self {
        Self {
            labels: columns
                .iter()
                .map(|c| (c.as_ref().to_string(), c.as_ref().to_string()))
                .collect(),
            ..Default::default()
        }
    }

    /// Display label of `column`, falling back to the name itself.
    pub fn label<'a>(&'a self, column: &'a str) -> &'a str {
        self.labels.get(column).map(String::as_str).unwrap_or(column)
    }

    pub fn labels(&self) -> &IndexMap<String, String> {
        &self.labels
    }

    /// Override labels by column name. Nothing changes if any name is
    /// unknown.
    pub fn relabel_map<K, V>(&mut self, mapping: impl IntoIterator<Item = (K, V)>) -> Result<()>
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mapping: Vec<(String, String)> = mapping
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        if let Some((unknown, _)) = mapping.iter().find(|(k, _)| !self.labels.contains_key(k)) {
            return Err(StylerError::ShapeMismatch(format!(
                "cannot relabel unknown column '{}'",
                unknown
            )));
        }
        for (column, label) in mapping {
            self.labels.insert(column, label);
        }
        Ok(())
    }

    /// Replace every label, in column order.
    pub fn relabel_list<S: AsRef<str>>(&mut self, labels: &[S]) -> Result<()> {
        if labels.len() != self.labels.len() {
            return Err(StylerError::ShapeMismatch(format!(
                "got {} labels for {} columns",
                labels.len(),
                self.labels.len()
            )));
        }
        for (current, label) in self.labels.values_mut().zip(labels) {
            *current = label.as_ref().to_string();
        }
        Ok(())
    }

    /// Derive each label from its column name.
    pub fn relabel_with<F: Fn(&str) -> String>(&mut self, derive: F) {
        for (column, label) in self.labels.iter_mut() {
            *label = derive(column);
        }
    }

    pub fn page(&self) -> Option<Page> {
        self.page
    }

    pub fn set_page(&mut self, page: Page) {
        self.page = Some(page);
    }
}
