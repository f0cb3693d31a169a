//! Generic labeled tabular dataset.
//!
//! A [`DataGrid`] is an ordered list of rows, each made of a fixed number of
//! numeric feature columns followed by one categorical class column. The
//! class attribute is always the last attribute.
use crate::error::{Error, Result};

/// Column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Numeric,
    Categorical,
}

/// Named, typed column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub kind: AttributeKind,
}

impl Attribute {
    pub fn numeric(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: AttributeKind::Numeric }
    }

    pub fn categorical(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: AttributeKind::Categorical }
    }
}

/// One row: explanatory variables plus class label.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub features: Vec<f64>,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataGrid {
    features: Vec<Attribute>,
    class: Attribute,
    rows: Vec<Row>,
}

impl DataGrid {
    /// Empty grid with the given feature attributes and class attribute.
    pub fn new(features: Vec<Attribute>, class: Attribute) -> Self {
        Self { features, class, rows: Vec::new() }
    }

    /// Grid with `n` numeric features named by column index and a
    /// categorical class column named `n`.
    pub fn with_indexed_features(n: usize) -> Self {
        let features = (0..n).map(|j| Attribute::numeric(j.to_string())).collect();
        Self::new(features, Attribute::categorical(n.to_string()))
    }

    /// Append a row; its feature count must match the grid's.
    pub fn push_row(&mut self, features: Vec<f64>, label: impl Into<String>) -> Result<()> {
        if features.len() != self.features.len() {
            return Err(Error::data(format!(
                "row {} has {} features, expected {}",
                self.rows.len(),
                features.len(),
                self.features.len()
            )));
        }
        self.rows.push(Row { features, label: label.into() });
        Ok(())
    }

    pub fn reserve(&mut self, additional: usize) {
        self.rows.reserve(additional);
    }

    /// `(cols, rows)`, the class column included in `cols`.
    pub fn size(&self) -> (usize, usize) {
        (self.features.len() + 1, self.rows.len())
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, i: usize) -> Option<&Row> {
        self.rows.get(i)
    }

    pub fn class_attribute(&self) -> &Attribute {
        &self.class
    }

    /// All attributes, class attribute last.
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.features.iter().chain(std::iter::once(&self.class))
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.label.as_str())
    }

    /// Grid holding the rows at `indices`, in that order, same attributes.
    pub fn select(&self, indices: &[usize]) -> Self {
        let rows = indices.iter().filter_map(|&i| self.rows.get(i).cloned()).collect();
        Self { features: self.features.clone(), class: self.class.clone(), rows }
    }

    /// Prediction vector for this grid: only the class attribute, one row
    /// per input row, labels empty until set with [`DataGrid::set_class`].
    pub fn prediction_vector(&self) -> Self {
        let rows = self
            .rows
            .iter()
            .map(|_| Row { features: Vec::new(), label: String::new() })
            .collect();
        Self { features: Vec::new(), class: self.class.clone(), rows }
    }

    /// Overwrite the class label of row `i`.
    pub fn set_class(&mut self, i: usize, label: impl Into<String>) -> Result<()> {
        let n = self.rows.len();
        let row = self
            .rows
            .get_mut(i)
            .ok_or_else(|| Error::data(format!("row {} out of range ({} rows)", i, n)))?;
        row.label = label.into();
        Ok(())
    }
}
