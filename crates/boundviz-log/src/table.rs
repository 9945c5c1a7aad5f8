use crate::error::{ParseError, Section};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Rows of one log section, kept as raw text tokens until finalisation.
///
/// The column set is discovered from the section's header line. Rows are
/// keyed (iteration index for root bounds, variable name for variable
/// details); re-inserting a key replaces the earlier row in place, so keys
/// stay unique and the first-seen position is kept.
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    header: Option<Vec<String>>,
    keys: Vec<String>,
    rows: Vec<Vec<String>>,
    index: HashMap<String, usize>,
}

impl RawTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a header line has fixed the column set.
    pub fn has_schema(&self) -> bool {
        self.header.is_some()
    }

    pub fn set_schema(&mut self, columns: Vec<String>) {
        self.header = Some(columns);
    }

    /// Discovered column names, empty before the header was seen.
    pub fn columns(&self) -> &[String] {
        self.header.as_deref().unwrap_or(&[])
    }

    /// Inserts a row. Returns `true` when an existing row with the same key was replaced.
    pub fn insert(&mut self, key: String, values: Vec<String>) -> bool {
        if let Some(&pos) = self.index.get(&key) {
            self.rows[pos] = values;
            return true;
        }
        self.index.insert(key.clone(), self.rows.len());
        self.keys.push(key);
        self.rows.push(values);
        false
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Coerces every cell to `f64`.
    ///
    /// Columns named in `skip` (such as a textual key column) are left out of
    /// the result. Rows shorter than the header leave the trailing cells
    /// missing; tokens beyond the header are dropped with a warning.
    pub fn to_numeric(&self, section: Section, skip: &[&str]) -> Result<NumericTable, ParseError> {
        let columns = self.columns();
        let mut values: Vec<Vec<Option<f64>>> = vec![Vec::with_capacity(self.len()); columns.len()];

        for (key, row) in self.keys.iter().zip(&self.rows) {
            if row.len() > columns.len() {
                log::warn!(
                    "{section} row `{key}`: {} tokens for {} columns, dropping the rest",
                    row.len(),
                    columns.len()
                );
            }
            for (col, name) in columns.iter().enumerate() {
                if skip.contains(&name.as_str()) {
                    continue;
                }
                let cell = match row.get(col) {
                    Some(token) => Some(token.parse::<f64>().map_err(|_| {
                        ParseError::MalformedRow {
                            section,
                            key: key.clone(),
                            column: name.clone(),
                            token: token.clone(),
                        }
                    })?),
                    None => None,
                };
                values[col].push(cell);
            }
        }

        let mut table = NumericTable::with_len(self.len());
        for (name, column) in columns.iter().zip(values) {
            if skip.contains(&name.as_str()) {
                continue;
            }
            table.push_column(name.clone(), column);
        }
        Ok(table)
    }
}

/// A named numeric column; `None` marks a missing value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Option<f64>>,
}

/// Schema-tagged table: an ordered list of equally long named columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericTable {
    rows: usize,
    columns: Vec<Column>,
}

impl NumericTable {
    pub fn with_len(rows: usize) -> Self {
        Self {
            rows,
            columns: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn values(&self, name: &str) -> Option<&[Option<f64>]> {
        self.column(name).map(|c| c.values.as_slice())
    }

    pub fn values_mut(&mut self, name: &str) -> Option<&mut Vec<Option<f64>>> {
        self.columns
            .iter_mut()
            .find(|c| c.name == name)
            .map(|c| &mut c.values)
    }

    /// Looks up a column the caller cannot do without.
    pub fn require(&self, section: Section, name: &str) -> Result<&[Option<f64>], ParseError> {
        self.values(name).ok_or_else(|| ParseError::MissingColumn {
            section,
            column: name.to_string(),
        })
    }

    /// Appends a column, replacing any existing column of the same name.
    ///
    /// # Panics
    ///
    /// Panics if `values` does not have one entry per row.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<Option<f64>>) {
        assert_eq!(values.len(), self.rows, "column length must match the table");
        let name = name.into();
        match self.values_mut(&name) {
            Some(existing) => *existing = values,
            None => self.columns.push(Column { name, values }),
        }
    }
}
