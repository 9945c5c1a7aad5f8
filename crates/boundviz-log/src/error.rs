use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The two data-collecting sections of a solver log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    RootBounds,
    VarDetails,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::RootBounds => f.write_str("root-bounds"),
            Section::VarDetails => f.write_str("variable-details"),
        }
    }
}

/// Failures that abort chart generation for one instance.
///
/// None of these are fatal to a run: the driver records them in the file
/// report and moves on to the next instance or file.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseError {
    #[error("malformed {section} row `{key}`: column `{column}` holds non-numeric token `{token}`")]
    MalformedRow {
        section: Section,
        key: String,
        column: String,
        token: String,
    },
    #[error("{section} table has no `{column}` column")]
    MissingColumn { section: Section, column: String },
}
