//! # boundviz log parser
//!
//! Extracts root-node progress data from column-generation solver logs.
//!
//! ## Overview
//!
//! A solver log is unstructured text with a few recognisable sections:
//!
//! - **Run settings**: `loaded parameter file <path>` names the settings label
//! - **Original-problem header**: `Original Program statistics:` up to
//!   `Master Program statistics:` carries the instance name and solver status
//! - **Root bounds**: `Root bounds` up to `Pricing Summary:`, a tab-separated
//!   table keyed by iteration (`iter`, `pb`, `db`, ...)
//! - **Variable details**: `AddedVarDetails:` up to `Root node:`, one `VAR:`
//!   row per generated variable
//!
//! Sections are recognised by line prefix, their columns are discovered from
//! their header lines, and the two tables are joined into a
//! [`DerivedInstanceTable`](derive::DerivedInstanceTable) when the
//! variable-details section closes.
//!
//! ## Architecture
//!
//! ```text
//! line --> classify() --> Marker --> SectionParser --+--> RawTable (root bounds)
//!                                        |           +--> RawTable (variables)
//!                                        |
//!                                        | "Root node:"
//!                                        v
//!                                 derive_instance() --> InstanceOutcome
//! ```
//!
//! - [`classifier`] is stateless: it tags a line by prefix.
//! - [`parser`] owns the per-instance [`Mode`](parser::Mode) and the tables.
//! - [`derive`] coerces the tables to numbers, counts variables per
//!   iteration and normalises unset dual bounds.
//!
//! A log may hold several instances (`@01` lines separate them); each
//! `Root node:` trigger yields one [`InstanceOutcome`](ir::InstanceOutcome).
//!
//! ## Examples
//!
//! ```
//! use boundviz_log::SectionParser;
//!
//! let log = "\
//! Root bounds
//! iter\tpb\tdb
//! 0\t100\t50
//! 1\t90\t60
//! Pricing Summary:
//! AddedVarDetails:
//! VAR: name\tnode\ttime\trootredcostcall\trootlpsolval\tsolval
//! VAR: <x1>\t1\t0.5\t0\t1.0\t0
//! Root node:\tAdded Vars 1
//! ";
//!
//! let report = SectionParser::new().parse(log);
//! let input = report.finalized().next().unwrap();
//! assert_eq!(input.table.continuous_var_count, vec![1, 0]);
//! assert_eq!(input.settings, "default");
//! ```
//!
//! ### Exporting to JSON
//!
//! The outcome types implement `serde::Serialize`:
//!
//! ```no_run
//! use boundviz_log::SectionParser;
//! use std::fs;
//!
//! let log = fs::read_to_string("run.out")?;
//! let report = SectionParser::new().parse(&log);
//! fs::write("run.json", report.to_json_pretty()?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Stateless line classification.
pub mod classifier;
/// Well-known column names.
pub mod columns;
/// Table join and derived metrics.
pub mod derive;
/// Parse error taxonomy.
pub mod error;
/// Typed outcome Intermediate Representation (IR).
pub mod ir;
/// Section state machine.
pub mod parser;
/// Raw and numeric tables.
pub mod table;

#[cfg(test)]
mod tests;

pub use derive::{DerivedInstanceTable, JoinKey, UNSET_DUAL_BOUND};
pub use error::{ParseError, Section};
pub use ir::{ChartInput, InstanceOutcome, ParseReport, SkipReason};
pub use parser::{Mode, ParserConfig, SectionParser};

/// Schema version of the JSON outcome IR.
///
/// - MAJOR: Breaking changes to outcome structure
/// - MINOR: New optional fields or columns
/// - PATCH: Bug fixes to parsing behavior
pub const SCHEMA_VERSION: &str = "1.0.0";

#[derive(serde::Serialize)]
struct VersionedReport<'a> {
    schema_version: &'static str,
    #[serde(flatten)]
    report: &'a ParseReport,
}

impl ParseReport {
    /// Serialises the report tagged with [`SCHEMA_VERSION`].
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&VersionedReport {
            schema_version: SCHEMA_VERSION,
            report: self,
        })
    }
}
