use crate::derive::DerivedInstanceTable;
use crate::error::ParseError;
use crate::parser::Mode;
use serde::{Deserialize, Serialize};

/// Settings label used when a log never names its parameter file.
pub const DEFAULT_SETTINGS: &str = "default";

/// Everything the chart renderer needs for one finalised instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartInput {
    /// `None` when neither a problem-name header nor a `read problem` line named it.
    pub instance: Option<String>,
    pub settings: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solver_status: Option<String>,
    pub table: DerivedInstanceTable,
    pub lp_max: u32,
    pub ip_max: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    EmptyBoundsTable,
}

/// Result of one `Root node:` trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InstanceOutcome {
    Finalized(ChartInput),
    Skipped {
        instance: Option<String>,
        settings: String,
        reason: SkipReason,
        #[serde(skip_serializing_if = "Option::is_none")]
        solver_status: Option<String>,
    },
    Failed {
        instance: Option<String>,
        settings: String,
        error: ParseError,
    },
}

impl InstanceOutcome {
    pub fn instance(&self) -> Option<&str> {
        match self {
            InstanceOutcome::Finalized(input) => input.instance.as_deref(),
            InstanceOutcome::Skipped { instance, .. }
            | InstanceOutcome::Failed { instance, .. } => instance.as_deref(),
        }
    }
}

/// Per-file result of a complete parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParseReport {
    pub instances: Vec<InstanceOutcome>,
    /// Section the file ended in without reaching its closing marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unterminated: Option<Mode>,
    /// Lines consumed.
    pub lines: usize,
}

impl ParseReport {
    pub fn finalized(&self) -> impl Iterator<Item = &ChartInput> {
        self.instances.iter().filter_map(|outcome| match outcome {
            InstanceOutcome::Finalized(input) => Some(input),
            _ => None,
        })
    }

    /// `true` when the file produced nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.finalized().next().is_none()
    }
}
