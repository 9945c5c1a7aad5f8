use crate::classifier::{Marker, classify};
use crate::columns;
use crate::derive::{JoinKey, derive_instance};
use crate::ir::{ChartInput, DEFAULT_SETTINGS, InstanceOutcome, ParseReport, SkipReason};
use crate::table::RawTable;
use serde::{Deserialize, Serialize};

/// Data-collecting section the parser is currently in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Idle,
    InRootBounds,
    InVariableDetails,
}

/// Knobs for how the two tables are joined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Count Farkas-priced variables (creation index `-1`) towards the first row.
    pub include_farkas: bool,
    /// Ignore variables that were not created in the root node.
    pub root_node_only: bool,
    pub join: JoinKey,
}

/// State of the instance currently being read. Reset on `@01`.
#[derive(Debug, Default)]
struct ParseContext {
    mode: Mode,
    in_original_block: bool,
    instance_name: Option<String>,
    problem_file_name: Option<String>,
    solver_status: Option<String>,
    bounds: RawTable,
    vars: RawTable,
}

/// A single-pass, line-oriented parser for column-generation solver logs.
///
/// `SectionParser` tracks which section of the log it is in, collects the
/// root-bounds and variable-details tables, and finalises an instance each
/// time the variable-details section closes with `Root node:`.
pub struct SectionParser {
    config: ParserConfig,
    settings: String,
    context: ParseContext,
    outcomes: Vec<InstanceOutcome>,
    line_no: usize,
}

impl Default for SectionParser {
    fn default() -> Self {
        Self::new()
    }
}

impl SectionParser {
    pub fn new() -> Self {
        Self::with_config(ParserConfig::default())
    }

    pub fn with_config(config: ParserConfig) -> Self {
        Self {
            config,
            settings: DEFAULT_SETTINGS.to_string(),
            context: ParseContext::default(),
            outcomes: Vec::new(),
            line_no: 0,
        }
    }

    pub fn mode(&self) -> Mode {
        self.context.mode
    }

    pub fn in_original_block(&self) -> bool {
        self.context.in_original_block
    }

    /// Consumes one line. A trailing `\n` or `\r\n` is ignored.
    pub fn feed_line(&mut self, line: &str) {
        self.line_no += 1;
        let line = line.trim_end_matches(['\n', '\r']);
        let marker = classify(line);
        let ctx = &mut self.context;

        match marker {
            Marker::InstanceBoundary => {
                log::debug!("line {}: new instance, resetting section state", self.line_no);
                self.context = ParseContext::default();
            }
            Marker::ParameterFile { label } => self.settings = label,
            Marker::ReadProblem { name } if ctx.problem_file_name.is_none() => {
                ctx.problem_file_name = Some(name);
            }
            Marker::OriginalStart if !ctx.in_original_block => ctx.in_original_block = true,
            Marker::OriginalEnd if ctx.in_original_block => ctx.in_original_block = false,
            Marker::SolverStatus { status } if ctx.in_original_block => {
                ctx.solver_status = Some(status);
            }
            Marker::ProblemName { name } if ctx.in_original_block => ctx.instance_name = name,
            Marker::RootBoundsStart if ctx.mode != Mode::InRootBounds => {
                log::debug!("line {}: entering root bounds", self.line_no);
                ctx.mode = Mode::InRootBounds;
            }
            Marker::BoundsHeader { columns } if ctx.mode == Mode::InRootBounds => {
                if ctx.bounds.has_schema() {
                    log::warn!("line {}: repeated root-bounds header ignored", self.line_no);
                } else {
                    ctx.bounds.set_schema(columns);
                }
            }
            Marker::PricingSummary if ctx.mode == Mode::InRootBounds => ctx.mode = Mode::Idle,
            _ if ctx.mode == Mode::InRootBounds => self.bounds_row(line),
            Marker::VarDetailsStart if ctx.mode != Mode::InVariableDetails => {
                log::debug!("line {}: entering variable details", self.line_no);
                ctx.mode = Mode::InVariableDetails;
            }
            Marker::VarHeader { columns } if ctx.mode == Mode::InVariableDetails => {
                if ctx.vars.has_schema() {
                    log::warn!("line {}: repeated variable header ignored", self.line_no);
                } else {
                    ctx.vars.set_schema(columns);
                }
            }
            Marker::RootNode if ctx.mode == Mode::InVariableDetails => {
                ctx.mode = Mode::Idle;
                self.finalize();
            }
            _ if ctx.mode == Mode::InVariableDetails => self.var_row(line),
            _ => {}
        }
    }

    /// Ends the pass and returns every instance outcome in file order.
    pub fn finish(self) -> ParseReport {
        let unterminated = match self.context.mode {
            Mode::Idle => None,
            mode => {
                log::debug!("log ended inside {mode:?}; trailing instance not finalised");
                Some(mode)
            }
        };
        ParseReport {
            instances: self.outcomes,
            unterminated,
            lines: self.line_no,
        }
    }

    /// Parses a whole log held in memory.
    pub fn parse(mut self, input: &str) -> ParseReport {
        for line in input.lines() {
            self.feed_line(line);
        }
        self.finish()
    }

    fn bounds_row(&mut self, line: &str) {
        let ctx = &mut self.context;
        if !ctx.bounds.has_schema() {
            log::debug!("line {}: root-bounds text before header ignored", self.line_no);
            return;
        }
        let tokens: Vec<String> = line.split_whitespace().map(String::from).collect();
        let Some(key) = tokens.first().cloned() else {
            return;
        };
        if ctx.bounds.insert(key, tokens) {
            log::warn!("line {}: duplicate iteration replaces earlier row", self.line_no);
        }
    }

    fn var_row(&mut self, line: &str) {
        let ctx = &mut self.context;
        if !ctx.vars.has_schema() {
            log::debug!("line {}: variable text before header ignored", self.line_no);
            return;
        }
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 2 {
            return;
        }
        let row = &tokens[1..];
        let foreign = tokens[0] == "VAR:" && !created_at_root(ctx.vars.columns(), row);
        if self.config.root_node_only && foreign {
            return;
        }
        let values = row.iter().map(|t| t.to_string()).collect();
        if ctx.vars.insert(row[0].to_string(), values) {
            log::warn!(
                "line {}: duplicate variable {} replaces earlier row",
                self.line_no,
                row[0]
            );
        }
    }

    fn finalize(&mut self) {
        let ctx = &mut self.context;
        let instance = ctx.instance_name.clone().or_else(|| ctx.problem_file_name.clone());
        let settings = self.settings.clone();

        let outcome = match derive_instance(&ctx.bounds, &ctx.vars, &self.config) {
            Ok(Some(table)) => {
                log::debug!(
                    "line {}: finalised {} with {} root-bounds rows",
                    self.line_no,
                    instance.as_deref().unwrap_or("<unnamed>"),
                    table.len()
                );
                InstanceOutcome::Finalized(ChartInput {
                    instance,
                    settings,
                    solver_status: ctx.solver_status.clone(),
                    lp_max: table.lp_max(),
                    ip_max: table.ip_max(),
                    table,
                })
            }
            Ok(None) => {
                log::info!(
                    "{}: no root bounds, ignored (status: {})",
                    instance.as_deref().unwrap_or("<unnamed>"),
                    ctx.solver_status.as_deref().unwrap_or("unknown")
                );
                InstanceOutcome::Skipped {
                    instance,
                    settings,
                    reason: SkipReason::EmptyBoundsTable,
                    solver_status: ctx.solver_status.clone(),
                }
            }
            Err(error) => {
                log::warn!("line {}: {error}", self.line_no);
                InstanceOutcome::Failed {
                    instance,
                    settings,
                    error,
                }
            }
        };
        self.outcomes.push(outcome);

        ctx.bounds = RawTable::new();
        ctx.vars = RawTable::new();
        ctx.problem_file_name = None;
    }
}

/// Whether a `VAR:` row's `node` cell names the root node. Rows without a
/// readable node are kept so that coercion reports them.
fn created_at_root(header: &[String], row: &[&str]) -> bool {
    let node = header
        .iter()
        .position(|name| name == columns::NODE)
        .and_then(|col| row.get(col));
    match node.map(|node| node.parse::<f64>()) {
        Some(Ok(node)) => node == 1.0,
        _ => true,
    }
}
