use crate::columns;
use crate::error::{ParseError, Section};
use crate::parser::ParserConfig;
use crate::table::{NumericTable, RawTable};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Dual bounds at or below this value mean "no valid dual bound yet".
///
/// The solver prints its infinity for an unset bound; such values become
/// missing and are neither plotted nor used for axis scaling.
pub const UNSET_DUAL_BOUND: f64 = -1e20;

/// Trailing window of the dual-bound moving average.
pub const MOVING_AVERAGE_WINDOW: usize = 5;

/// Resolution of the solver clock, in seconds.
pub const TIME_RESOLUTION: f64 = 0.01;

/// Creation index the solver uses for variables from Farkas pricing.
const FARKAS_CREATION_INDEX: f64 = -1.0;

/// How variable creation indices are matched to root-bounds rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKey {
    /// Creation index `i` counts towards the `i`-th row in file order.
    #[default]
    Position,
    /// Creation index `i` counts towards the row whose `iter` value is `i`.
    Iteration,
}

impl std::str::FromStr for JoinKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "position" => Ok(JoinKey::Position),
            "iteration" | "iter" => Ok(JoinKey::Iteration),
            other => Err(format!(
                "unknown join key `{other}` (expected `position` or `iteration`)"
            )),
        }
    }
}

/// The root-bounds table of one instance, normalised and augmented with
/// per-iteration variable counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedInstanceTable {
    pub table: NumericTable,
    pub continuous_var_count: Vec<u32>,
    pub integral_var_count: Vec<u32>,
}

impl DerivedInstanceTable {
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn iterations(&self) -> &[Option<f64>] {
        self.table.values(columns::ITER).unwrap_or_default()
    }

    pub fn primal_bounds(&self) -> &[Option<f64>] {
        self.table.values(columns::PB).unwrap_or_default()
    }

    pub fn dual_bounds(&self) -> &[Option<f64>] {
        self.table.values(columns::DB).unwrap_or_default()
    }

    /// Largest per-iteration count of relaxation-active variables, 0 when empty.
    pub fn lp_max(&self) -> u32 {
        self.continuous_var_count.iter().copied().max().unwrap_or(0)
    }

    /// Largest per-iteration count of integral-solution variables, 0 when empty.
    pub fn ip_max(&self) -> u32 {
        self.integral_var_count.iter().copied().max().unwrap_or(0)
    }
}

/// Joins the two section tables of one instance.
///
/// Returns `Ok(None)` when no root-bounds rows were collected.
pub fn derive_instance(
    bounds: &RawTable,
    vars: &RawTable,
    config: &ParserConfig,
) -> Result<Option<DerivedInstanceTable>, ParseError> {
    if bounds.is_empty() {
        return Ok(None);
    }

    let mut table = bounds.to_numeric(Section::RootBounds, &[])?;
    let var_table = if vars.has_schema() {
        vars.to_numeric(Section::VarDetails, &[columns::NAME])?
    } else {
        log::warn!("variable-details section without a header; counting no variables");
        NumericTable::default()
    };

    let iterations = table.require(Section::RootBounds, columns::ITER)?.to_vec();
    table.require(Section::RootBounds, columns::PB)?;
    table.require(Section::RootBounds, columns::DB)?;

    let (continuous_var_count, integral_var_count) = if var_table.is_empty() {
        (vec![0; table.len()], vec![0; table.len()])
    } else {
        count_variables(&iterations, &var_table, config)?
    };

    normalize_dual_bounds(&mut table);
    spread_equal_times(&mut table);

    let db_average = moving_average(
        table.values(columns::DB).unwrap_or_default(),
        MOVING_AVERAGE_WINDOW,
    );
    table.push_column(columns::DB_MOVING_AVERAGE, db_average);
    table.push_column(columns::LP_SHARE, cumulative_share(&continuous_var_count));
    table.push_column(columns::IP_SHARE, cumulative_share(&integral_var_count));

    Ok(Some(DerivedInstanceTable {
        table,
        continuous_var_count,
        integral_var_count,
    }))
}

/// Counts, per root-bounds row, the variables created there that are
/// positive in the relaxation and in the integral solution respectively.
fn count_variables(
    iterations: &[Option<f64>],
    vars: &NumericTable,
    config: &ParserConfig,
) -> Result<(Vec<u32>, Vec<u32>), ParseError> {
    let creation = vars.require(Section::VarDetails, columns::CREATION_INDEX)?;
    let lp_values = vars.require(Section::VarDetails, columns::ROOT_LP_SOLVAL)?;
    let ip_values = vars.require(Section::VarDetails, columns::SOLVAL)?;

    let rows = iterations.len();
    let mut continuous = vec![0; rows];
    let mut integral = vec![0; rows];

    // iteration bits -> first row carrying that iteration
    let mut by_iteration: HashMap<u64, usize> = HashMap::new();
    if config.join == JoinKey::Iteration {
        for (row, iter) in iterations.iter().enumerate() {
            if let Some(iter) = iter.filter(|v| !v.is_nan()) {
                by_iteration.entry(iteration_key(iter)).or_insert(row);
            }
        }
    }

    let target_row = |index: f64| -> Option<usize> {
        if config.include_farkas && index == FARKAS_CREATION_INDEX && rows > 0 {
            return Some(0);
        }
        match config.join {
            JoinKey::Position => {
                let whole = index >= 0.0 && index.fract() == 0.0;
                (whole && index < rows as f64).then_some(index as usize)
            }
            JoinKey::Iteration => by_iteration.get(&iteration_key(index)).copied(),
        }
    };

    for ((created, lp), ip) in creation.iter().zip(lp_values).zip(ip_values) {
        let Some(row) = created.and_then(&target_row) else {
            continue;
        };
        if lp.is_some_and(|v| v > 0.0) {
            continuous[row] += 1;
        }
        if ip.is_some_and(|v| v > 0.0) {
            integral[row] += 1;
        }
    }

    Ok((continuous, integral))
}

/// Hash key for an iteration value; `-0.0` and `0.0` share one key.
fn iteration_key(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

fn normalize_dual_bounds(table: &mut NumericTable) {
    if let Some(db) = table.values_mut(columns::DB) {
        for value in db.iter_mut() {
            if value.is_some_and(|v| v <= UNSET_DUAL_BOUND) {
                *value = None;
            }
        }
    }
}

/// Spreads rows that share a clock reading evenly across one clock tick,
/// ordered by iteration, so time-based plots do not stack them.
fn spread_equal_times(table: &mut NumericTable) {
    let Some(times) = table.values(columns::TIME).map(<[_]>::to_vec) else {
        return;
    };
    let iterations = table.values(columns::ITER).unwrap_or_default().to_vec();

    // time bits -> (iteration of first row at that time, rows at that time)
    let mut groups: HashMap<u64, (Option<f64>, usize)> = HashMap::new();
    for (time, iter) in times.iter().zip(&iterations) {
        if let Some(time) = time {
            groups.entry(time.to_bits()).or_insert((*iter, 0)).1 += 1;
        }
    }

    let spread = times
        .iter()
        .zip(&iterations)
        .map(|(time, iter)| {
            let time = (*time)?;
            let (first, count) = groups[&time.to_bits()];
            Some(time + TIME_RESOLUTION * (iter.as_ref()? - first?) / count as f64)
        })
        .collect();
    table.push_column(columns::TIME, spread);
}

fn moving_average(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    (0..values.len())
        .map(|end| {
            if end + 1 < window {
                return None;
            }
            let slice = &values[end + 1 - window..=end];
            let sum = slice.iter().copied().sum::<Option<f64>>()?;
            Some(sum / window as f64)
        })
        .collect()
}

fn cumulative_share(counts: &[u32]) -> Vec<Option<f64>> {
    let total: u32 = counts.iter().sum();
    let mut running = 0;
    counts
        .iter()
        .map(|count| {
            running += count;
            (total > 0).then(|| f64::from(running) / f64::from(total))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(header: &[&str], rows: &[&[&str]], key_col: usize) -> RawTable {
        let mut table = RawTable::new();
        table.set_schema(header.iter().map(|s| s.to_string()).collect());
        for row in rows {
            table.insert(
                row[key_col].to_string(),
                row.iter().map(|s| s.to_string()).collect(),
            );
        }
        table
    }

    fn vars(rows: &[&[&str]]) -> RawTable {
        raw(&["name", "node", "rootredcostcall", "rootlpsolval", "solval"], rows, 0)
    }

    #[test]
    fn test_counts_follow_row_position() {
        let bounds = raw(
            &["iter", "pb", "db"],
            &[&["0", "10", "1"], &["1", "9", "2"], &["2", "8", "3"]],
            0,
        );
        let vars = vars(&[
            &["<a>", "1", "0", "1.0", "0"],
            &["<b>", "1", "0", "0.5", "1"],
            &["<c>", "1", "2", "0", "1"],
            &["<d>", "1", "7", "1", "1"],
        ]);
        let derived = derive_instance(&bounds, &vars, &ParserConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(derived.continuous_var_count, vec![2, 0, 0]);
        assert_eq!(derived.integral_var_count, vec![1, 0, 1]);
        assert_eq!(derived.lp_max(), 2);
        assert_eq!(derived.ip_max(), 1);
    }

    #[test]
    fn test_iteration_join_uses_stored_iter() {
        let bounds = raw(&["iter", "pb", "db"], &[&["5", "10", "1"], &["6", "9", "2"]], 0);
        let vars = vars(&[&["<a>", "1", "6", "1", "0"], &["<b>", "1", "0", "1", "0"]]);

        let by_position = derive_instance(&bounds, &vars, &ParserConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(by_position.continuous_var_count, vec![1, 0]);

        let config = ParserConfig {
            join: JoinKey::Iteration,
            ..ParserConfig::default()
        };
        let by_iteration = derive_instance(&bounds, &vars, &config).unwrap().unwrap();
        assert_eq!(by_iteration.continuous_var_count, vec![0, 1]);
    }

    #[test]
    fn test_iteration_join_picks_first_matching_row() {
        let bounds = raw(
            &["iter", "pb", "db"],
            &[&["0", "10", "1"], &["3", "9", "2"], &["3", "8", "3"]],
            1,
        );
        let vars = vars(&[&["<a>", "1", "3", "1", "1"], &["<b>", "1", "4", "1", "1"]]);
        let config = ParserConfig {
            join: JoinKey::Iteration,
            ..ParserConfig::default()
        };
        let derived = derive_instance(&bounds, &vars, &config).unwrap().unwrap();
        assert_eq!(derived.continuous_var_count, vec![0, 1, 0]);
        assert_eq!(derived.integral_var_count, vec![0, 1, 0]);
    }

    #[test]
    fn test_empty_bounds_skip_before_reading_vars() {
        let bounds = raw(&["iter", "pb", "db"], &[], 0);
        let vars = vars(&[&["<a>", "1", "zero", "1", "1"]]);
        let derived = derive_instance(&bounds, &vars, &ParserConfig::default()).unwrap();
        assert!(derived.is_none());
    }

    #[test]
    fn test_farkas_variables_land_on_first_row() {
        let bounds = raw(&["iter", "pb", "db"], &[&["0", "10", "1"], &["1", "9", "2"]], 0);
        let vars = vars(&[&["<f>", "1", "-1", "1", "1"]]);

        let plain = derive_instance(&bounds, &vars, &ParserConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(plain.continuous_var_count, vec![0, 0]);

        let config = ParserConfig {
            include_farkas: true,
            ..ParserConfig::default()
        };
        let farkas = derive_instance(&bounds, &vars, &config).unwrap().unwrap();
        assert_eq!(farkas.continuous_var_count, vec![1, 0]);
        assert_eq!(farkas.integral_var_count, vec![1, 0]);
    }

    #[test]
    fn test_unset_dual_bounds_become_missing() {
        let bounds = raw(
            &["iter", "pb", "db"],
            &[&["0", "1e+20", "-1e+20"], &["1", "50", "-1e+21"], &["2", "40", "-99999"]],
            0,
        );
        let derived = derive_instance(&bounds, &RawTable::new(), &ParserConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(derived.dual_bounds(), &[None, None, Some(-99999.0)]);
        assert_eq!(derived.primal_bounds()[0], Some(1e20));
    }

    #[test]
    fn test_empty_bounds_table_is_skipped() {
        let bounds = raw(&["iter", "pb", "db"], &[], 0);
        let vars = vars(&[&["<a>", "1", "0", "1", "0"]]);
        assert_eq!(derive_instance(&bounds, &vars, &ParserConfig::default()), Ok(None));
    }

    #[test]
    fn test_missing_variable_column_fails() {
        let bounds = raw(&["iter", "pb", "db"], &[&["0", "1", "0"]], 0);
        let vars = raw(&["name", "node", "solval"], &[&["<a>", "1", "1"]], 0);
        let err = derive_instance(&bounds, &vars, &ParserConfig::default()).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingColumn {
                section: Section::VarDetails,
                column: "rootredcostcall".into(),
            }
        );
    }

    #[test]
    fn test_recomputation_is_stable() {
        let bounds = raw(&["iter", "pb", "db"], &[&["0", "10", "1"], &["1", "9", "2"]], 0);
        let vars = vars(&[&["<a>", "1", "1", "1", "1"], &["<b>", "1", "1", "2", "0"]]);
        let first = derive_instance(&bounds, &vars, &ParserConfig::default()).unwrap();
        let second = derive_instance(&bounds, &vars, &ParserConfig::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_equal_times_are_spread() {
        let bounds = raw(
            &["iter", "pb", "db", "time"],
            &[&["0", "1", "0", "0.5"], &["1", "1", "0", "0.5"], &["2", "1", "0", "0.7"]],
            0,
        );
        let derived = derive_instance(&bounds, &RawTable::new(), &ParserConfig::default())
            .unwrap()
            .unwrap();
        let times = derived.table.values("time").unwrap();
        assert_eq!(times[0], Some(0.5));
        assert!((times[1].unwrap() - 0.505).abs() < 1e-12);
        assert_eq!(times[2], Some(0.7));
    }

    #[test]
    fn test_moving_average_needs_full_window() {
        let values = [Some(1.0), Some(2.0), Some(3.0), None, Some(5.0), Some(6.0)];
        assert_eq!(moving_average(&values[..3], 3), vec![None, None, Some(2.0)]);
        assert_eq!(moving_average(&values, 2)[3], None);
        assert_eq!(moving_average(&values, 2)[5], Some(5.5));
    }

    #[test]
    fn test_cumulative_share() {
        assert_eq!(
            cumulative_share(&[1, 0, 3]),
            vec![Some(0.25), Some(0.25), Some(1.0)]
        );
        assert_eq!(cumulative_share(&[0, 0]), vec![None, None]);
    }

    #[test]
    fn test_join_key_from_str() {
        assert_eq!("position".parse::<JoinKey>(), Ok(JoinKey::Position));
        assert_eq!("iteration".parse::<JoinKey>(), Ok(JoinKey::Iteration));
        assert!("row".parse::<JoinKey>().is_err());
    }
}
