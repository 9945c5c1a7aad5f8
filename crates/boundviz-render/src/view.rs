use crate::axis::{self, segments};
use crate::options::{RenderOptions, VarsMetric, XAxis};
use crate::Chart;
use boundviz_log::columns;

/// One run's series, resolved against the render options and ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct RunView {
    pub label: String,
    pub x_axis: XAxis,
    x: Vec<Option<f64>>,
    pub primal: Vec<Option<f64>>,
    pub dual: Vec<Option<f64>>,
    pub dual_average: Option<Vec<Option<f64>>>,
    pub dual_diff: Option<Vec<Option<f64>>>,
    pub dual_opt_diff: Option<Vec<Option<f64>>>,
    pub lp: Vec<Option<f64>>,
    pub ip: Vec<Option<f64>>,
    /// Upper y limit of the variable panels.
    pub lp_top: f64,
    pub ip_top: f64,
}

impl RunView {
    pub fn new(chart: &Chart<'_>, options: &RenderOptions) -> Self {
        let table = &chart.table.table;
        let column = |name: &str| table.values(name).map(<[_]>::to_vec);

        let x_axis = match options.x_axis {
            XAxis::Time if table.column(columns::TIME).is_none() => {
                log::warn!(
                    "{}: no `{}` column, plotting against iterations",
                    chart.instance,
                    columns::TIME
                );
                XAxis::Iter
            }
            other => other,
        };
        let x = match x_axis {
            XAxis::Iter => chart.table.iterations().to_vec(),
            XAxis::Time => column(columns::TIME).unwrap_or_default(),
        };

        let optional = |enabled: bool, name: &str| {
            if !enabled {
                return None;
            }
            let values = column(name);
            if values.is_none() {
                log::warn!("{}: no `{}` column to plot", chart.instance, name);
            }
            values
        };

        let (lp, ip, lp_top, ip_top) = match options.vars_metric {
            VarsMetric::Count => (
                as_values(&chart.table.continuous_var_count),
                as_values(&chart.table.integral_var_count),
                f64::from(chart.lp_max) + 1.0,
                f64::from(chart.ip_max) + 1.0,
            ),
            VarsMetric::Share => (
                column(columns::LP_SHARE).unwrap_or_default(),
                column(columns::IP_SHARE).unwrap_or_default(),
                1.1,
                1.1,
            ),
        };

        Self {
            label: chart.settings.to_string(),
            x_axis,
            x,
            primal: chart.table.primal_bounds().to_vec(),
            dual: chart.table.dual_bounds().to_vec(),
            dual_average: optional(options.moving_average, columns::DB_MOVING_AVERAGE),
            dual_diff: optional(options.dual_diff, columns::DUAL_DIFF),
            dual_opt_diff: optional(options.dual_opt_diff, columns::DUAL_OPT_DIFF),
            lp,
            ip,
            lp_top,
            ip_top,
        }
    }

    /// Horizontal values with a position.
    pub fn x_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.x.iter().flatten().copied()
    }

    /// `(x, y)` pairs of a series, dropping rows without an x value.
    pub fn points(&self, ys: &[Option<f64>]) -> Vec<(f64, Option<f64>)> {
        self.x
            .iter()
            .zip(ys)
            .filter_map(|(x, y)| x.map(|x| (x, *y)))
            .collect()
    }

    /// Connected runs of a series, broken at missing values.
    pub fn lines(&self, ys: &[Option<f64>]) -> Vec<Vec<(f64, f64)>> {
        segments(self.points(ys))
    }

    /// Every drawable point of a series.
    pub fn markers(&self, ys: &[Option<f64>]) -> Vec<(f64, f64)> {
        self.lines(ys).into_iter().flatten().collect()
    }

    /// Values that set the bounds panel's y range. Missing dual bounds are excluded.
    pub fn bound_values(&self) -> impl Iterator<Item = f64> + '_ {
        let average = self.dual_average.iter().flatten();
        self.primal
            .iter()
            .chain(&self.dual)
            .chain(average)
            .flatten()
            .copied()
    }

    pub fn difference_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.dual_diff
            .iter()
            .chain(&self.dual_opt_diff)
            .flatten()
            .flatten()
            .copied()
    }

    pub fn has_differences(&self) -> bool {
        self.dual_diff.is_some() || self.dual_opt_diff.is_some()
    }
}

fn as_values(counts: &[u32]) -> Vec<Option<f64>> {
    counts.iter().map(|c| Some(f64::from(*c))).collect()
}

/// Axis limits shared by every run drawn in one figure.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureLimits {
    pub x: axis::Frame,
    pub bounds: (f64, f64),
    pub differences: Option<(f64, f64)>,
    pub lp_top: f64,
    pub ip_top: f64,
}

impl FigureLimits {
    pub fn of(runs: &[RunView]) -> Self {
        let differences = runs
            .iter()
            .any(RunView::has_differences)
            .then(|| axis::value_limits(runs.iter().flat_map(RunView::difference_values)));
        Self {
            x: axis::Frame::from_values(runs.iter().flat_map(RunView::x_values)),
            bounds: axis::value_limits(runs.iter().flat_map(RunView::bound_values)),
            differences,
            lp_top: runs.iter().map(|r| r.lp_top).fold(1.0, f64::max),
            ip_top: runs.iter().map(|r| r.ip_top).fold(1.0, f64::max),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use boundviz_log::SectionParser;

    const LOG: &str = "\
Root bounds
iter\tpb\tdb\ttime\tdualdiff
0\t100\t-1e+20\t0.5\t3
1\t90\t60\t0.5\t2
2\t80\t70\t0.7\t1
Pricing Summary:
AddedVarDetails:
VAR: name\tnode\ttime\trootredcostcall\trootlpsolval\tsolval
VAR: <a>\t1\t0.5\t0\t1\t1
VAR: <b>\t1\t0.5\t0\t1\t0
VAR: <c>\t1\t0.6\t2\t1\t0
Root node:
";

    fn view(options: &RenderOptions) -> RunView {
        let report = SectionParser::new().parse(LOG);
        let input = report.finalized().next().unwrap();
        RunView::new(&Chart::from_input(input, "inst"), options)
    }

    #[test]
    fn test_counts_and_limits() {
        let view = view(&RenderOptions::default());
        assert_eq!(view.lp, vec![Some(2.0), Some(0.0), Some(1.0)]);
        assert_eq!(view.ip, vec![Some(1.0), Some(0.0), Some(0.0)]);
        assert_eq!(view.lp_top, 3.0);
        assert_eq!(view.ip_top, 2.0);
        assert!(view.dual_diff.is_none());
    }

    #[test]
    fn test_missing_dual_bound_breaks_line_and_scaling() {
        let view = view(&RenderOptions::default());
        assert_eq!(view.lines(&view.dual), vec![vec![(1.0, 60.0), (2.0, 70.0)]]);
        let lowest = view.bound_values().fold(f64::INFINITY, f64::min);
        assert_eq!(lowest, 60.0);
    }

    #[test]
    fn test_time_axis_uses_spread_times() {
        let options = RenderOptions {
            x_axis: XAxis::Time,
            ..RenderOptions::default()
        };
        let view = view(&options);
        let xs: Vec<f64> = view.x_values().collect();
        assert_eq!(xs.len(), 3);
        assert!((xs[1] - 0.505).abs() < 1e-9);
        assert_eq!(view.x_axis, XAxis::Time);
    }

    #[test]
    fn test_share_metric_and_differences() {
        let options = RenderOptions {
            vars_metric: VarsMetric::Share,
            dual_diff: true,
            ..RenderOptions::default()
        };
        let view = view(&options);
        assert_eq!(view.lp_top, 1.1);
        assert_eq!(view.ip, vec![Some(1.0), Some(1.0), Some(1.0)]);
        assert_eq!(view.dual_diff, Some(vec![Some(3.0), Some(2.0), Some(1.0)]));
        let limits = FigureLimits::of(&[view]);
        let (lo, hi) = limits.differences.unwrap();
        assert!((lo - 0.9).abs() < 1e-9 && (hi - 3.1).abs() < 1e-9);
    }

    #[test]
    fn test_limits_cover_all_runs() {
        let first = view(&RenderOptions::default());
        let mut second = first.clone();
        second.lp_top = 9.0;
        let limits = FigureLimits::of(&[first, second]);
        assert_eq!(limits.lp_top, 9.0);
        assert_eq!((limits.x.min, limits.x.max), (0.0, 2.0));
        assert!(limits.differences.is_none());
    }
}
