use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Quantity on the shared horizontal axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XAxis {
    #[default]
    Iter,
    Time,
}

/// How primal and dual bounds are drawn. The dual bound always gets markers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundsStyle {
    #[default]
    Line,
    Scatter,
    Both,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarsStyle {
    #[default]
    Scatter,
    Line,
}

/// What the two variable panels show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarsMetric {
    /// Per-iteration counts, y clamped to `[0, max + 1]`.
    #[default]
    Count,
    /// Cumulative share of all counted variables, y in `[0, 1.1]`.
    Share,
}

macro_rules! keyword_enum {
    ($ty:ident { $($name:literal => $variant:ident),+ $(,)? }) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok($ty::$variant),)+
                    other => Err(format!(
                        "unknown value `{}` (expected one of: {})",
                        other,
                        [$($name),+].join(", ")
                    )),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $($ty::$variant => f.write_str($name),)+
                }
            }
        }
    };
}

keyword_enum!(XAxis { "iter" => Iter, "time" => Time });
keyword_enum!(BoundsStyle { "line" => Line, "scatter" => Scatter, "both" => Both });
keyword_enum!(VarsStyle { "scatter" => Scatter, "line" => Line });
keyword_enum!(VarsMetric { "count" => Count, "share" => Share });

/// One horizontal band of a figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Bounds,
    LpVars,
    IpVars,
}

/// Everything that shapes the produced images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub out_dir: PathBuf,
    pub x_axis: XAxis,
    pub bounds: bool,
    pub lp_vars: bool,
    pub ip_vars: bool,
    pub bounds_style: BoundsStyle,
    pub vars_style: VarsStyle,
    pub vars_metric: VarsMetric,
    /// Plot `dualdiff` on a secondary axis of the bounds panel.
    pub dual_diff: bool,
    /// Plot `dualoptdiff` on a secondary axis of the bounds panel.
    pub dual_opt_diff: bool,
    /// Overlay the dual-bound moving average.
    pub moving_average: bool,
    /// Draw `compareRuns_<instance>.png` for instances seen more than once.
    pub compare: bool,
    pub width: u32,
    pub height: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from("plots"),
            x_axis: XAxis::Iter,
            bounds: true,
            lp_vars: true,
            ip_vars: true,
            bounds_style: BoundsStyle::Line,
            vars_style: VarsStyle::Scatter,
            vars_metric: VarsMetric::Count,
            dual_diff: false,
            dual_opt_diff: false,
            moving_average: false,
            compare: true,
            width: 1400,
            height: 1050,
        }
    }
}

impl RenderOptions {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.panels().is_empty() {
            anyhow::bail!(
                "all panels are disabled; enable at least one of bounds, lp_vars, ip_vars"
            );
        }
        if self.width == 0 || self.height == 0 {
            anyhow::bail!("image size {}x{} is empty", self.width, self.height);
        }
        Ok(())
    }

    /// Enabled panels, top to bottom.
    pub fn panels(&self) -> Vec<Panel> {
        [
            (self.bounds, Panel::Bounds),
            (self.lp_vars, Panel::LpVars),
            (self.ip_vars, Panel::IpVars),
        ]
        .into_iter()
        .filter_map(|(enabled, panel)| enabled.then_some(panel))
        .collect()
    }

    /// Whether the bounds panel needs a secondary axis.
    pub fn has_difference_axis(&self) -> bool {
        self.bounds && (self.dual_diff || self.dual_opt_diff)
    }
}

/// Pixel height of each panel. The bounds panel takes 3/5 of the figure
/// when it shares it; the rest is divided evenly.
pub fn panel_heights(panels: &[Panel], total: u32) -> Vec<u32> {
    if panels.is_empty() {
        return Vec::new();
    }
    let has_bounds = panels.contains(&Panel::Bounds);
    let others = panels.len() - usize::from(has_bounds);
    let bounds_height = match (has_bounds, others) {
        (false, _) => 0,
        (true, 0) => total,
        (true, _) => total * 3 / 5,
    };
    let rest = total - bounds_height;

    let mut heights = Vec::with_capacity(panels.len());
    let mut assigned = 0;
    let mut seen_others = 0;
    for panel in panels {
        let height = if *panel == Panel::Bounds {
            bounds_height
        } else {
            seen_others += 1;
            if seen_others == others {
                rest - assigned
            } else {
                let share = rest / others as u32;
                assigned += share;
                share
            }
        };
        heights.push(height);
    }
    heights
}
