//! # boundviz renderer
//!
//! Turns finalised instances from `boundviz-log` into PNG figures.
//!
//! A figure stacks up to three panels over one horizontal axis
//! (iteration or time):
//!
//! - **Bounds**: primal and dual bound lines, dual-bound markers, and
//!   optionally the dual-bound moving average and a secondary
//!   `dualdiff`/`dualoptdiff` axis
//! - **LP vars**: variables positive in the relaxation, per iteration
//! - **IP vars**: variables positive in the integral solution, per iteration
//!
//! Rendering sits behind the [`ChartRenderer`] trait so that drivers can be
//! exercised without a font or bitmap backend.

pub mod axis;
pub mod naming;
pub mod options;
pub mod plot;
pub mod view;

pub use naming::OutputNamer;
pub use options::{BoundsStyle, Panel, RenderOptions, VarsMetric, VarsStyle, XAxis};
pub use plot::PlottersRenderer;

use boundviz_log::{ChartInput, DerivedInstanceTable};
use std::path::Path;

/// One finalised instance, with its name already resolved.
#[derive(Debug, Clone, Copy)]
pub struct Chart<'a> {
    pub instance: &'a str,
    pub settings: &'a str,
    pub table: &'a DerivedInstanceTable,
    pub lp_max: u32,
    pub ip_max: u32,
}

impl<'a> Chart<'a> {
    pub fn from_input(input: &'a ChartInput, instance: &'a str) -> Self {
        Self {
            instance,
            settings: &input.settings,
            table: &input.table,
            lp_max: input.lp_max,
            ip_max: input.ip_max,
        }
    }
}

pub trait ChartRenderer {
    /// Draws one instance to `path`.
    fn render(&mut self, chart: &Chart<'_>, path: &Path) -> anyhow::Result<()>;

    /// Overlays several runs of the same instance in one figure at `path`.
    fn render_comparison(
        &mut self,
        instance: &str,
        runs: &[Chart<'_>],
        path: &Path,
    ) -> anyhow::Result<()>;
}
