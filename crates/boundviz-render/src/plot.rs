use crate::axis::format_tick;
use crate::options::{
    panel_heights, BoundsStyle, Panel, RenderOptions, VarsMetric, VarsStyle, XAxis,
};
use crate::view::{FigureLimits, RunView};
use crate::{Chart, ChartRenderer};
use anyhow::Context;
use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::{CoordTranslate, Shift};
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;

const PRIMAL_COLOR: RGBColor = RED;
const DUAL_COLOR: RGBColor = BLUE;
const AVERAGE_COLOR: RGBColor = MAGENTA;
const DIFF_COLOR: RGBColor = RGBColor(255, 140, 0);
const MARKER_SIZE: u32 = 2;

/// Writes PNG charts with the `plotters` bitmap backend.
#[derive(Debug, Clone)]
pub struct PlottersRenderer {
    options: RenderOptions,
}

impl PlottersRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    fn write_png(&self, title: &str, runs: &[RunView], path: &Path) -> anyhow::Result<()> {
        let size = (self.options.width, self.options.height);
        let root = BitMapBackend::new(path, size).into_drawing_area();
        self.draw(&root, title, runs)?;
        root.present()
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Draws the whole figure onto `root`, panels stacked top to bottom.
    fn draw<DB>(
        &self,
        root: &DrawingArea<DB, Shift>,
        title: &str,
        runs: &[RunView],
    ) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        root.fill(&WHITE)?;
        let area = root.titled(title, ("sans-serif", 22))?;

        let limits = FigureLimits::of(runs);
        let panels = self.options.panels();
        let heights = panel_heights(&panels, area.dim_in_pixel().1);
        let right_axis = self.options.has_difference_axis() && limits.differences.is_some();

        let mut rest = area;
        for (index, (panel, height)) in panels.iter().zip(heights).enumerate() {
            let frame = PanelFrame {
                limits: &limits,
                x_axis: runs.first().map_or(XAxis::Iter, |run| run.x_axis),
                show_x_labels: index + 1 == panels.len(),
                right_axis,
            };
            if frame.show_x_labels {
                self.draw_panel(*panel, &rest, &frame, runs)?;
            } else {
                let (upper, lower) = rest.split_vertically(height);
                self.draw_panel(*panel, &upper, &frame, runs)?;
                rest = lower;
            }
        }
        Ok(())
    }

    fn draw_panel<DB>(
        &self,
        panel: Panel,
        area: &DrawingArea<DB, Shift>,
        frame: &PanelFrame<'_>,
        runs: &[RunView],
    ) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        match panel {
            Panel::Bounds => self.draw_bounds(area, frame, runs),
            Panel::LpVars => self.draw_vars(area, frame, runs, VarPanel::Lp),
            Panel::IpVars => self.draw_vars(area, frame, runs, VarPanel::Ip),
        }
    }

    fn draw_bounds<DB>(
        &self,
        area: &DrawingArea<DB, Shift>,
        frame: &PanelFrame<'_>,
        runs: &[RunView],
    ) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let limits = frame.limits;
        let (y_min, y_max) = limits.bounds;
        let mut chart = ChartBuilder::on(area)
            .margin(10)
            .x_label_area_size(if frame.show_x_labels { 40 } else { 10 })
            .y_label_area_size(70)
            .right_y_label_area_size(if frame.right_axis { 70 } else { 0 })
            .build_cartesian_2d(frame.x_range(), y_min..y_max)?;

        chart
            .configure_mesh()
            .x_label_formatter(&|x| frame.label(*x))
            .x_desc(frame.x_desc())
            .y_desc("Bounds")
            .draw()?;

        let comparing = runs.len() > 1;
        for (index, run) in runs.iter().enumerate() {
            let (primal_color, dual_color) = if comparing {
                let color = Palette99::pick(index).to_rgba();
                (color, color)
            } else {
                (PRIMAL_COLOR.to_rgba(), DUAL_COLOR.to_rgba())
            };
            let (primal_label, dual_label) = if comparing {
                let label = run_label(run, index);
                (format!("pb {label}"), format!("db {label}"))
            } else {
                ("pb".to_string(), "db".to_string())
            };

            let lines = self.options.bounds_style != BoundsStyle::Scatter;
            let scatter = self.options.bounds_style != BoundsStyle::Line;

            if lines {
                draw_lines(&mut chart, run.lines(&run.primal), primal_color, &primal_label)?;
                draw_lines(&mut chart, run.lines(&run.dual), dual_color, &dual_label)?;
            }
            if scatter {
                let marks = chart.draw_series(
                    run.markers(&run.primal)
                        .into_iter()
                        .map(|p| Circle::new(p, MARKER_SIZE, primal_color.filled())),
                )?;
                if !lines {
                    marks.label(primal_label.clone()).legend(move |(x, y)| {
                        Circle::new((x + 10, y), MARKER_SIZE, primal_color.filled())
                    });
                }
            }
            // the dual bound is always marked
            let marks = chart.draw_series(
                run.markers(&run.dual)
                    .into_iter()
                    .map(|p| Circle::new(p, MARKER_SIZE, dual_color.filled())),
            )?;
            if !lines {
                marks.label(dual_label.clone()).legend(move |(x, y)| {
                    Circle::new((x + 10, y), MARKER_SIZE, dual_color.filled())
                });
            }

            if let Some(average) = &run.dual_average {
                let color = if comparing { dual_color.mix(0.5) } else { AVERAGE_COLOR.to_rgba() };
                let label = format!("{dual_label} (average)");
                draw_lines(&mut chart, run.lines(average), color, &label)?;
            }
        }

        let (true, Some((d_min, d_max))) = (frame.right_axis, limits.differences) else {
            draw_legend(&mut chart)?;
            return Ok(());
        };
        let mut chart = chart.set_secondary_coord(frame.x_range(), d_min..d_max);
        chart
            .configure_secondary_axes()
            .y_desc("Differences")
            .draw()?;
        for (index, run) in runs.iter().enumerate() {
            let color = if comparing {
                Palette99::pick(index).mix(0.6)
            } else {
                DIFF_COLOR.mix(0.6)
            };
            let suffix = if comparing {
                format!(" {}", run_label(run, index))
            } else {
                String::new()
            };
            let differences = [("dualdiff", &run.dual_diff), ("dualoptdiff", &run.dual_opt_diff)];
            for (name, series) in differences {
                let Some(series) = series else { continue };
                let label = format!("{name}{suffix}");
                for (i, segment) in run.lines(series).into_iter().enumerate() {
                    let drawn = chart.draw_secondary_series(LineSeries::new(segment, color))?;
                    if i == 0 {
                        drawn.label(label.clone()).legend(move |(x, y)| {
                            PathElement::new(vec![(x, y), (x + 20, y)], color)
                        });
                    }
                }
            }
        }
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
        Ok(())
    }

    fn draw_vars<DB>(
        &self,
        area: &DrawingArea<DB, Shift>,
        frame: &PanelFrame<'_>,
        runs: &[RunView],
        which: VarPanel,
    ) -> anyhow::Result<()>
    where
        DB: DrawingBackend,
        DB::ErrorType: 'static,
    {
        let top = match which {
            VarPanel::Lp => frame.limits.lp_top,
            VarPanel::Ip => frame.limits.ip_top,
        };
        let mut chart = ChartBuilder::on(area)
            .margin(10)
            .x_label_area_size(if frame.show_x_labels { 40 } else { 10 })
            .y_label_area_size(70)
            .right_y_label_area_size(if frame.right_axis { 70 } else { 0 })
            .build_cartesian_2d(frame.x_range(), 0.0..top)?;

        chart
            .configure_mesh()
            .x_label_formatter(&|x| frame.label(*x))
            .x_desc(frame.x_desc())
            .y_desc(which.title(self.options.vars_metric))
            .draw()?;

        let comparing = runs.len() > 1;
        for (index, run) in runs.iter().enumerate() {
            let series = match which {
                VarPanel::Lp => &run.lp,
                VarPanel::Ip => &run.ip,
            };
            let color = if comparing {
                Palette99::pick(index).to_rgba()
            } else {
                which.color().to_rgba()
            };
            match self.options.vars_style {
                VarsStyle::Scatter => {
                    chart.draw_series(
                        run.markers(series)
                            .into_iter()
                            .map(|p| Circle::new(p, MARKER_SIZE, color.filled())),
                    )?;
                }
                VarsStyle::Line => {
                    let label = if comparing { run_label(run, index) } else { String::new() };
                    draw_lines(&mut chart, run.lines(series), color, &label)?;
                }
            }
        }
        if comparing && self.options.vars_style == VarsStyle::Line {
            draw_legend(&mut chart)?;
        }
        Ok(())
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(&mut self, chart: &Chart<'_>, path: &Path) -> anyhow::Result<()> {
        let run = RunView::new(chart, &self.options);
        let title = format!("{} ({})", chart.instance, chart.settings);
        self.write_png(&title, std::slice::from_ref(&run), path)
    }

    fn render_comparison(
        &mut self,
        instance: &str,
        runs: &[Chart<'_>],
        path: &Path,
    ) -> anyhow::Result<()> {
        let views: Vec<RunView> = runs
            .iter()
            .map(|chart| RunView::new(chart, &self.options))
            .collect();
        self.write_png(&format!("{instance}: {} runs", views.len()), &views, path)
    }
}

#[derive(Debug, Clone, Copy)]
enum VarPanel {
    Lp,
    Ip,
}

impl VarPanel {
    fn title(self, metric: VarsMetric) -> &'static str {
        match (self, metric) {
            (VarPanel::Lp, VarsMetric::Count) => "LP vars",
            (VarPanel::Ip, VarsMetric::Count) => "IP vars",
            (VarPanel::Lp, VarsMetric::Share) => "lpvars",
            (VarPanel::Ip, VarsMetric::Share) => "ipvars",
        }
    }

    fn color(self) -> RGBColor {
        match self {
            VarPanel::Lp => RGBColor(0, 128, 0),
            VarPanel::Ip => RGBColor(128, 0, 128),
        }
    }
}

/// What every panel of one figure shares.
struct PanelFrame<'a> {
    limits: &'a FigureLimits,
    x_axis: XAxis,
    show_x_labels: bool,
    /// Whether panels reserve a right-hand gutter for the difference axis.
    right_axis: bool,
}

impl PanelFrame<'_> {
    fn x_range(&self) -> TickedAxis {
        let x = &self.limits.x;
        TickedAxis {
            inner: (x.min..x.max).into(),
            ticks: x.ticks.clone(),
        }
    }

    fn label(&self, x: f64) -> String {
        if self.show_x_labels {
            format_tick(x)
        } else {
            String::new()
        }
    }

    fn x_desc(&self) -> &'static str {
        match (self.show_x_labels, self.x_axis) {
            (false, _) => "",
            (true, XAxis::Iter) => "iter",
            (true, XAxis::Time) => "time",
        }
    }
}

/// A linear `f64` axis whose grid lines sit on precomputed ticks.
#[derive(Clone)]
struct TickedAxis {
    inner: RangedCoordf64,
    ticks: Vec<f64>,
}

impl Ranged for TickedAxis {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.inner.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        if hint.max_num_points() == 0 {
            return Vec::new();
        }
        self.ticks.clone()
    }

    fn range(&self) -> Range<f64> {
        self.inner.range()
    }
}

fn run_label(run: &RunView, index: usize) -> String {
    format!("{} {}", run.label, index + 1)
}

fn draw_lines<'a, DB, CT>(
    chart: &mut ChartContext<'a, DB, CT>,
    segments: Vec<Vec<(f64, f64)>>,
    color: RGBAColor,
    label: &str,
) -> anyhow::Result<()>
where
    DB: DrawingBackend + 'a,
    CT: CoordTranslate<From = (f64, f64)>,
{
    for (i, segment) in segments.into_iter().enumerate() {
        let drawn = chart
            .draw_series(LineSeries::new(segment, color))
            .map_err(|e| anyhow::anyhow!("{e}"))?;
        if i == 0 && !label.is_empty() {
            drawn
                .label(label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        }
    }
    Ok(())
}

fn draw_legend<'a, DB, CT>(chart: &mut ChartContext<'a, DB, CT>) -> anyhow::Result<()>
where
    DB: DrawingBackend + 'a,
    CT: CoordTranslate,
{
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    Ok(())
}
