use crate::config::{ConfigFile, RunConfig};
use boundviz_log::{JoinKey, ParserConfig};
use boundviz_render::{BoundsStyle, VarsMetric, VarsStyle, XAxis};
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "boundviz")]
#[command(about = "Root-node bound charts from column-generation solver logs", long_about = None)]
pub struct Cli {
    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Draw one chart per finalised instance
    Plot(PlotArgs),
    /// Parse a solver log and emit the per-instance outcomes as JSON
    Parse {
        #[command(flatten)]
        parser: ParserArgs,

        /// Path to the solver log
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
pub struct ParserArgs {
    /// Count Farkas-priced variables towards the first iteration
    #[arg(long)]
    pub farkas: bool,

    /// Ignore variables created outside the root node
    #[arg(long)]
    pub root_only: bool,

    /// Match creation indices by row `position` or stored `iteration`
    #[arg(long, value_name = "KEY")]
    pub join: Option<JoinKey>,
}

impl ParserArgs {
    /// Applies the flags that were given on top of `config`.
    pub fn apply(&self, config: &mut ParserConfig) {
        config.include_farkas |= self.farkas;
        config.root_node_only |= self.root_only;
        if let Some(join) = self.join {
            config.join = join;
        }
    }
}

#[derive(Args, Debug)]
pub struct PlotArgs {
    /// Output directory [default: plots]
    #[arg(short, long = "out-dir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// JSON file with `parser` and `render` sections; flags override it
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Horizontal axis: `iter` or `time`
    #[arg(short = 'x', long, value_name = "AXIS")]
    pub x_axis: Option<XAxis>,

    #[command(flatten)]
    pub parser: ParserArgs,

    /// Plot `dualdiff` on a secondary axis
    #[arg(long)]
    pub dual_diff: bool,

    /// Plot `dualoptdiff` on a secondary axis
    #[arg(long)]
    pub dual_opt_diff: bool,

    /// Overlay the dual-bound moving average
    #[arg(long)]
    pub average: bool,

    #[arg(long)]
    pub no_bounds: bool,

    #[arg(long)]
    pub no_lp_vars: bool,

    #[arg(long)]
    pub no_ip_vars: bool,

    /// `line`, `scatter` or `both`
    #[arg(long, value_name = "STYLE")]
    pub bounds_style: Option<BoundsStyle>,

    /// `scatter` or `line`
    #[arg(long, value_name = "STYLE")]
    pub vars_style: Option<VarsStyle>,

    /// `count` or `share`
    #[arg(long, value_name = "METRIC")]
    pub vars_metric: Option<VarsMetric>,

    /// Skip the per-instance comparison charts
    #[arg(long)]
    pub no_compare: bool,

    /// Solver logs to process
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,
}

impl PlotArgs {
    /// Layers the flags over the optional config file and validates the result.
    pub fn into_config(self) -> anyhow::Result<RunConfig> {
        let base = match &self.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };

        let mut parser = base.parser;
        self.parser.apply(&mut parser);

        let mut render = base.render;
        if let Some(dir) = self.out_dir {
            render.out_dir = dir;
        }
        if let Some(axis) = self.x_axis {
            render.x_axis = axis;
        }
        if let Some(style) = self.bounds_style {
            render.bounds_style = style;
        }
        if let Some(style) = self.vars_style {
            render.vars_style = style;
        }
        if let Some(metric) = self.vars_metric {
            render.vars_metric = metric;
        }
        render.dual_diff |= self.dual_diff;
        render.dual_opt_diff |= self.dual_opt_diff;
        render.moving_average |= self.average;
        render.bounds &= !self.no_bounds;
        render.lp_vars &= !self.no_lp_vars;
        render.ip_vars &= !self.no_ip_vars;
        render.compare &= !self.no_compare;

        let config = RunConfig {
            parser,
            render,
            inputs: self.files,
        };
        config.validate()?;
        Ok(config)
    }
}
