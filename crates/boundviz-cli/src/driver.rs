use crate::config::RunConfig;
use anyhow::Context;
use boundviz_log::{ChartInput, InstanceOutcome, Mode, ParseReport, ParserConfig, SectionParser};
use boundviz_render::{Chart, ChartRenderer, OutputNamer};
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// What happened to one input file.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FileReport {
    pub path: PathBuf,
    /// Images written for this file, in instance order.
    pub charts: Vec<PathBuf>,
    pub skipped: usize,
    pub failed: usize,
    /// Section the file ended in without closing it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unterminated: Option<Mode>,
    /// Read or render errors.
    pub errors: Vec<String>,
}

impl FileReport {
    fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            ..Self::default()
        }
    }

    /// `true` when the file produced no image.
    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub files: Vec<FileReport>,
    pub comparisons: Vec<PathBuf>,
}

impl RunSummary {
    pub fn charts_written(&self) -> usize {
        self.files.iter().map(|f| f.charts.len()).sum::<usize>() + self.comparisons.len()
    }

    /// Files that produced no chart.
    pub fn empty_files(&self) -> impl Iterator<Item = &FileReport> {
        self.files.iter().filter(|f| f.is_empty())
    }
}

/// Reads a log line by line. Invalid UTF-8 is replaced, not rejected.
pub fn parse_file(path: &Path, config: ParserConfig) -> anyhow::Result<ParseReport> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut parser = SectionParser::with_config(config);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .with_context(|| format!("failed to read {}", path.display()))?;
        if read == 0 {
            break;
        }
        parser.feed_line(&String::from_utf8_lossy(&buf));
    }
    Ok(parser.finish())
}

/// Fallback instance name: the input file name without its extension.
pub fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "instance".to_string())
}

/// Processes every input in order and draws one chart per finalised
/// instance, then the comparison charts.
///
/// Only a failure to create the output directory aborts the run; problems
/// with single files are logged and land in their [`FileReport`].
pub fn run<R: ChartRenderer>(config: &RunConfig, renderer: &mut R) -> anyhow::Result<RunSummary> {
    let out_dir = &config.render.out_dir;
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;

    let mut namer = OutputNamer::new(out_dir);
    let mut summary = RunSummary::default();
    // instance name -> every finalised run of it, in input order
    let mut runs: Vec<(String, Vec<ChartInput>)> = Vec::new();

    for path in &config.inputs {
        let mut file = FileReport::new(path);
        let report = match parse_file(path, config.parser) {
            Ok(report) => report,
            Err(e) => {
                log::error!("{e:#}");
                file.errors.push(format!("{e:#}"));
                summary.files.push(file);
                continue;
            }
        };
        file.unterminated = report.unterminated;
        if let Some(mode) = report.unterminated {
            log::warn!("{}: ended inside {mode:?}, last instance not drawn", path.display());
        }

        let fallback = file_stem(path);
        for outcome in report.instances {
            let input = match outcome {
                InstanceOutcome::Finalized(input) => input,
                InstanceOutcome::Skipped { .. } => {
                    file.skipped += 1;
                    continue;
                }
                InstanceOutcome::Failed { instance, error, .. } => {
                    log::warn!(
                        "{}: {}: {error}",
                        path.display(),
                        instance.as_deref().unwrap_or(&fallback)
                    );
                    file.failed += 1;
                    continue;
                }
            };

            let instance = match input.instance.clone() {
                Some(name) => name,
                None => {
                    log::warn!("{}: no instance name in log, using `{fallback}`", path.display());
                    fallback.clone()
                }
            };
            let target = namer.chart_path(&instance, &input.settings);
            match renderer.render(&Chart::from_input(&input, &instance), &target) {
                Ok(()) => {
                    log::info!("wrote {}", target.display());
                    file.charts.push(target);
                }
                Err(e) => {
                    log::error!("{}: {e:#}", target.display());
                    file.errors.push(format!("{}: {e:#}", target.display()));
                }
            }

            if config.render.compare {
                match runs.iter_mut().find(|(name, _)| *name == instance) {
                    Some((_, inputs)) => inputs.push(input),
                    None => runs.push((instance, vec![input])),
                }
            }
        }
        summary.files.push(file);
    }

    for (instance, inputs) in runs.iter().filter(|(_, inputs)| inputs.len() > 1) {
        let charts: Vec<Chart<'_>> = inputs
            .iter()
            .map(|input| Chart::from_input(input, instance))
            .collect();
        let target = namer.comparison_path(instance);
        match renderer.render_comparison(instance, &charts, &target) {
            Ok(()) => {
                log::info!("wrote {} ({} runs)", target.display(), charts.len());
                summary.comparisons.push(target);
            }
            Err(e) => log::error!("{}: {e:#}", target.display()),
        }
    }

    Ok(summary)
}
