use boundviz_cli::{parse_file, run, Cli, Commands};
use boundviz_log::ParserConfig;
use boundviz_render::PlottersRenderer;
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Plot(args) => {
            let config = args.into_config()?;
            let mut renderer = PlottersRenderer::new(config.render.clone());
            let summary = run(&config, &mut renderer)?;

            for file in summary.empty_files() {
                let mut reasons = Vec::new();
                if file.skipped > 0 {
                    reasons.push(format!("{} skipped", file.skipped));
                }
                if file.failed > 0 {
                    reasons.push(format!("{} failed", file.failed));
                }
                if let Some(mode) = file.unterminated {
                    reasons.push(format!("ended inside {mode:?}"));
                }
                reasons.extend(file.errors.iter().cloned());
                if reasons.is_empty() {
                    reasons.push("no finished instance".to_string());
                }
                eprintln!("{}: no chart ({})", file.path.display(), reasons.join("; "));
            }
            eprintln!(
                "{} file(s), {} chart(s) written to {}",
                summary.files.len(),
                summary.charts_written(),
                config.render.out_dir.display()
            );
        }
        Commands::Parse { parser, path } => {
            let mut config = ParserConfig::default();
            parser.apply(&mut config);
            let report = parse_file(&path, config)?;
            println!("{}", report.to_json_pretty()?);
        }
    }
    Ok(())
}
