mod app;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use bubble_chart::{BubbleChart, ChartConfig, LayoutMode, load_records};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Record file (`.json` or `.csv`).
    data: PathBuf,

    /// JSON chart config; missing fields keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    width: Option<f32>,

    #[arg(long)]
    height: Option<f32>,

    /// Initial layout: `all` or `split`.
    #[arg(long, default_value = "all")]
    mode: String,

    /// Run the simulation without a window and print the final layout as JSON.
    #[arg(long)]
    headless: bool,

    /// Tick limit for `--headless`; runs until settled when omitted.
    #[arg(long)]
    ticks: Option<usize>,
}

impl Args {
    fn chart_config(&self) -> Result<ChartConfig> {
        let mut config = match &self.config {
            Some(path) => ChartConfig::load(path)?,
            None => ChartConfig::default(),
        };

        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        config.validate().context("invalid chart settings")?;
        Ok(config)
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_headless(args: &Args, config: ChartConfig) -> Result<()> {
    let records = load_records(&args.data)
        .with_context(|| format!("failed to load records from {}", args.data.display()))?;
    let mut chart = BubbleChart::new(config, &records).context("failed to build chart")?;

    chart.set_mode(&args.mode);
    let ticks = chart.run(args.ticks.unwrap_or(usize::MAX));
    tracing::info!(ticks, settled = !chart.is_running(), "headless run finished");

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &chart.snapshot())
        .context("failed to write snapshot")?;
    writeln!(stdout).context("failed to write snapshot")?;
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();
    let config = args.chart_config()?;

    if args.headless {
        return run_headless(&args, config);
    }

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1100.0, 760.0]),
        ..Default::default()
    };
    let initial_mode = LayoutMode::from_name(&args.mode);

    eframe::run_native(
        "bubble-chart",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::BubbleApp::new(
                cc,
                args.data.clone(),
                config.clone(),
                initial_mode,
            )))
        }),
    )
    .map_err(|error| anyhow!("viewer failed: {error}"))
}
