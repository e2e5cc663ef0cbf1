mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use eframe::egui;

use app::CareerDashApp;
use career_dash::config::DashboardConfig;
use career_dash::data::loader;
use career_dash::RenderModel;
use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "career-dash")]
#[command(about = "Salary dashboard for data-career job postings")]
#[command(version)]
struct CliArgs {
    /// Dataset location: an http(s) URL or a local CSV path
    #[arg(long, env = "CAREER_DASH_SOURCE")]
    source: Option<String>,

    /// Read configuration from this TOML file instead of the default search
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the unfiltered dashboard as JSON and exit, without opening a window
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = CliArgs::parse();

    let mut config = match &args.config {
        Some(path) => DashboardConfig::load_from_file(path)
            .with_context(|| format!("Loading config from {}", path.display()))?,
        None => DashboardConfig::load(),
    };
    if let Some(source) = args.source {
        config.source = source;
    }

    let source = config.data_source();
    let dataset = match loader::load(&source, config.fetch_timeout()) {
        Ok(dataset) => dataset,
        Err(e) => {
            log::error!("Dataset unavailable: {e}");
            return Err(e).with_context(|| format!("Loading dataset from {source}"));
        }
    };
    log::info!("Loaded {} postings from {source}", dataset.len());

    if args.json {
        let model = RenderModel::build(&dataset, &dataset.options.select_all(), &config.analysis);
        println!("{}", serde_json::to_string_pretty(&model)?);
        return Ok(());
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    let state = AppState::new(dataset, config.analysis);
    eframe::run_native(
        "Data Career Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(CareerDashApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("UI terminated: {e}"))
}
