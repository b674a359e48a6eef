mod app;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use kitab_roots::corpus::open_corpus;
use kitab_roots::layout::LayoutConfig;
use kitab_roots::root_map::RootMap;
use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;

const DUMP_TICK_LIMIT: u64 = 5_000;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Directory holding `surahs/*.yaml` and `roots/index.yaml`.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    /// Surah id to open the root map on; every surah when omitted.
    #[arg(long)]
    surah: Option<String>,
    /// YAML file overriding layout parameters.
    #[arg(long)]
    layout_config: Option<PathBuf>,
    #[arg(long, default_value = "info")]
    log_level: String,
    /// Settle the layout and print the graph as JSON instead of opening a window.
    #[arg(long)]
    dump_graph: bool,
}

fn load_layout_config(path: Option<&Path>) -> Result<LayoutConfig> {
    let Some(path) = path else {
        return Ok(LayoutConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read layout config {}", path.display()))?;
    serde_yaml::from_str(&raw)
        .with_context(|| format!("failed to parse layout config {}", path.display()))
}

fn dump_graph(args: &Args, config: LayoutConfig) -> Result<()> {
    let (corpus, catalog) = open_corpus(args.data_dir.as_deref())?;
    let scope = corpus
        .scope_for(args.surah.as_deref())
        .with_context(|| format!("unknown surah {:?}", args.surah.as_deref().unwrap_or_default()))?;

    let mut root_map = RootMap::new(corpus, catalog, config, scope);
    match root_map.run_until_settled(DUMP_TICK_LIMIT) {
        Some(ticks) => info!(ticks, "layout settled"),
        None => warn!(limit = DUMP_TICK_LIMIT, "layout did not settle, dumping current positions"),
    }

    let json = serde_json::to_string_pretty(&root_map.snapshot())
        .context("failed to serialize graph snapshot")?;
    println!("{json}");
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = args
        .log_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = load_layout_config(args.layout_config.as_deref())?;

    if args.dump_graph {
        return dump_graph(&args, config);
    }

    let request = app::LoadRequest {
        data_dir: args.data_dir,
        surah: args.surah,
    };
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 840.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Kitab al-Tanazur roots",
        options,
        Box::new(move |cc| Ok(Box::new(app::KitabApp::new(cc, request, config)))),
    )
    .map_err(|error| anyhow!("viewer failed: {error}"))
}
