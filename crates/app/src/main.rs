mod state;
mod ui;
mod view;

use clap::Parser;
use eframe::egui;
use std::path::PathBuf;

use diskmap_core::DataSource;
use state::AppState;

#[derive(Parser, Debug)]
#[command(name = "diskmap", about = "Zoomable treemap viewer for disk size trees")]
struct Args {
    /// Base URL serving size_tree.json and info (production mode).
    #[arg(long, conflicts_with = "assets")]
    url: Option<String>,

    /// Directory holding size_tree.json and info.json (dev mode).
    #[arg(long, default_value = "assets")]
    assets: PathBuf,
}

impl Args {
    fn source(&self) -> DataSource {
        match &self.url {
            Some(base) => DataSource::Remote { base: base.clone() },
            None => DataSource::Local {
                dir: self.assets.clone(),
            },
        }
    }
}

struct DiskmapApp {
    state: AppState,
}

impl DiskmapApp {
    fn new(cc: &eframe::CreationContext<'_>, source: DataSource) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());
        Self {
            state: AppState::new(source),
        }
    }
}

impl eframe::App for DiskmapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        ui::draw(&mut self.state, ctx);
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let source = args.source();
    tracing::info!(?source, "starting viewer");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Disk Treemap",
        options,
        Box::new(|cc| Ok(Box::new(DiskmapApp::new(cc, source)))),
    )
}
