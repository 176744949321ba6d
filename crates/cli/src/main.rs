use clap::Parser;
use std::path::PathBuf;

use diskmap_core::human::human_bytes;
use diskmap_core::{build_tree, display_path, export, treemap, DataSource, LoadMsg, Loader};

#[derive(Parser, Debug)]
#[command(name = "diskmap-cli", about = "Disk size-tree report generator")]
struct Args {
    /// Directory holding size_tree.json and info.json
    #[arg(default_value = "assets", conflicts_with = "url")]
    assets: PathBuf,
    /// Base URL serving size_tree.json and info
    #[arg(long)]
    url: Option<String>,
    /// Layout viewport width
    #[arg(long, default_value_t = 1920.0)]
    width: f64,
    /// Layout viewport height
    #[arg(long, default_value_t = 1080.0)]
    height: f64,
    /// How many top-level entries to list
    #[arg(long, default_value_t = 10)]
    top: usize,
    /// Output JSON report path
    #[arg(short, long)]
    json: Option<PathBuf>,
    /// Output CSV report path
    #[arg(short, long)]
    csv: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let source = match &args.url {
        Some(base) => DataSource::Remote { base: base.clone() },
        None => DataSource::Local {
            dir: args.assets.clone(),
        },
    };

    let (tx, rx) = crossbeam_channel::unbounded::<LoadMsg>();
    std::thread::spawn(move || Loader::new(source).load(tx));

    let (raw, info) = match rx.recv() {
        Ok(LoadMsg::Done { raw, info }) => (raw, info),
        Ok(LoadMsg::Error(e)) => fail(&format!("load failed: {e}")),
        Err(_) => fail("load failed: worker hung up before reporting"),
    };

    let tree = build_tree(&raw);
    let layout = treemap::compute(&tree, args.width, args.height);

    let root = tree.node(tree.root);
    println!("total {} across {} nodes", human_bytes(root.size), tree.len());
    let viewport = layout.rect(tree.root).area();
    for id in root.children.iter().take(args.top) {
        let n = tree.node(*id);
        let share = if viewport > 0.0 {
            layout.rect(*id).area() / viewport * 100.0
        } else {
            0.0
        };
        println!(
            "{:>10}  {:>5.1}%  {}",
            human_bytes(n.size),
            share,
            display_path(&tree, *id, &info.sep)
        );
    }

    if let Some(path) = &args.json {
        let report = export::to_json(&tree, &layout, &info.sep);
        let text = match serde_json::to_string_pretty(&report) {
            Ok(text) => text,
            Err(e) => fail(&format!("json encode failed: {e}")),
        };
        if let Err(e) = std::fs::write(path, text) {
            fail(&format!("writing {} failed: {e}", path.display()));
        }
    }

    if let Some(path) = &args.csv {
        let file = match std::fs::File::create(path) {
            Ok(file) => file,
            Err(e) => fail(&format!("creating {} failed: {e}", path.display())),
        };
        if let Err(e) = export::to_csv(&tree, &layout, &info.sep, file) {
            fail(&format!("writing {} failed: {e}", path.display()));
        }
    }
}

fn fail(msg: &str) -> ! {
    eprintln!("{msg}");
    std::process::exit(1);
}
