use block_reconcile::config::{self, ReconcileConfig};
use block_reconcile::fetch::JsonFilePageSource;
use block_reconcile::gallery::{CaptionSnapshot, GalleryAttributes, GalleryEditor};
use block_reconcile::navigation::NavigationBlock;
use block_reconcile::output;
use block_reconcile::store::{BlockStore, MemoryStore};
use block_reconcile::types::{ClientId, MediaRecord, NavigationItem};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "block-reconcile")]
#[command(about = "Reconcile navigation links with pages and gallery images with media selections")]
#[command(long_about = "\
Reconcile navigation links with pages and gallery images with media selections

Navigation:
  Compares the links of a navigation block with the site's top-level pages
  and reports pages that have no link yet. With --populate the missing links
  are added, once, the way the editor's \"add all pages\" action does.

Gallery:
  Merges a media-library selection into a gallery. Captions edited inside the
  gallery are kept unless the library caption changed since the previous
  selection, which is passed in as a snapshot.

Input files are JSON: navigation links and gallery attributes as the editor
stores them, pages as returned by the REST pages endpoint, and media records
as returned by the media library.

Set RUST_LOG (e.g. RUST_LOG=debug) for diagnostics on stderr.
Run 'block-reconcile gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report which pages a navigation block is missing
    Reconcile {
        /// JSON file with the block's current links
        #[arg(long)]
        items: PathBuf,
        /// JSON file with the pages response
        #[arg(long)]
        pages: PathBuf,
        /// Add the missing pages and print the resulting links as JSON
        #[arg(long)]
        populate: bool,
    },
    /// Merge a media selection into a gallery
    Merge {
        /// JSON file with the gallery attributes (omit to start a new gallery)
        #[arg(long)]
        gallery: Option<PathBuf>,
        /// JSON file with the selected media records
        #[arg(long)]
        selection: PathBuf,
        /// JSON file with the caption snapshot of the previous selection
        #[arg(long)]
        snapshot: Option<PathBuf>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let value = serde_json::from_str(&content)
        .map_err(|e| format!("invalid JSON in {}: {}", path.display(), e))?;
    Ok(value)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Reconcile {
            items,
            pages,
            populate,
        } => {
            let config = config::load_config(&cli.config)?;
            run_reconcile(&config, &items, &pages, populate).await?;
        }
        Command::Merge {
            gallery,
            selection,
            snapshot,
        } => {
            let config = config::load_config(&cli.config)?;
            run_merge(&config, gallery.as_deref(), &selection, snapshot.as_deref())?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

async fn run_reconcile(
    config: &ReconcileConfig,
    items_path: &Path,
    pages_path: &Path,
    populate: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = ClientId::new("navigation");
    let items: Vec<NavigationItem> = read_json(items_path)?;
    let mut store = MemoryStore::new();
    store.replace_items(&client, items);

    let mut block = NavigationBlock::new(client.clone(), config.navigation.placement);
    let source = JsonFilePageSource::new(pages_path);
    block.refresh(&store, &source, &config.navigation).await?;

    output::print_reconciliation(
        &store.get_items(&client),
        block.pages(),
        block.last_result(),
        block.state(),
    );

    if populate {
        let added = block.populate(&mut store);
        if !added {
            eprintln!("Nothing to add");
        }
        println!();
        println!("{}", serde_json::to_string_pretty(&store.get_items(&client))?);
    }
    Ok(())
}

fn run_merge(
    config: &ReconcileConfig,
    gallery_path: Option<&Path>,
    selection_path: &Path,
    snapshot_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = ClientId::new("gallery");
    let selection: Vec<MediaRecord> = read_json(selection_path)?;

    let mut store = MemoryStore::new();
    if let Some(path) = gallery_path {
        let value: serde_json::Value = read_json(path)?;
        let attributes = GalleryAttributes::from_value_with_defaults(value, &config.gallery)
            .map_err(|e| format!("invalid gallery in {}: {}", path.display(), e))?;
        store.set_attributes(&client, attributes);
    }

    let mut editor = GalleryEditor::new(client.clone(), config.gallery.clone());
    if let Some(path) = snapshot_path {
        let snapshot: CaptionSnapshot = read_json(path)?;
        editor.restore_attachment_captions(snapshot);
    }
    editor.on_select_images(&mut store, &selection)?;

    let merged = store.get_attributes(&client)?;
    output::print_gallery(&merged, config.gallery.default_columns);
    println!();
    let json = serde_json::json!({
        "attributes": merged,
        "attachmentCaptions": editor.attachment_captions(),
    });
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
