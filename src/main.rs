use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use artist_assist::api::SimilarColorDto;
use artist_assist::assets::{AssetCategory, AssetLoader};
use artist_assist::models::{AppConfig, PaintSetDefinition};
use artist_assist::server;
use artist_assist::services::PaintCatalog;
use pigment_mix::{Consistency, Medium, MixingEngine, PaintKey, PreparedPaintSet, SimilaritySearch, Srgb};

#[derive(Parser)]
#[command(name = "artist-assist")]
#[command(about = "Paint mixing and color matching for artists")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve JSON-lines requests on stdin/stdout
    Serve,
    /// Mix catalog paints and print the result
    Mix {
        /// Paint medium (e.g. oil, watercolor)
        #[arg(short, long)]
        medium: Medium,

        /// Paints as brand:id, in order (repeatable)
        #[arg(short, long = "paint", value_parser = parse_paint_key, required = true)]
        paints: Vec<PaintKey>,

        /// Relative parts per paint, comma-separated (e.g. 1,2)
        #[arg(short, long, value_delimiter = ',', required = true)]
        fractions: Vec<u8>,

        /// Background color as hex (defaults to the configured background)
        #[arg(short, long)]
        background: Option<String>,

        /// Lay the mix as a glaze over the background
        #[arg(long)]
        glaze: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Find mixes of a paint set closest to a target color
    Match {
        /// Target color as hex (e.g. "#D2691E")
        target: String,

        /// Paint medium
        #[arg(short, long)]
        medium: Medium,

        /// Brand whose paints (or store-bought set) to use
        #[arg(long)]
        brand: String,

        /// Store-bought set of the brand; all brand paints when left out
        #[arg(long)]
        set: Option<String>,

        /// Background color as hex (defaults to the configured background)
        #[arg(short, long)]
        background: Option<String>,

        /// Match as a glaze over the background
        #[arg(long)]
        glaze: bool,

        /// Most matches to print
        #[arg(short, long)]
        limit: Option<usize>,

        /// Search every composition instead of stopping at good enough matches
        #[arg(long)]
        full: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List catalog brands and paints
    Catalog {
        /// Only this medium
        #[arg(short, long)]
        medium: Option<Medium>,

        /// Also list the paints of each brand
        #[arg(long)]
        paints: bool,
    },
    /// Extract embedded assets to filesystem for customization
    Init {
        /// Extract the paint catalog
        #[arg(long)]
        catalog: bool,

        /// Extract config.yaml
        #[arg(long)]
        config: bool,

        /// Extract all assets
        #[arg(long)]
        all: bool,

        /// Overwrite existing files
        #[arg(long, short)]
        force: bool,

        /// List embedded assets without extracting
        #[arg(long)]
        list: bool,
    },
}

fn parse_paint_key(s: &str) -> Result<PaintKey, String> {
    let (brand, id) = s
        .split_once(':')
        .ok_or_else(|| format!("expected brand:id, got {s:?}"))?;
    let id = id
        .parse()
        .map_err(|e| format!("invalid paint id {id:?}: {e}"))?;
    Ok(PaintKey::new(brand, id))
}

/// Logs go to stderr; stdout carries results.
fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "artist_assist=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn asset_loader() -> AssetLoader {
    let loader = AssetLoader::from_env();
    match loader.seed_if_configured() {
        Ok(report) if !report.is_empty() => {
            tracing::info!(
                catalog = report.catalog_seeded.len(),
                config = report.config_seeded,
                "Seeded empty paths with embedded assets"
            );
        }
        Err(e) => tracing::warn!(%e, "Failed to seed assets"),
        _ => {}
    }
    loader
}

fn parse_background(value: Option<&str>, config: &AppConfig) -> anyhow::Result<Srgb> {
    match value {
        Some(hex) => hex
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid background {hex:?}: {e}")),
        None => Ok(config.background()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Serve) => run_server().await,
        Some(Commands::Mix {
            medium,
            paints,
            fractions,
            background,
            glaze,
            json,
        }) => run_mix_command(medium, &paints, &fractions, background.as_deref(), glaze, json),
        Some(Commands::Match {
            target,
            medium,
            brand,
            set,
            background,
            glaze,
            limit,
            full,
            json,
        }) => run_match_command(MatchArgs {
            target,
            medium,
            brand,
            set,
            background,
            glaze,
            limit,
            full,
            json,
        }),
        Some(Commands::Catalog { medium, paints }) => run_catalog_command(medium, paints),
        Some(Commands::Init {
            catalog,
            config,
            all,
            force,
            list,
        }) => run_init_command(catalog, config, all, force, list),
        None => {
            run_status_command();
            Ok(())
        }
    }
}

async fn run_server() -> anyhow::Result<()> {
    init_logging();
    let loader = asset_loader();
    let server = server::create_server(&loader)?;
    tracing::info!(paints = server.catalog().len(), "Serving JSON-lines requests on stdio");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    server.serve(stdin, tokio::io::stdout()).await?;
    Ok(())
}

fn run_mix_command(
    medium: Medium,
    keys: &[PaintKey],
    fractions: &[u8],
    background: Option<&str>,
    glaze: bool,
    json: bool,
) -> anyhow::Result<()> {
    init_logging();
    let loader = asset_loader();
    let config = AppConfig::load_from_assets(&loader);
    let catalog = PaintCatalog::load_from_assets(&loader)?;
    let background = parse_background(background, &config)?;

    let paints: Vec<_> = catalog
        .get_all(medium, keys)?
        .into_iter()
        .map(Arc::new)
        .collect();
    let engine = MixingEngine::new(medium, background);

    let mut mixes = Vec::new();
    for &consistency in engine.consistencies() {
        mixes.push(engine.mix(&paints, fractions, glaze, consistency)?);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&mixes)?);
        return Ok(());
    }

    for mix in &mixes {
        let parts: Vec<String> = mix
            .parts
            .iter()
            .map(|p| format!("{} x {}", p.fraction.get(), p.paint.label()))
            .collect();
        println!(
            "{} {:<5} L={:.1} a={:.1} b={:.1}  {}",
            mix.color,
            mix.consistency.to_string(),
            mix.lab.l,
            mix.lab.a,
            mix.lab.b,
            parts.join(" + ")
        );
    }
    if glaze && !medium.supports_glaze() {
        eprintln!("Note: {medium} cannot be glazed; mixed as a body color");
    }
    Ok(())
}

struct MatchArgs {
    target: String,
    medium: Medium,
    brand: String,
    set: Option<String>,
    background: Option<String>,
    glaze: bool,
    limit: Option<usize>,
    full: bool,
    json: bool,
}

fn run_match_command(args: MatchArgs) -> anyhow::Result<()> {
    init_logging();
    let loader = asset_loader();
    let config = AppConfig::load_from_assets(&loader);
    let catalog = PaintCatalog::load_from_assets(&loader)?;
    let background = parse_background(args.background.as_deref(), &config)?;
    let target: Srgb = args
        .target
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid target {:?}: {e}", args.target))?;

    let definition = match args.set {
        Some(ref name) => PaintSetDefinition::new(args.medium).with_store_bought(&args.brand, name),
        None => {
            let ids: Vec<u32> = catalog
                .paints(args.medium, &args.brand)
                .ok_or_else(|| anyhow::anyhow!("No {} paints of brand {}", args.medium, args.brand))?
                .iter()
                .map(|p| p.id)
                .collect();
            PaintSetDefinition::new(args.medium).with_colors(&args.brand, &ids)
        }
    };
    let paint_set = catalog.resolve(&definition)?;

    let mut options = config.search.to_options();
    if let Some(limit) = args.limit {
        options = options.limit_results(limit);
    }
    if args.full {
        options = options.tight_search(false);
    }

    let prepared = PreparedPaintSet::new(paint_set);
    let results = SimilaritySearch::new(&prepared, background).find(target, args.glaze, &options);

    if args.json {
        let results: Vec<SimilarColorDto> = results.iter().map(Into::into).collect();
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No mix within dE {:.1} of {target}", options.max_delta_e);
        return Ok(());
    }
    for result in &results {
        let mix = &result.paint_mix;
        let parts: Vec<String> = mix
            .parts
            .iter()
            .map(|p| format!("{} x {}", p.fraction.get(), p.paint.label()))
            .collect();
        let thin = if mix.consistency == Consistency::Thin { " (thin)" } else { "" };
        println!(
            "dE {:>5.2}  {}{}  {}",
            result.delta_e,
            mix.color,
            thin,
            parts.join(" + ")
        );
    }
    Ok(())
}

fn run_catalog_command(medium: Option<Medium>, paints: bool) -> anyhow::Result<()> {
    init_logging();
    let loader = asset_loader();
    let catalog = PaintCatalog::load_from_assets(&loader)?;

    let media = match medium {
        Some(medium) => vec![medium],
        None => catalog.media(),
    };
    for medium in media {
        println!("{medium}:");
        for brand in catalog.brands(medium) {
            println!(
                "  {:<12} {} ({} paints)",
                brand.brand,
                brand.full_name.as_deref().unwrap_or(""),
                brand.paint_count
            );
            for set in &brand.sets {
                println!("    set: {set}");
            }
            if paints {
                for paint in catalog.paints(medium, &brand.brand).unwrap_or_default() {
                    println!("    {:>4} {} {}", paint.id, paint.rgb, paint.name);
                }
            }
        }
    }
    Ok(())
}

fn run_init_command(
    catalog: bool,
    config: bool,
    all: bool,
    force: bool,
    list: bool,
) -> anyhow::Result<()> {
    if list {
        println!("Embedded assets:\n");
        println!("Catalog:");
        for f in AssetLoader::list_embedded(AssetCategory::Catalog) {
            println!("  {f}");
        }
        println!("\nConfig:");
        for f in AssetLoader::list_embedded(AssetCategory::Config) {
            println!("  {f}");
        }
        return Ok(());
    }

    let mut categories = Vec::new();
    if all || catalog {
        categories.push(AssetCategory::Catalog);
    }
    if all || config {
        categories.push(AssetCategory::Config);
    }

    if categories.is_empty() {
        eprintln!("No categories specified. Use --all, --catalog, or --config");
        eprintln!("\nRun 'artist-assist init --list' to see embedded assets.");
        std::process::exit(1);
    }

    let loader = AssetLoader::from_env();
    let report = loader.init(&categories, force)?;

    if !report.written.is_empty() {
        println!("Extracted {} files:", report.written.len());
        for f in &report.written {
            println!("  + {f}");
        }
    }
    if !report.skipped.is_empty() {
        println!(
            "\nSkipped {} existing files (use --force to overwrite):",
            report.skipped.len()
        );
        for f in &report.skipped {
            println!("  - {f}");
        }
    }

    if report.written.is_empty() && report.skipped.is_empty() {
        println!("No files to extract.");
    }

    Ok(())
}

/// Display status and configuration information
fn run_status_command() {
    const VERSION: &str = env!("CARGO_PKG_VERSION");

    let config_file = std::env::var("CONFIG_FILE").ok();
    let catalog_dir = std::env::var("CATALOG_DIR").ok();

    println!("artist-assist v{VERSION}");
    println!("Paint mixing and color matching for artists\n");

    println!("Environment Variables:");
    println!(
        "  CONFIG_FILE = {}",
        config_file.as_deref().unwrap_or("(not set)")
    );
    println!(
        "  CATALOG_DIR = {}",
        catalog_dir.as_deref().unwrap_or("(not set)")
    );

    println!("\nAsset Sources:");
    let loader = AssetLoader::new(
        catalog_dir.clone().map(PathBuf::from),
        config_file.clone().map(PathBuf::from),
    );

    let config_source = match config_file {
        Some(ref path) if PathBuf::from(path).exists() => path.to_string(),
        Some(_) => "embedded (file not found)".to_string(),
        None => "embedded".to_string(),
    };
    println!("  Config:  {config_source}");

    let embedded = AssetLoader::list_embedded(AssetCategory::Catalog).len();
    let merged = loader.list_catalog().len();
    match catalog_dir {
        Some(ref dir) => println!("  Catalog: {dir} ({merged} files, {embedded} embedded)"),
        None => println!("  Catalog: embedded ({embedded} files)"),
    }

    println!("\nCommands:");
    println!("  artist-assist serve    Serve JSON-lines requests on stdin/stdout");
    println!("  artist-assist mix      Mix catalog paints");
    println!("  artist-assist match    Find mixes closest to a target color");
    println!("  artist-assist catalog  List brands and paints");
    println!("  artist-assist init     Extract embedded assets for customization");
    println!("  artist-assist --help   Show all options");
}
