use clap::{Parser, Subcommand};
use mongo_guide::{config, generate, output, scan, search};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let described = env!("GIT_DESCRIBE");
    if described.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        described
    }
}

#[derive(Parser)]
#[command(name = "mongo-guide")]
#[command(about = "Static documentation site generator for MongoDB articles")]
#[command(long_about = "\
Static documentation site generator for MongoDB articles

Articles are markdown files grouped into levels. Every article page gets a
navigation sidebar and an \"On this page\" table of contents built from its
headings.

Content structure:

  content/
  ├── config.toml                  # Site config (optional)
  ├── index.md                     # Home page introduction (optional)
  ├── assets/                      # Copied to the output root
  ├── 010-beginner/                # Level (numbered = shown in nav)
  │   ├── index.md                 # Level title, description, intro
  │   ├── 010-introduction.md      # Topic
  │   └── 020-crud-operations.md
  └── 030-advanced/
      ├── 010-replication.md
      └── scratch-notes.md         # No number prefix = hidden from nav

Front matter (optional, TOML between +++ lines):
  title, description, draft

Run 'mongo-guide gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Directory for intermediate files (manifest)
    #[arg(long, default_value = ".mongo-guide-temp", global = true)]
    temp_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan content directory into a manifest
    Scan,
    /// Produce the HTML site from the manifest
    Generate,
    /// Run the full pipeline: scan → generate
    Build,
    /// Validate content directory without building
    Check,
    /// Print the heading outline of one article
    Toc {
        /// Level slug, e.g. `beginner`
        level: String,
        /// Topic slug, e.g. `crud-operations`
        topic: String,
    },
    /// Search article text
    Search {
        query: String,
        /// Maximum number of matching lines (defaults to search.max_results)
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Scan => {
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);
        }
        Command::Generate => {
            let manifest_path = cli.temp_dir.join("manifest.json");
            let manifest_content = std::fs::read_to_string(&manifest_path)?;
            let manifest: scan::Manifest = serde_json::from_str(&manifest_content)?;
            init_thread_pool(&manifest.config.processing);
            generate::generate(&manifest, &cli.source, &cli.output)?;
            output::print_generate_output(&manifest);
        }
        Command::Build => {
            println!("==> Stage 1: Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            write_manifest(&manifest, &cli.temp_dir)?;
            output::print_scan_output(&manifest, &cli.source);

            println!("==> Stage 2: Generating HTML → {}", cli.output.display());
            init_thread_pool(&manifest.config.processing);
            generate::generate(&manifest, &cli.source, &cli.output)?;
            output::print_generate_output(&manifest);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest, &cli.source);
            println!("==> Content is valid");
        }
        Command::Toc { level, topic } => {
            let manifest = scan::scan(&cli.source)?;
            let doc = manifest.lookup(&level, &topic)?;
            output::print_toc(doc);
        }
        Command::Search { query, limit } => {
            let manifest = scan::scan(&cli.source)?;
            let mut settings = manifest.config.search.clone();
            if let Some(limit) = limit {
                settings.max_results = limit;
            }
            let hits = search::search(&manifest, &query, &settings);
            output::print_search_hits(&query, &hits);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Write the scan manifest to `temp_dir/manifest.json`.
fn write_manifest(manifest: &scan::Manifest, temp_dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(temp_dir)?;
    let json = serde_json::to_string_pretty(manifest)?;
    std::fs::write(temp_dir.join("manifest.json"), json)
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; user can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
