use clap::{Parser, Subcommand};
use lightbox_gallery::imaging::rust_backend::supported_input_extensions;
use lightbox_gallery::{catalog::Catalog, config, metadata, output, site};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lightbox-gallery")]
#[command(about = "Single-page photo gallery with a lightbox and EXIF panel")]
#[command(long_about = "\
Single-page photo gallery with a lightbox and EXIF panel

The catalog is a fixed list of images under one folder. Nothing is
discovered: list the images in config.toml, in display order.

Source structure:

  site/
  ├── config.toml                  # Optional, overrides stock defaults
  └── images/
      ├── photo-1.jpg
      └── photo-2.jpg

Build output:

  dist/
  ├── index.html                   # Grid, loading overlay, EXIF panel shell
  ├── lightbox.json                # Lightbox options and image dimensions
  ├── images/                      # Originals
  └── thumbs/                      # JPEG thumbnails

Run 'lightbox-gallery gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Source directory (holds config.toml and the image folder)
    #[arg(long, default_value = "site", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build thumbnails, copy originals and render the gallery page
    Build,
    /// Validate config and report missing or undecodable catalog images
    Check,
    /// Print the EXIF panel rows for one image
    Exif {
        /// Image file to inspect
        image: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            let config = config::load_config(&cli.source)?;
            init_thread_pool(&config.processing);
            println!("==> Building {} → {}", cli.source.display(), cli.output.display());
            let report = site::build(&cli.source, &cli.output, &config)?;
            let catalog = Catalog::from_config(&config.catalog);
            output::print_build_output(&catalog, &report);
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let config = config::load_config(&cli.source)?;
            let catalog = Catalog::from_config(&config.catalog);
            let missing = catalog.missing_sources(&cli.source);
            let unsupported = catalog.unsupported_formats(supported_input_extensions());
            output::print_check_output(&catalog, &missing, &unsupported);
            if !missing.is_empty() {
                return Err(format!("{} catalog image(s) missing", missing.len()).into());
            }
            println!("==> Gallery is valid");
        }
        Command::Exif { image } => {
            let record = metadata::resolve_file(&image);
            output::print_exif_output(&image, &record);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// `RUST_LOG` wins; otherwise `info`, with second-precision timestamps.
fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(Some(env_logger::fmt::TimestampPrecision::Seconds))
        .init();
}

/// Initialize the rayon thread pool based on processing config.
///
/// Caps at the number of available CPU cores; users can constrain down, not up.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
