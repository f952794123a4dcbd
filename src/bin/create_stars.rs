//! Generate the star-map data file from the Hipparcos catalogue
//!
//! Queries VizieR for Hipparcos stars at or brighter than the magnitude limit
//! and writes them to a JSON array of `{name, ra, dec, mag}` records.
//!
//! Usage:
//!   cargo run --bin create_stars -- [options]
//!
//! Set `RUST_LOG=info` to see query progress.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use hipstars::data::{CatalogQuery, CatalogSource, TsvFileSource, VizierClient, VIZIER_URL};
use hipstars::export_star_map;

/// Command line arguments for the star-map generator
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Extract bright Hipparcos stars into star-map JSON",
    long_about = "Queries the VizieR Hipparcos main catalogue (I/239/hip_main) for every star \
        at or brighter than the magnitude limit, drops rows without a position or magnitude, \
        and writes a pretty-printed JSON array of {name, ra, dec, mag} records."
)]
struct Args {
    #[arg(
        short,
        long,
        default_value = "stars.json",
        help = "Output JSON file"
    )]
    output: PathBuf,

    #[arg(
        short = 'm',
        long,
        default_value_t = 5.0,
        allow_negative_numbers = true,
        help = "Faintest V magnitude to include"
    )]
    max_magnitude: f64,

    #[arg(
        long,
        default_value = "I/239/hip_main",
        help = "VizieR catalog identifier"
    )]
    catalog: String,

    #[arg(
        long,
        default_value = VIZIER_URL,
        help = "VizieR server root URL"
    )]
    server: String,

    #[arg(
        long,
        default_value_t = 300,
        help = "HTTP timeout in seconds"
    )]
    timeout_secs: u64,

    #[arg(
        long,
        help = "Read a saved ASU-TSV response instead of querying the server",
        long_help = "Path to a response previously saved from the VizieR asu-tsv endpoint \
            (optionally .gz). The magnitude filter is not re-applied to file input."
    )]
    input: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let query = CatalogQuery::hipparcos_bright(args.max_magnitude).with_catalog(&args.catalog);

    let source: Box<dyn CatalogSource> = match &args.input {
        Some(path) => Box::new(TsvFileSource::new(path)),
        None => Box::new(
            VizierClient::new()
                .with_base_url(&args.server)
                .with_timeout(Duration::from_secs(args.timeout_secs)),
        ),
    };

    let count = export_star_map(source.as_ref(), &query, &args.output)?;
    println!("Generated {} entries.", count);

    Ok(())
}
