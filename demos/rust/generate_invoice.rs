/// Invoice example: runs the full pipeline on a request file.
///
/// Run with:
///   cargo run --example generate_invoice -p invoice-demos -- \
///       demos/data/request.toml [demos/data/config.toml]
///
/// Without arguments a single-line request and the built-in configuration
/// are used. Output goes to demos/output/<file_name>.
use std::error::Error;
use std::fs;
use std::path::Path;

use invoice_core::{generate_invoice, InvoiceConfig, InvoiceRequest, ItemFields};
use tracing::info;
use tracing_subscriber::EnvFilter;

const OUTPUT_DIR: &str = "demos/output";

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

fn sample_request() -> InvoiceRequest {
    let mut items = ItemFields::default();
    items.push("Widget", "12345678", "3", "10.00");
    InvoiceRequest {
        buyer: Some("Acme Co".to_string()),
        date: Some("2024-01-01".to_string()),
        items,
    }
}

fn load_request(path: &Path) -> Result<InvoiceRequest, Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    Ok(toml::from_str(&text)?)
}

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let mut args = std::env::args().skip(1);
    let request = match args.next() {
        Some(path) => load_request(Path::new(&path))?,
        None => sample_request(),
    };
    let config = match args.next() {
        Some(path) => InvoiceConfig::load(path)?,
        None => InvoiceConfig::default(),
    };

    let file = generate_invoice(&request, &config, &mut rand::thread_rng())?;

    fs::create_dir_all(OUTPUT_DIR)?;
    let path = Path::new(OUTPUT_DIR).join(&file.file_name);
    fs::write(&path, &file.bytes)?;
    info!(path = %path.display(), bytes = file.bytes.len(), "written");
    Ok(())
}
