// Maps every file named on the command line and prints a short hex preview of it.
//
// RUST_LOG=filemap=debug cargo run --example dump -- Cargo.toml src/lib.rs



use anyhow::{bail, Context, Result};
use filemap::{Advice, MapCfg};
use tracing_subscriber::EnvFilter;



const PREVIEW_LEN: usize = 32;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        bail!("usage: dump <FILE>...");
    }

    // The preview only ever touches the start of each file.
    let cfg = MapCfg::new().advise(Advice::Sequential);

    for path in &paths {
        let file = cfg.open(path).with_context(|| format!("mapping {path}"))?;

        let preview = file.get(0, PREVIEW_LEN.min(file.len())).unwrap_or_default();
        let hex: Vec<String> = preview.iter().map(|b| format!("{b:02x}")).collect();

        println!("{path}: {} bytes", file.size());
        println!("    {}", hex.join(" "));
    }

    Ok(())
}
