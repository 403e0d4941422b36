// src/main.rs
use anyhow::{bail, Context, Result};
use proposal_rs::{Assembler, ProposalCatalog, ProposalRequest};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args[0] == "--help" {
        eprintln!("Usage: proposal_rs <request.json> [templates-dir] [output-dir] [catalog.json]");
        eprintln!();
        eprintln!("Built-in proposal kinds:");
        for kind in ProposalCatalog::builtin().kinds() {
            eprintln!("  {}", kind);
        }
        if args.is_empty() {
            bail!("missing request file");
        }
        return Ok(());
    }

    let request_path = Path::new(&args[0]);
    let template_dir = PathBuf::from(args.get(1).map(String::as_str).unwrap_or("."));
    let output_dir = PathBuf::from(args.get(2).map(String::as_str).unwrap_or("."));

    let request_json = std::fs::read_to_string(request_path)
        .with_context(|| format!("failed to read request file {}", request_path.display()))?;
    let request: ProposalRequest =
        serde_json::from_str(&request_json).context("invalid request JSON")?;

    let catalog = match args.get(3) {
        Some(path) => ProposalCatalog::from_json_file(Path::new(path))
            .with_context(|| format!("failed to load catalog {}", path))?,
        None => ProposalCatalog::builtin(),
    };

    let assembler = Assembler::new(catalog, template_dir);
    let generated = assembler.generate(&request)?;
    let out_path = generated.save_to(&output_dir)?;

    println!("Proposal written to {}", out_path.display());
    Ok(())
}
