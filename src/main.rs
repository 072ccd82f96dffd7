use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use icon_bundle::{DEFAULT_OUTPUT, SearchRoots};
use std::path::PathBuf;

/// Bundle system theme icons that are missing from an icon mapping table
#[derive(Parser, Debug)]
#[command(name = "icon-bundle", version, about, long_about = None)]
struct Args {
    /// Path to your existing mappings.yaml
    yaml_path: PathBuf,

    /// Output filename
    #[arg(short, long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let roots = SearchRoots::default();
    let report = icon_bundle::bundle_unmapped(&roots, &args.yaml_path, &args.output)
        .with_context(|| format!("failed to bundle unmapped icons into {:?}", args.output))?;

    println!(
        "Done! Created bundle: {} ({} files for {} missing mappings)",
        args.output.display(),
        report.files_written,
        report.missing
    );

    Ok(())
}
