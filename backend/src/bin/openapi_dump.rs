//! Print the OpenAPI document as JSON, or write it to a file.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use mailroom::doc::ApiDoc;
use utoipa::OpenApi;

/// `openapi-dump` command arguments.
#[derive(Debug, Parser)]
#[command(name = "openapi-dump", about = "Emit the Mailroom OpenAPI document", version)]
struct CliArgs {
    /// Write to this file instead of stdout.
    #[arg(long, short, value_name = "path")]
    output: Option<PathBuf>,
    /// Emit single-line JSON.
    #[arg(long)]
    compact: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let doc = ApiDoc::openapi();
    let json = if args.compact {
        doc.to_json()?
    } else {
        doc.to_pretty_json()?
    };
    match args.output {
        Some(path) => std::fs::write(&path, json)
            .wrap_err_with(|| format!("write OpenAPI document to {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}
