mod cli;

use anyhow::Result;
use clap::Parser;
use simple_logger::SimpleLogger;
use std::{fs, path::PathBuf, sync::Arc};

use html2dast::{
    assets::AssetResolver,
    builder::Converter,
    cms::CmaClient,
};

use cli::{Cli, read_input, read_output};

#[tokio::main]
async fn main() {
    let args = Cli::parse();
    let level = match args.verbose {
        true => log::LevelFilter::Debug,
        false => log::LevelFilter::Warn,
    };
    if let Err(e) = SimpleLogger::new()
        .with_level(level)
        .with_colors(true)
        .without_timestamps()
        .init()
    {
        eprintln!("Unable to initialize logging: {}", e);
    }

    if let Err(e) = run(args).await {
        eprintln!("Error converting document: {}", e);
        std::process::exit(1)
    }
}

async fn run(args: Cli) -> Result<()> {
    let resolver = match args.cma_config() {
        Some(config) => AssetResolver::new(Arc::new(CmaClient::new(config)?)),
        None => AssetResolver::disconnected(),
    };
    let converter = Converter::new(resolver, args.image_block_id.clone());
    let document = converter.convert(&read_input(&args)).await?;

    let serialized = match args.pretty {
        true => serde_json::to_string_pretty(&document)?,
        false => serde_json::to_string(&document)?,
    };
    render_string(serialized, read_output(&args))
}

fn render_string(result: String, output_destination: Option<PathBuf>) -> Result<()> {
    match output_destination {
        Some(out_file) => fs::write(out_file, result)?,
        None => println!("{}", result),
    }
    Ok(())
}
