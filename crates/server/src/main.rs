//! MCP server exposing an S3 bucket's objects as extracted text.

mod config;
mod rpc;
mod storage;
mod tools;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use s3doc_core::Dispatcher;
use s3doc_pdf::PdfParser;
use s3doc_pptx::PptxParser;
use tokio::io::BufReader;

use crate::config::{Args, Config};
use crate::storage::S3Store;
use crate::tools::ToolHandler;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Initialize logging (stderr; stdout carries protocol frames)
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let config = Config::from_env(&args)?;
    log::info!(
        "Serving bucket '{}' in {} (default content type {})",
        config.bucket,
        config.region,
        config.default_content_type
    );

    let store = S3Store::new(&config).context("Failed to configure S3 client")?;
    let dispatcher = Dispatcher::new(Box::new(PdfParser::new()), Box::new(PptxParser::new()));
    let handler = ToolHandler::new(
        Arc::new(store),
        Arc::new(dispatcher),
        config.default_content_type.clone(),
    );

    rpc::serve(&handler, BufReader::new(tokio::io::stdin()), tokio::io::stdout()).await
}
