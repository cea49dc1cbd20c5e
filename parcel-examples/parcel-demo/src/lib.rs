mod app;
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use parcel_client::{
    collect_assets, BlobEmbedding, PathPicker, ReqwestTransport, StatusLine, UploadClient,
    UploadOutcome,
};
use parcel_core::config::{CLIENT_BASE_URL, CLIENT_LABEL};
use parcel_core::ParcelConfig;
use tracing::info;

pub use app::parcel_app;
pub use config::config;

#[derive(Parser)]
#[command(name = "parcel-demo")]
#[command(version)]
#[command(about = "Upload files to a parcel server, or run one")]
pub struct Cli {
    /// Server to upload to (defaults to the configured http.host/http.port)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the upload server
    Serve,
    /// Upload image files
    Upload {
        /// Files to upload, sent as file0, file1, ... in this order
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Name used in status messages
        #[arg(short, long)]
        label: Option<String>,
    },
    /// Upload the generated sample text blob
    Blob {
        /// Send the blob as a data URI descriptor instead of a binary part
        #[arg(long)]
        data_uri: bool,
    },
}

pub async fn run(cli: Cli) -> Result<()> {
    let mut config = config::config();
    if let Some(base_url) = cli.base_url {
        config.set(CLIENT_BASE_URL, base_url);
    }

    match cli.command {
        Command::Serve => serve(&config).await,
        Command::Upload { paths, label } => {
            let assets = collect_assets(&PathPicker::new(paths)).await?;
            if assets.is_empty() {
                println!("Nothing to upload");
                return Ok(());
            }

            let client = upload_client(&config, label)?;
            let status = StatusLine::new();
            status.uploading(client.label());
            println!("{}", status.current());

            let outcome = client.upload_images(&assets).await;
            report(&status, &outcome).await
        }
        Command::Blob { data_uri } => {
            let embedding = if data_uri {
                BlobEmbedding::DataUri
            } else {
                BlobEmbedding::Native
            };

            let client = upload_client(&config, None)?;
            let status = StatusLine::new();
            status.uploading(parcel_client::client::BLOB_LABEL);
            println!("{}", status.current());

            let outcome = client.upload_generated_blob(embedding).await;
            report(&status, &outcome).await
        }
    }
}

async fn serve(config: &ParcelConfig) -> Result<()> {
    let app = parcel_app(config);
    let addr = app.address();

    println!("[parcel] listening on http://{addr}");

    app.listen(addr).await
}

fn upload_client(config: &ParcelConfig, label: Option<String>) -> Result<UploadClient<ReqwestTransport>> {
    let base_url = config
        .get(CLIENT_BASE_URL)
        .context("No client.base_url configured")?;
    let transport = ReqwestTransport::new(base_url)?;
    info!(endpoint = %transport.endpoint(), "uploading");

    let label = label
        .or_else(|| config.get(CLIENT_LABEL).map(str::to_string))
        .unwrap_or_else(|| "parcel".to_string());
    Ok(UploadClient::new(transport).with_label(label))
}

/// Print the outcome, then hold the status line until it clears.
async fn report(status: &StatusLine, outcome: &UploadOutcome) -> Result<()> {
    let clear = status.finish(outcome);
    println!("{}", status.current());

    if let Some(result) = &outcome.result {
        for file in result.files.iter().flatten() {
            println!("  {:<32} {:<24} {:>10} bytes", file.name, file.content_type, file.size);
        }
        if let Some(total) = result.total_files {
            println!("  totalFiles: {total}");
        }
    }

    clear.await?;
    Ok(())
}
