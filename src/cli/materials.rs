// ABOUTME: CLI upload and check-in commands
//
// Both need a saved session; the bearer token comes from the session store.

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use std::io::Write;
use tokio::sync::watch;

use super::{CheckInArgs, OutputFormat, UploadArgs, print_json};
use crate::api::PortalApiClient;
use crate::config::AppConfig;
use crate::materials::{UploadProgress, validate_material};
use crate::session;

#[derive(Debug, Serialize)]
pub struct UploadOutput {
    pub file_name: String,
    pub title: String,
    pub size: u64,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CheckInOutput {
    pub message: String,
}

/// A client carrying the saved session token
fn signed_in_client(config: &AppConfig) -> Result<PortalApiClient> {
    let store = session::store_from_config(&config.session)?;
    let restored = session::restore(store.as_ref())
        .ok_or_else(|| anyhow!("Not signed in. Run 'ict-portal login --email <EMAIL>' first."))?;

    let mut client = PortalApiClient::new(&config.api)?;
    client.set_token(Some(restored.token));
    Ok(client)
}

/// Execute the upload command
pub async fn upload(args: UploadArgs, config: AppConfig, format: OutputFormat) -> Result<()> {
    let material = validate_material(&args.path, args.title.as_deref(), &config.materials)
        .with_context(|| format!("Cannot upload {}", args.path.display()))?;
    let client = signed_in_client(&config)?;

    let (tx, mut rx) = watch::channel(UploadProgress::default());
    let reporter = tokio::spawn(async move {
        if format != OutputFormat::Text {
            return;
        }
        while rx.changed().await.is_ok() {
            let progress = *rx.borrow_and_update();
            eprint!("\rUploading... {:>3}%", progress.percent());
            let _ = std::io::stderr().flush();
        }
        eprintln!();
    });

    let result = client.upload_material(&material, tx).await;
    // The sender is dropped with the request, which ends the reporter
    let _ = reporter.await;

    let message = result.map_err(|e| anyhow!(e.user_message("Upload failed. Please try again.")))?;

    match format {
        OutputFormat::Json => print_json(&UploadOutput {
            file_name: material.file_name,
            title: material.title,
            size: material.size,
            message,
        })?,
        OutputFormat::Text => println!("{message}: {} ({})", material.title, material.file_name),
    }
    Ok(())
}

/// Execute the check-in command
pub async fn check_in(args: CheckInArgs, config: AppConfig, format: OutputFormat) -> Result<()> {
    let client = signed_in_client(&config)?;
    let message = client
        .check_in(&args.token)
        .await
        .map_err(|e| anyhow!(e.user_message("Check-in failed. Please try again.")))?;

    match format {
        OutputFormat::Json => print_json(&CheckInOutput { message })?,
        OutputFormat::Text => println!("{message}"),
    }
    Ok(())
}
