//! Storefront banner image and promotional video.

use std::path::PathBuf;

use clap::Subcommand;
use kaushalya_client::{ApiClient, MediaController};
use kaushalya_core::MediaUpload;

use crate::report_outcome;

/// Sub-commands available under `media`.
#[derive(Debug, Subcommand)]
pub enum MediaCommands {
    /// Show the current banner image and video
    Show,
    /// Upload a new banner image, video, or both
    Upload {
        #[arg(long)]
        image: Option<PathBuf>,
        #[arg(long)]
        video: Option<PathBuf>,
    },
}

/// # Errors
///
/// Returns an error if the files are missing or of the wrong type, or the
/// backend call fails.
pub(crate) async fn run_media(client: ApiClient, command: MediaCommands) -> anyhow::Result<()> {
    let mut media = MediaController::new(client);
    match command {
        MediaCommands::Show => {
            let Some(current) = media.load().await? else {
                println!("no media uploaded yet");
                return Ok(());
            };
            println!("image: {}", current.image_url.as_deref().unwrap_or("\u{2014}"));
            println!("video: {}", current.video_url.as_deref().unwrap_or("\u{2014}"));
        }
        MediaCommands::Upload { image, video } => {
            let outcome = media.upload(&MediaUpload { image, video }).await?;
            report_outcome(&outcome, "media uploaded");
        }
    }
    Ok(())
}
