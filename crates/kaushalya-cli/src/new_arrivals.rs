//! New-arrival entries: title, description and a single image.

use clap::Subcommand;
use kaushalya_client::{AlwaysConfirm, ApiClient, NewArrivals, SyncController, SyncError};
use kaushalya_core::{NewArrivalDraft, RecordId};

use crate::prompt::StdinConfirm;
use crate::{clip, report_outcome};

/// Sub-commands available under `new-arrivals`.
#[derive(Debug, Subcommand)]
pub enum NewArrivalsCommands {
    /// List new-arrival entries
    List {
        /// Only entries whose title or description contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Create an entry
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Edit an entry
    Update {
        id: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        image_url: Option<String>,
    },
    /// Delete an entry
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// # Errors
///
/// Returns an error if the list cannot be loaded, the draft does not
/// validate, or the backend rejects the change.
pub(crate) async fn run_new_arrivals(
    client: ApiClient,
    command: NewArrivalsCommands,
) -> anyhow::Result<()> {
    let mut arrivals = SyncController::<NewArrivals>::new(client);
    arrivals.load().await?;

    match command {
        NewArrivalsCommands::List { search } => {
            let hits = arrivals.search(search.as_deref().unwrap_or_default());
            if hits.is_empty() {
                println!("no new arrivals found");
                return Ok(());
            }
            println!("{:<26}{:<32}IMAGE", "ID", "TITLE");
            for entry in hits {
                println!(
                    "{:<26}{:<32}{}",
                    clip(entry.id.as_str(), 24),
                    clip(&entry.title, 30),
                    entry.image_url.as_deref().unwrap_or("\u{2014}"),
                );
            }
        }
        NewArrivalsCommands::Add {
            title,
            description,
            image_url,
        } => {
            let draft = NewArrivalDraft {
                title,
                description,
                image_url,
            };
            report_outcome(&arrivals.create(&draft).await?, "new arrival created");
        }
        NewArrivalsCommands::Update {
            id,
            title,
            description,
            image_url,
        } => {
            let draft = NewArrivalDraft {
                title,
                description,
                image_url,
            };
            let outcome = arrivals.update(&RecordId::from(id), &draft).await?;
            report_outcome(&outcome, "new arrival updated");
        }
        NewArrivalsCommands::Delete { id, yes } => {
            let id = RecordId::from(id);
            let result = if yes {
                arrivals.delete(&id, &mut AlwaysConfirm).await
            } else {
                arrivals.delete(&id, &mut StdinConfirm::default()).await
            };
            match result {
                Ok(outcome) => report_outcome(&outcome, &format!("new arrival {id} deleted")),
                Err(SyncError::Declined) => println!("delete cancelled"),
                Err(e) => return Err(e.into()),
            }
        }
    }
    Ok(())
}
