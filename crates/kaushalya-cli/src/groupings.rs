//! Handlers shared by the catalog, accessory and best-seller pages.
//!
//! The three collections have the same shape (named groupings that own
//! products), so one set of sub-commands drives all of them through
//! [`SyncController`].

use clap::Subcommand;
use kaushalya_client::{AlwaysConfirm, ApiClient, ProductCollection, SyncController, SyncError};
use kaushalya_core::{
    discount_label, format_rupees, CategoryDraft, Money, PolishType, ProductDraft, ProductSize,
    RecordId,
};

use crate::prompt::StdinConfirm;
use crate::{clip, report_outcome};

/// Sub-commands available under `catalog`, `accessory` and `bestseller`.
#[derive(Debug, Subcommand)]
pub enum GroupingCommands {
    /// List groupings and their products
    List {
        /// Only groupings whose name or description contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Create a grouping
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Image URL
        #[arg(long)]
        image: Option<String>,
    },
    /// Edit a grouping (accessory and bestseller only)
    Update {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Image URL
        #[arg(long)]
        image: Option<String>,
    },
    /// Delete a grouping
    Delete {
        id: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Add a product to a grouping, or edit one with --product-id
    SaveProduct {
        /// Name of the grouping that owns the product
        #[arg(long)]
        parent: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        real_price: Money,
        #[arg(long)]
        discount_price: Money,
        /// e.g. "High Polish", "Matte Finish"
        #[arg(long)]
        polish: Option<String>,
        /// e.g. "Small", "Extra Large"
        #[arg(long)]
        size: Option<String>,
        #[arg(long)]
        about: Option<String>,
        /// Image URL; repeat for several images
        #[arg(long = "image")]
        images: Vec<String>,
        /// Existing product to overwrite
        #[arg(long)]
        product_id: Option<String>,
    },
}

/// Runs one grouping sub-command against collection `R`.
///
/// The collection is loaded first so listings and product saves see the
/// current backend state.
///
/// # Errors
///
/// Returns an error if the initial load fails, the input does not validate,
/// or the backend rejects the change. A declined delete is not an error.
pub(crate) async fn run_grouping<R>(client: ApiClient, command: GroupingCommands) -> anyhow::Result<()>
where
    R: ProductCollection<Draft = CategoryDraft>,
{
    let mut controller = SyncController::<R>::new(client);
    controller.load().await?;

    match command {
        GroupingCommands::List { search } => print_groupings(&controller, search.as_deref()),
        GroupingCommands::Add {
            name,
            description,
            image,
        } => {
            let draft = CategoryDraft {
                name,
                description,
                image,
            };
            let outcome = controller.create(&draft).await?;
            report_outcome(&outcome, &format!("{} created", R::NAME));
        }
        GroupingCommands::Update {
            id,
            name,
            description,
            image,
        } => {
            let draft = CategoryDraft {
                name,
                description,
                image,
            };
            let outcome = controller.update(&RecordId::from(id), &draft).await?;
            report_outcome(&outcome, &format!("{} updated", R::NAME));
        }
        GroupingCommands::Delete { id, yes } => {
            let id = RecordId::from(id);
            let result = if yes {
                controller.delete(&id, &mut AlwaysConfirm).await
            } else {
                controller.delete(&id, &mut StdinConfirm::default()).await
            };
            match result {
                Ok(outcome) => report_outcome(&outcome, &format!("{} {id} deleted", R::NAME)),
                Err(SyncError::Declined) => println!("delete cancelled"),
                Err(e) => return Err(e.into()),
            }
        }
        GroupingCommands::SaveProduct {
            parent,
            name,
            real_price,
            discount_price,
            polish,
            size,
            about,
            images,
            product_id,
        } => {
            let draft = ProductDraft {
                name,
                real_price: Some(real_price),
                discount_price: Some(discount_price),
                polish_type: polish.map(PolishType::from),
                size: size.map(ProductSize::from),
                about,
                images,
            };
            let product_id = product_id.map(RecordId::from);
            let outcome = controller
                .upsert_product(&parent, product_id.as_ref(), &draft)
                .await?;
            report_outcome(&outcome, "product saved");
        }
    }
    Ok(())
}

fn print_groupings<R: ProductCollection>(controller: &SyncController<R>, search: Option<&str>) {
    let hits = controller.search(search.unwrap_or_default());
    if hits.is_empty() {
        println!("no {} entries found", R::NAME);
        return;
    }
    println!("{:<26}{:<28}{:>9}  DESCRIPTION", "ID", "NAME", "PRODUCTS");
    for entry in hits {
        println!(
            "{:<26}{:<28}{:>9}  {}",
            clip(entry.id.as_str(), 24),
            clip(&entry.category_name, 26),
            entry.products.len(),
            clip(entry.description.as_deref().unwrap_or_default(), 40),
        );
        for product in &entry.products {
            println!(
                "    {:<36}{:>14}{:>14}  {}",
                clip(&product.name, 34),
                format_rupees(product.discount_price),
                format_rupees(product.real_price),
                discount_label(product.real_price, product.discount_price),
            );
        }
    }
}

/// Prints the storefront discount badge for a price pair.
pub(crate) fn run_discount(real: Money, discount: Money) {
    println!(
        "{}  ({} down from {})",
        discount_label(real, discount),
        format_rupees(discount),
        format_rupees(real)
    );
}
