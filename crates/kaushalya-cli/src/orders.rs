//! Read-only order and customer listings, plus the documents generated
//! from them.

use std::path::Path;

use clap::Subcommand;
use kaushalya_client::{ApiClient, Customers, Orders, SyncController};
use kaushalya_core::format_rupees;
use kaushalya_docs::{write_export, write_invoice, ExportKind};

use crate::{clip, fmt_date};

/// Sub-commands available under `orders`.
#[derive(Debug, Subcommand)]
pub enum OrdersCommands {
    /// List orders
    List {
        /// Only orders whose id contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Write every order to orders_report.xlsx in the export directory
    Export,
    /// Write the PDF invoice for one order to the export directory
    Invoice {
        /// Order id as shown by `orders list` (e.g. ORD-001)
        order_id: String,
    },
}

/// Sub-commands available under `customers`.
#[derive(Debug, Subcommand)]
pub enum CustomersCommands {
    /// List registered customers
    List {
        /// Only customers whose name or email contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Write every customer to users_report.xlsx in the export directory
    Export,
}

/// # Errors
///
/// Returns an error if the order list cannot be loaded, the requested order
/// does not exist, or a document cannot be written.
pub(crate) async fn run_orders(
    client: ApiClient,
    export_dir: &Path,
    command: OrdersCommands,
) -> anyhow::Result<()> {
    let mut orders = SyncController::<Orders>::new(client);
    orders.load().await?;

    match command {
        OrdersCommands::List { search } => {
            let hits = orders.search(search.as_deref().unwrap_or_default());
            if hits.is_empty() {
                println!("no orders found");
                return Ok(());
            }
            println!(
                "{:<14}{:<24}{:<12}{:<12}{:>14}",
                "ORDER", "CUSTOMER", "DATE", "STATUS", "TOTAL"
            );
            for order in hits {
                let customer = order.customer_name().unwrap_or_else(|| "\u{2014}".to_string());
                let status = order
                    .order_status
                    .as_ref()
                    .map_or_else(|| "\u{2014}".to_string(), ToString::to_string);
                println!(
                    "{:<14}{:<24}{:<12}{:<12}{:>14}",
                    clip(&order.order_id, 12),
                    clip(&customer, 21),
                    fmt_date(order.created_on()),
                    status,
                    format_rupees(order.total),
                );
            }
        }
        OrdersCommands::Export => {
            let path = write_export(orders.raw_records(), ExportKind::Orders, export_dir)?;
            println!(
                "exported {} orders to {}",
                orders.raw_records().len(),
                path.display()
            );
        }
        OrdersCommands::Invoice { order_id } => {
            let wanted = order_id.trim();
            let order = orders
                .records()
                .iter()
                .find(|o| o.order_id.trim() == wanted)
                .ok_or_else(|| anyhow::anyhow!("order '{wanted}' not found"))?;
            let path = write_invoice(order, export_dir)?;
            println!("invoice written to {}", path.display());
        }
    }
    Ok(())
}

/// # Errors
///
/// Returns an error if the customer list cannot be loaded or the export
/// cannot be written.
pub(crate) async fn run_customers(
    client: ApiClient,
    export_dir: &Path,
    command: CustomersCommands,
) -> anyhow::Result<()> {
    let mut customers = SyncController::<Customers>::new(client);
    customers.load().await?;

    match command {
        CustomersCommands::List { search } => {
            let hits = customers.search(search.as_deref().unwrap_or_default());
            if hits.is_empty() {
                println!("no customers found");
                return Ok(());
            }
            println!("{:<10}{:<26}{:<34}JOINED", "ID", "NAME", "EMAIL");
            for customer in hits {
                let name = customer.full_name().unwrap_or_else(|| "\u{2014}".to_string());
                println!(
                    "{:<10}{:<26}{:<34}{}",
                    clip(customer.id.as_str(), 8),
                    clip(&name, 23),
                    clip(customer.email.as_deref().unwrap_or("\u{2014}"), 31),
                    fmt_date(customer.joined_on()),
                );
            }
        }
        CustomersCommands::Export => {
            let path = write_export(customers.raw_records(), ExportKind::Customers, export_dir)?;
            println!(
                "exported {} customers to {}",
                customers.raw_records().len(),
                path.display()
            );
        }
    }
    Ok(())
}
