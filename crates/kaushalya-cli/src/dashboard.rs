use kaushalya_client::{fetch_dashboard_stats, ApiClient};
use kaushalya_core::format_rupees;

use crate::fmt_date;

/// Print the dashboard aggregate: totals, top states and recent orders.
///
/// # Errors
///
/// Returns an error if the stats request fails.
pub(crate) async fn run_stats(client: ApiClient) -> anyhow::Result<()> {
    let stats = fetch_dashboard_stats(&client).await?;

    println!("Revenue:   {}", format_rupees(stats.total_revenue));
    println!("Orders:    {}", stats.total_orders);
    println!("Customers: {}", stats.total_customers);

    if !stats.top_states.is_empty() {
        println!();
        println!("{:<24}ORDERS", "STATE");
        for state in &stats.top_states {
            println!("{:<24}{}", state.state, state.order_count);
        }
    }

    if !stats.recent_orders.is_empty() {
        println!();
        println!("{:<14}{:<12}{:>14}", "ORDER", "DATE", "TOTAL");
        for order in &stats.recent_orders {
            println!(
                "{:<14}{:<12}{:>14}",
                order.order_id,
                fmt_date(order.created_on()),
                format_rupees(order.total)
            );
        }
    }
    Ok(())
}
