use kaushalya_core::DashboardStats;

use crate::client::ApiClient;
use crate::error::ClientError;

const STATS_PATH: &str = "/stats";

/// Fetches the dashboard aggregate. Missing `data` yields all-zero stats.
///
/// # Errors
///
/// Returns [`ClientError`] on transport failure, `success: false`, or a
/// `data` payload that is not an object.
pub async fn fetch_dashboard_stats(client: &ApiClient) -> Result<DashboardStats, ClientError> {
    let envelope = client.get(STATS_PATH).await?;
    Ok(envelope
        .decode::<DashboardStats>("stats")?
        .unwrap_or_default())
}
