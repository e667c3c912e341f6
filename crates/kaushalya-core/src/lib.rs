pub mod app_config;
pub mod arrivals;
pub mod catalog;
pub mod config;
pub mod error;
pub mod media;
pub mod money;
pub mod orders;
pub mod pricing;
pub mod search;
pub mod wire;

pub use app_config::{AdminCredentials, AppConfig, Environment};
pub use arrivals::{NewArrivalDraft, NewArrivalEntry};
pub use catalog::{
    CatalogEntry, CategoryDraft, PolishType, ProductDraft, ProductEntry, ProductSize,
    SHOP_ALL_ID, SHOP_ALL_NAME,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use error::{ConfigError, ValidationError};
pub use media::{MediaKind, MediaSettings, MediaUpload};
pub use money::Money;
pub use orders::{CustomerRecord, DashboardStats, OrderItem, OrderRecord, OrderStatus, StateCount};
pub use pricing::{discount_label, discount_percent, format_rupees};
pub use search::{filter_records, Searchable};
pub use wire::RecordId;

/// Implemented by form drafts that must pass client-side checks before any
/// request is sent.
pub trait Validate {
    /// # Errors
    ///
    /// Returns [`ValidationError`] describing the first failing field.
    fn validate(&self) -> Result<(), ValidationError>;
}
