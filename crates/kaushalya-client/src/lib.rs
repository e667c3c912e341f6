//! REST client for the storefront backend and the generic controller that
//! keeps a local copy of each collection in sync with it.

pub mod client;
pub mod envelope;
pub mod error;
pub mod media;
pub mod resources;
pub(crate) mod retry;
pub mod session;
pub mod stats;
pub mod sync;

pub use client::ApiClient;
pub use envelope::Envelope;
pub use error::{AuthError, ClientError, SyncError};
pub use media::MediaController;
pub use resources::{
    Accessory, BestSeller, Catalog, Customers, MutableResource, NewArrivals, Orders,
    ProductCollection, Resource,
};
pub use session::{login, Session, SessionStore};
pub use stats::fetch_dashboard_stats;
pub use sync::{AlwaysConfirm, Confirm, MutationOutcome, SyncController};
