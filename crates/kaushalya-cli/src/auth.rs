//! Sign-in and sign-out. These never touch the backend.

use kaushalya_client::{login, SessionStore};
use kaushalya_core::AppConfig;

/// Checks the credentials against the configured admin account and saves a
/// fresh session token.
///
/// # Errors
///
/// Returns an error if sign-in is disabled, the credentials do not match, or
/// the session file cannot be written.
pub(crate) fn run_login(
    config: &AppConfig,
    store: &SessionStore,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    let session = login(config.admin_credentials().as_ref(), email, password)?;
    store.save(&session)?;
    println!("signed in; session saved to {}", store.path().display());
    Ok(())
}

/// Deletes the saved session, if any.
///
/// # Errors
///
/// Returns an error if the session file exists but cannot be removed.
pub(crate) fn run_logout(store: &SessionStore) -> anyhow::Result<()> {
    if store.clear()? {
        println!("signed out");
    } else {
        println!("no active session");
    }
    Ok(())
}
