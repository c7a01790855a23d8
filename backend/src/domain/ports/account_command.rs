//! Driving port for signing users in.

use async_trait::async_trait;

use crate::domain::{Error, User};

/// Account mutations triggered by the login flow.
#[async_trait]
pub trait AccountCommand: Send + Sync {
    /// Resolve the caller through the identity provider and mirror their
    /// claims into storage.
    async fn sign_in(&self) -> Result<User, Error>;
}
