//! Driving port for reading the signed-in user.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Account reads.
#[async_trait]
pub trait AccountQuery: Send + Sync {
    /// The stored profile for a session's user.
    ///
    /// A session whose user no longer exists is reported as `Unauthorized`.
    async fn current_user(&self, user_id: &UserId) -> Result<User, Error>;
}
