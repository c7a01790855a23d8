//! Account use-cases: mirroring identity claims and reading the session user.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    AccountCommand, AccountQuery, IdentityProvider, IdentityProviderError, Storage,
};
use crate::domain::{Error, User, UserId};

const LOGIN_REQUIRED: &str = "login required";

fn map_identity_error(error: IdentityProviderError) -> Error {
    match error {
        IdentityProviderError::Unavailable { message } => {
            Error::service_unavailable(format!("identity provider unavailable: {message}"))
        }
        IdentityProviderError::Rejected { message } => Error::unauthorized(message),
    }
}

/// Account service joining the identity provider with storage.
#[derive(Clone)]
pub struct AccountService<S: ?Sized, I: ?Sized> {
    storage: Arc<S>,
    identity: Arc<I>,
}

impl<S: ?Sized, I: ?Sized> AccountService<S, I> {
    /// Create a service over `storage` that resolves callers through `identity`.
    pub const fn new(storage: Arc<S>, identity: Arc<I>) -> Self {
        Self { storage, identity }
    }
}

#[async_trait]
impl<S, I> AccountCommand for AccountService<S, I>
where
    S: Storage + ?Sized,
    I: IdentityProvider + ?Sized,
{
    async fn sign_in(&self) -> Result<User, Error> {
        let claims = self.identity.resolve().await.map_err(map_identity_error)?;
        let user = self.storage.upsert_user(&claims).await?;
        info!(user_id = %user.id, "user signed in");
        Ok(user)
    }
}

#[async_trait]
impl<S, I> AccountQuery for AccountService<S, I>
where
    S: Storage + ?Sized,
    I: IdentityProvider + ?Sized,
{
    async fn current_user(&self, user_id: &UserId) -> Result<User, Error> {
        match self.storage.get_user(user_id).await? {
            Some(user) => Ok(user),
            None => {
                warn!(user_id = %user_id, "session refers to a missing user");
                Err(Error::unauthorized(LOGIN_REQUIRED))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{FixtureIdentityProvider, MockStorage};
    use crate::domain::{ErrorCode, UpsertUser};
    use chrono::Utc;

    fn stored(claims: &UpsertUser) -> User {
        User {
            id: claims.id.clone(),
            email: claims.email.clone(),
            first_name: claims.first_name.clone(),
            last_name: claims.last_name.clone(),
            profile_image_url: claims.profile_image_url.clone(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn sign_in_upserts_resolved_claims() {
        let mut storage = MockStorage::new();
        storage
            .expect_upsert_user()
            .withf(|claims| claims.id.as_ref() == FixtureIdentityProvider::SUBJECT)
            .times(1)
            .returning(|claims| Ok(stored(claims)));

        let service = AccountService::new(
            Arc::new(storage),
            Arc::new(FixtureIdentityProvider::default()),
        );
        let user = service.sign_in().await.expect("sign in succeeds");
        assert_eq!(user.email.as_deref(), Some("rider@example.com"));
    }

    #[tokio::test]
    async fn missing_session_user_is_unauthorised() {
        let mut storage = MockStorage::new();
        storage.expect_get_user().return_once(|_| Ok(None));

        let service = AccountService::new(
            Arc::new(storage),
            Arc::new(FixtureIdentityProvider::default()),
        );
        let error = service
            .current_user(&UserId::new("ghost").expect("valid id"))
            .await
            .expect_err("missing user");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[test]
    fn rejected_identities_map_to_unauthorised() {
        let error = map_identity_error(IdentityProviderError::rejected("expired"));
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }
}
