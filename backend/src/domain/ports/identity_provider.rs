//! Driven port for the external identity collaborator.
//!
//! The storefront treats login as an opaque redirect: the provider resolves
//! who is signing in and hands back claims, which the account service mirrors
//! into storage.

use async_trait::async_trait;

use crate::domain::{UpsertUser, UserId};

use super::define_port_error;

define_port_error! {
    /// Failures raised while resolving an identity.
    pub enum IdentityProviderError {
        /// The provider could not be reached.
        Unavailable { message: String } => "identity provider unavailable: {message}",
        /// The provider refused to authenticate the caller.
        Rejected { message: String } => "identity rejected: {message}",
    }
}

/// Resolves the caller's identity claims.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Authenticate the current caller and return their profile claims.
    async fn resolve(&self) -> Result<UpsertUser, IdentityProviderError>;
}

/// Development provider that always signs in the same rider.
#[derive(Debug, Clone, Default)]
pub struct FixtureIdentityProvider {
    claims: Option<UpsertUser>,
}

impl FixtureIdentityProvider {
    /// Subject of the built-in development identity.
    pub const SUBJECT: &'static str = "dev-rider";

    /// Provider returning the supplied claims.
    #[must_use]
    pub const fn with_claims(claims: UpsertUser) -> Self {
        Self {
            claims: Some(claims),
        }
    }

    fn dev_rider() -> Result<UpsertUser, IdentityProviderError> {
        let id = UserId::new(Self::SUBJECT)
            .map_err(|err| IdentityProviderError::rejected(err.to_string()))?;
        Ok(UpsertUser {
            email: Some("rider@example.com".to_owned()),
            first_name: Some("Valentino".to_owned()),
            last_name: Some("Rossi".to_owned()),
            ..UpsertUser::bare(id)
        })
    }
}

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn resolve(&self) -> Result<UpsertUser, IdentityProviderError> {
        match &self.claims {
            Some(claims) => Ok(claims.clone()),
            None => Self::dev_rider(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn default_fixture_resolves_dev_rider() {
        let claims = FixtureIdentityProvider::default()
            .resolve()
            .await
            .expect("fixture resolves");
        assert_eq!(claims.id.as_ref(), FixtureIdentityProvider::SUBJECT);
        assert_eq!(claims.email.as_deref(), Some("rider@example.com"));
    }

    #[tokio::test]
    async fn custom_claims_are_returned_verbatim() {
        let id = UserId::new("oidc|77").expect("valid id");
        let provider = FixtureIdentityProvider::with_claims(UpsertUser::bare(id.clone()));
        let claims = provider.resolve().await.expect("fixture resolves");
        assert_eq!(claims.id, id);
        assert!(claims.email.is_none());
    }
}
