//! Storefront API client port and its reqwest adapter.
//!
//! The adapter owns transport details only: cookie persistence, request
//! bodies, status mapping and JSON decoding into domain types.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use crate::domain::ports::define_port_error;
use crate::domain::{
    CartItem, CartItemId, CartItemWithProduct, Error, ErrorCode, Product, ProductId, User,
};

define_port_error! {
    /// Failures surfaced to the storefront views.
    pub enum ClientError {
        /// The session is missing or expired.
        Unauthorized { message: String } => "401: {message}",
        /// The API answered with a non-success status.
        Api { status: u16, code: ErrorCode, message: String } => "{status}: {message}",
        /// The request never produced a response.
        Transport { message: String } => "transport error: {message}",
        /// The response body did not match the expected shape.
        Decode { message: String } => "invalid response payload: {message}",
    }
}

impl ClientError {
    /// Whether the caller should be sent to sign in.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }
}

/// REST operations the storefront views depend on.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// Start a session through the identity redirect.
    async fn login(&self) -> Result<(), ClientError>;

    /// End the current session.
    async fn logout(&self) -> Result<(), ClientError>;

    /// `GET /api/auth/user`.
    async fn current_user(&self) -> Result<User, ClientError>;

    /// `GET /api/products`, optionally narrowed to one category.
    async fn list_products(&self, category: Option<String>) -> Result<Vec<Product>, ClientError>;

    /// `GET /api/products/{id}`.
    async fn get_product(&self, id: ProductId) -> Result<Product, ClientError>;

    /// `GET /api/cart`.
    async fn list_cart(&self) -> Result<Vec<CartItemWithProduct>, ClientError>;

    /// `POST /api/cart`.
    async fn add_to_cart(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartItem, ClientError>;

    /// `PATCH /api/cart/{id}`.
    async fn update_quantity(
        &self,
        id: CartItemId,
        quantity: u32,
    ) -> Result<CartItem, ClientError>;

    /// `DELETE /api/cart/{id}`.
    async fn remove_from_cart(&self, id: CartItemId) -> Result<(), ClientError>;
}

/// [`StorefrontApi`] over HTTP with a private cookie jar.
///
/// Redirects are not followed so the session cookie set by `/api/login` is
/// captured without chasing the identity provider's landing page.
pub struct HttpStorefrontApi {
    client: Client,
    base: Url,
}

impl HttpStorefrontApi {
    /// Build a client rooted at `base` (for example `http://127.0.0.1:8080/`).
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .timeout(timeout)
            .build()?;
        Ok(Self { client, base })
    }

    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base
            .join(path)
            .map_err(|error| ClientError::transport(format!("invalid request path {path}: {error}")))
    }

    async fn send(request: RequestBuilder) -> Result<(StatusCode, Vec<u8>), ClientError> {
        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if status.is_success() || status.is_redirection() {
            Ok((status, body.to_vec()))
        } else {
            Err(map_status_error(status, body.as_ref()))
        }
    }

    async fn fetch<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ClientError> {
        let (_, body) = Self::send(request).await?;
        serde_json::from_slice(&body).map_err(|error| ClientError::decode(error.to_string()))
    }
}

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
    async fn login(&self) -> Result<(), ClientError> {
        let url = self.url("/api/login")?;
        let (status, _) = Self::send(self.client.get(url)).await?;
        debug!(status = status.as_u16(), "login redirect received");
        Ok(())
    }

    async fn logout(&self) -> Result<(), ClientError> {
        let url = self.url("/api/logout")?;
        Self::send(self.client.get(url)).await.map(|_| ())
    }

    async fn current_user(&self) -> Result<User, ClientError> {
        let url = self.url("/api/auth/user")?;
        Self::fetch(self.client.get(url)).await
    }

    async fn list_products(&self, category: Option<String>) -> Result<Vec<Product>, ClientError> {
        let url = self.url("/api/products")?;
        let mut request = self.client.get(url);
        if let Some(category) = category {
            request = request.query(&[("category", category)]);
        }
        Self::fetch(request).await
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, ClientError> {
        let url = self.url(&format!("/api/products/{id}"))?;
        Self::fetch(self.client.get(url)).await
    }

    async fn list_cart(&self) -> Result<Vec<CartItemWithProduct>, ClientError> {
        let url = self.url("/api/cart")?;
        Self::fetch(self.client.get(url)).await
    }

    async fn add_to_cart(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<CartItem, ClientError> {
        let url = self.url("/api/cart")?;
        let body = json!({ "productId": product_id, "quantity": quantity });
        Self::fetch(self.client.post(url).json(&body)).await
    }

    async fn update_quantity(
        &self,
        id: CartItemId,
        quantity: u32,
    ) -> Result<CartItem, ClientError> {
        let url = self.url(&format!("/api/cart/{id}"))?;
        let body = json!({ "quantity": quantity });
        Self::fetch(self.client.patch(url).json(&body)).await
    }

    async fn remove_from_cart(&self, id: CartItemId) -> Result<(), ClientError> {
        let url = self.url(&format!("/api/cart/{id}"))?;
        Self::send(self.client.delete(url)).await.map(|_| ())
    }
}

fn map_transport_error(error: reqwest::Error) -> ClientError {
    ClientError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> ClientError {
    let payload = serde_json::from_slice::<Error>(body).ok();
    let message = payload.as_ref().map_or_else(
        || {
            status
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_owned()
        },
        |error| error.message().to_owned(),
    );

    if status == StatusCode::UNAUTHORIZED {
        return ClientError::unauthorized(message);
    }
    let code = payload.map_or_else(|| fallback_code(status), |error| error.code());
    ClientError::api(status.as_u16(), code, message)
}

fn fallback_code(status: StatusCode) -> ErrorCode {
    match status {
        StatusCode::NOT_FOUND => ErrorCode::NotFound,
        StatusCode::SERVICE_UNAVAILABLE => ErrorCode::ServiceUnavailable,
        _ if status.is_client_error() => ErrorCode::InvalidRequest,
        _ => ErrorCode::InternalError,
    }
}

#[cfg(test)]
mod tests {
    //! Coverage for the non-network status mapping.

    use super::*;
    use rstest::rstest;

    #[test]
    fn unauthorized_status_maps_to_unauthorized() {
        let error = map_status_error(
            StatusCode::UNAUTHORIZED,
            br#"{"code":"unauthorized","message":"login required"}"#,
        );
        assert_eq!(error, ClientError::unauthorized("login required"));
        assert!(error.is_unauthorized());
        assert!(error.to_string().starts_with("401: "));
    }

    #[test]
    fn error_payloads_keep_their_code() {
        let error = map_status_error(
            StatusCode::BAD_REQUEST,
            br#"{"code":"insufficient_stock","message":"Insufficient stock"}"#,
        );
        assert_eq!(
            error,
            ClientError::api(400_u16, ErrorCode::InsufficientStock, "Insufficient stock")
        );
    }

    #[rstest]
    #[case::not_found(StatusCode::NOT_FOUND, ErrorCode::NotFound)]
    #[case::unavailable(StatusCode::SERVICE_UNAVAILABLE, ErrorCode::ServiceUnavailable)]
    #[case::bad_request(StatusCode::BAD_REQUEST, ErrorCode::InvalidRequest)]
    #[case::server_error(StatusCode::BAD_GATEWAY, ErrorCode::InternalError)]
    fn opaque_bodies_fall_back_to_the_status(
        #[case] status: StatusCode,
        #[case] expected: ErrorCode,
    ) {
        let error = map_status_error(status, b"<html>upstream</html>");
        assert!(
            matches!(error, ClientError::Api { code, .. } if code == expected),
            "unexpected mapping: {error:?}"
        );
    }

    #[test]
    fn paths_join_onto_the_base() {
        let base = Url::parse("http://127.0.0.1:8080/").expect("base url");
        let api = HttpStorefrontApi::new(base, Duration::from_secs(1)).expect("client");
        let url = api.url("/api/cart").expect("joined");
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/api/cart");
    }
}
