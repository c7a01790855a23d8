//! Authentication handlers.
//!
//! ```text
//! GET /api/login
//! GET /api/logout
//! GET /api/auth/user
//! ```
//!
//! Login and logout are opaque redirects: the identity provider decides who
//! the caller is, and the browser lands back on `/` either way.

use actix_web::http::header;
use actix_web::{HttpResponse, get, web};

use crate::domain::User;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, UserSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

fn redirect_home() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .finish()
}

/// Sign in through the identity provider and start a session.
#[utoipa::path(
    get,
    path = "/api/login",
    responses(
        (status = 302, description = "Signed in; redirects to /", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 401, description = "Identity rejected", body = ErrorSchema),
        (status = 503, description = "Identity provider or storage unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[get("/login")]
pub async fn login(state: web::Data<HttpState>, session: SessionContext) -> ApiResult<HttpResponse> {
    let user = state.accounts.sign_in().await?;
    session.persist_user(&user.id)?;
    Ok(redirect_home())
}

/// End the session.
#[utoipa::path(
    get,
    path = "/api/logout",
    responses((status = 302, description = "Signed out; redirects to /")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[get("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    redirect_home()
}

/// The signed-in user's profile.
#[utoipa::path(
    get,
    path = "/api/auth/user",
    responses(
        (status = 200, description = "Current user", body = UserSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/auth/user")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<User>> {
    let user_id = session.require_user_id()?;
    let user = state.account_query.current_user(&user_id).await?;
    Ok(web::Json(user))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use serde_json::Value;

    use super::*;
    use crate::domain::ports::{FixtureIdentityProvider, Storage};
    use crate::inbound::http::test_utils::{memory_state, session_cookie, test_session_middleware};

    #[actix_web::test]
    async fn login_persists_the_user_and_redirects_home() {
        let (state, storage) = memory_state();
        let app = actix_test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .app_data(web::Data::new(state))
                .service(web::scope("/api").service(login).service(current_user)),
        )
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/login").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FOUND);
        assert_eq!(
            res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/")
        );
        let cookie = session_cookie(&res).expect("session cookie");

        let me = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/auth/user")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(me.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(me).await;
        assert_eq!(
            body.get("id").and_then(Value::as_str),
            Some(FixtureIdentityProvider::SUBJECT)
        );
        assert_eq!(
            body.get("firstName").and_then(Value::as_str),
            Some("Valentino")
        );

        let subject = crate::domain::UserId::new(FixtureIdentityProvider::SUBJECT).expect("id");
        assert!(storage.get_user(&subject).await.expect("read").is_some());
    }

    #[actix_web::test]
    async fn current_user_requires_a_session() {
        let (state, _) = memory_state();
        let app = actix_test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .app_data(web::Data::new(state))
                .service(web::scope("/api").service(current_user)),
        )
        .await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/auth/user").to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body.get("code").and_then(Value::as_str), Some("unauthorized"));
    }

    #[actix_web::test]
    async fn logout_clears_the_session() {
        let (state, _) = memory_state();
        let app = actix_test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .app_data(web::Data::new(state))
                .service(
                    web::scope("/api")
                        .service(login)
                        .service(logout)
                        .service(current_user),
                ),
        )
        .await;

        let signed_in = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/api/login").to_request(),
        )
        .await;
        let cookie = session_cookie(&signed_in).expect("session cookie");

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/api/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FOUND);
        let cleared = session_cookie(&res).expect("removal cookie");
        assert_eq!(cleared.value(), "");
    }
}
