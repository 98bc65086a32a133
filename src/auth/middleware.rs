use crate::auth::jwt::TokenService;
use crate::types::{AppError, Identity};
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Reasons the gate turns a request away.
///
/// Token verification failures all collapse into `Unauthenticated`; the
/// underlying [`TokenError`](crate::auth::jwt::TokenError) is only logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error("Authorization header is required")]
    MissingHeader,

    #[error("Authorization header format must be Bearer {{token}}")]
    MalformedHeader,

    #[error("Invalid or expired token")]
    Unauthenticated,
}

impl From<GateError> for AppError {
    fn from(err: GateError) -> Self {
        AppError::Unauthenticated(err.to_string())
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` value.
///
/// The scheme is matched case-insensitively and must be followed by exactly
/// one space and one non-empty token segment.
pub fn bearer_token(value: &str) -> Result<&str, GateError> {
    let mut parts = value.split(' ');
    let (Some(scheme), Some(token), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(GateError::MalformedHeader);
    };

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(GateError::MalformedHeader);
    }

    Ok(token)
}

/// Runs the full gate over a request's headers.
pub fn authenticate(tokens: &TokenService, headers: &HeaderMap) -> Result<Identity, GateError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(GateError::MissingHeader)?
        .to_str()
        .map_err(|_| GateError::MalformedHeader)?;

    let token = bearer_token(value)?;

    tokens.verify(token).map_err(|reason| {
        tracing::debug!(%reason, "rejected bearer token");
        GateError::Unauthenticated
    })
}

/// Axum middleware guarding protected routes.
///
/// On success the caller's [`Identity`] is stored in the request extensions,
/// which clients cannot write to, and the inner service runs.
pub async fn auth_middleware(
    State(tokens): State<Arc<TokenService>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let identity = authenticate(&tokens, req.headers())?;

    req.extensions_mut().insert(identity);

    Ok(next.run(req).await)
}

/// Extractor for the authenticated caller.
///
/// Only succeeds behind [`auth_middleware`].
pub struct AuthUser(pub Identity);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| GateError::Unauthenticated.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::FixedClock;
    use axum::{body::Body, http::HeaderValue, http::StatusCode, routing::get, Router};
    use chrono::{Duration, Utc};
    use rstest::rstest;
    use tower::ServiceExt;

    fn create_test_service() -> (Arc<TokenService>, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let service = TokenService::new("gate-test-secret", Duration::hours(1))
            .expect("valid config")
            .with_clock(clock.clone());
        (Arc::new(service), clock)
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(value).expect("header value"),
        );
        headers
    }

    #[rstest]
    #[case("Bearer abc.def.ghi", "abc.def.ghi")]
    #[case("bearer abc", "abc")]
    #[case("BEARER abc", "abc")]
    #[case("BeArEr abc", "abc")]
    fn test_bearer_token_accepts(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(bearer_token(value), Ok(expected));
    }

    #[rstest]
    #[case("")]
    #[case("Bearer")]
    #[case("Bearer ")]
    #[case("Bearer  abc")]
    #[case("Bearer abc def")]
    #[case("Basic abc")]
    #[case("Token abc")]
    #[case("Bearerabc")]
    #[case("abc")]
    fn test_bearer_token_rejects(#[case] value: &str) {
        assert_eq!(bearer_token(value), Err(GateError::MalformedHeader));
    }

    #[test]
    fn test_missing_header() {
        let (tokens, _) = create_test_service();
        assert_eq!(
            authenticate(&tokens, &HeaderMap::new()),
            Err(GateError::MissingHeader)
        );
    }

    #[test]
    fn test_valid_token_yields_identity() {
        let (tokens, _) = create_test_service();
        let token = tokens.issue("42", "answer").expect("issue");

        let identity =
            authenticate(&tokens, &headers_with(&format!("Bearer {}", token))).expect("identity");

        assert_eq!(identity.subject_id, "42");
        assert_eq!(identity.display_name, "answer");
    }

    #[test]
    fn test_verification_failures_collapse() {
        let (tokens, clock) = create_test_service();
        let token = tokens.issue("42", "answer").expect("issue");

        let garbage = authenticate(&tokens, &headers_with("Bearer not-a-token"));
        assert_eq!(garbage, Err(GateError::Unauthenticated));

        let mut tampered = token.clone();
        tampered.push('x');
        let tampered = authenticate(&tokens, &headers_with(&format!("Bearer {}", tampered)));
        assert_eq!(tampered, Err(GateError::Unauthenticated));

        clock.advance(Duration::hours(2));
        let expired = authenticate(&tokens, &headers_with(&format!("Bearer {}", token)));
        assert_eq!(expired, Err(GateError::Unauthenticated));
    }

    #[tokio::test]
    async fn test_middleware_rejects_before_handler() {
        let (tokens, _) = create_test_service();
        let app = Router::new()
            .route(
                "/protected",
                get(|AuthUser(identity): AuthUser| async move { identity.subject_id }),
            )
            .layer(axum::middleware::from_fn_with_state(
                tokens.clone(),
                auth_middleware,
            ));

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/protected")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let token = tokens.issue("subject-1", "name").expect("issue");
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/protected")
                    .header(header::AUTHORIZATION, format!("Bearer {}", token))
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_extractor_without_middleware_rejects() {
        let app = Router::new().route(
            "/unguarded",
            get(|AuthUser(identity): AuthUser| async move { identity.subject_id }),
        );

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/unguarded")
                    .header("x-user-id", "42")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
