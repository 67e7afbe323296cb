//! Typed request identity for authenticated routes.

use axum::extract::FromRequestParts;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

/// Identity of the authenticated caller, attached to request extensions by the
/// access-token middleware after cookie validation and user lookup.
///
/// Extraction returns 401 when the middleware did not run (unauthenticated
/// route) or did not insert the principal.
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal {
    pub id: Uuid,
    pub email: String,
    pub mfa_enabled: bool,
}

/// Session id carried by the validated access token, attached alongside
/// [`AuthenticatedPrincipal`]. Logout and session revocation key off this.
#[derive(Debug, Clone, Copy)]
pub struct CurrentSession(pub Uuid);

// axum-core 0.5 defines this as `fn -> impl Future + Send` (not `async fn`).
// With precise capturing in Rust 1.82+, `async fn` captures lifetimes
// differently and trips E0195, so extract synchronously and return a
// 'static async move block.
impl<S> FromRequestParts<S> for AuthenticatedPrincipal
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let principal = parts.extensions.get::<AuthenticatedPrincipal>().cloned();
        async move { principal.ok_or(StatusCode::UNAUTHORIZED) }
    }
}

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let session = parts.extensions.get::<CurrentSession>().copied();
        async move { session.ok_or(StatusCode::UNAUTHORIZED) }
    }
}
