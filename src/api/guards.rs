//! Request gates: token authentication, then role checks
//!
//! `require_auth` must wrap any router that uses `require_author`,
//! `require_reader` or the `AuthenticatedUser` extractor.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::{
    error::{AppError, AppResult},
    models::{Identity, Role},
    services::tokens::TokenService,
    AppState,
};

/// Token from an `Authorization: Bearer <token>` header, if any
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Resolve the caller's identity from the request headers.
/// Only the token is checked; the account itself is not looked up.
pub fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> AppResult<Identity> {
    let token = bearer_token(headers)
        .ok_or_else(|| AppError::Authentication("Access denied, no token provided".to_string()))?;

    let claims = tokens.verify(token).map_err(|e| {
        tracing::warn!("Rejected token: {}", e);
        AppError::Authentication("Not allowed: invalid or expired token".to_string())
    })?;

    Ok(Identity::from(claims))
}

/// Auth gate: attach the verified identity to the request or reject with 401
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> AppResult<Response> {
    let identity = authenticate(request.headers(), &state.services.tokens)?;
    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

async fn require_role(required: Role, request: Request, next: Next) -> AppResult<Response> {
    request
        .extensions()
        .get::<Identity>()
        .ok_or_else(|| AppError::Authentication("Access denied, no token provided".to_string()))?
        .require_role(required)?;

    Ok(next.run(request).await)
}

/// Role gate for author-only routes
pub async fn require_author(request: Request, next: Next) -> AppResult<Response> {
    require_role(Role::Author, request, next).await
}

/// Role gate for reader-only routes
pub async fn require_reader(request: Request, next: Next) -> AppResult<Response> {
    require_role(Role::Reader, request, next).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use axum::http::HeaderValue;
    use uuid::Uuid;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token(&headers("Bearer abc")), Some("abc"));
        assert_eq!(bearer_token(&headers("Basic abc")), None);
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn test_authenticate() {
        let tokens = TokenService::new(&AuthConfig::default());
        let identity = Identity {
            id: Uuid::new_v4(),
            role: Role::Reader,
            email: "reader@example.com".to_string(),
        };
        let token = tokens.issue(&identity).unwrap();

        let resolved = authenticate(&headers(&format!("Bearer {}", token)), &tokens).unwrap();
        assert_eq!(resolved, identity);

        assert!(matches!(
            authenticate(&HeaderMap::new(), &tokens),
            Err(AppError::Authentication(_))
        ));
        assert!(matches!(
            authenticate(&headers("Bearer forged"), &tokens),
            Err(AppError::Authentication(_))
        ));
    }
}
