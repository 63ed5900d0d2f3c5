//! Bearer-token middleware and the request extractors built on it.

use axum::{
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
    Json,
};
use tracing::debug;

use super::error::AppError;
use super::state::AppState;
use crate::models::PlayerId;

/// The authenticated player of the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub player_id: PlayerId,
}

/// Verify the `Authorization: Bearer <token>` header and attach the
/// resulting [`Identity`] to the request. Any failure answers 401.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers()).ok_or(AppError::Unauthorized)?;
    let claims = state.keys.verify(token).map_err(|e| {
        debug!(error = %e, "rejected bearer token");
        AppError::Unauthorized
    })?;

    req.extensions_mut().insert(Identity {
        player_id: claims.player(),
    });
    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .copied()
            .ok_or(AppError::Unauthorized)
    }
}

/// `Json<T>` whose rejections answer 400 with the error body.
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(AppError::BadRequest(rejection.body_text())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&headers("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers("Bearer ")), None);
        assert_eq!(bearer_token(&headers("bearer abc")), None);
        assert_eq!(bearer_token(&headers("Token abc")), None);
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }
}
