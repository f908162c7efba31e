use axum::{extract::Request, http::HeaderMap, middleware::Next, response::Response};
use backoffice_core::{Role, SessionContext};

use crate::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Reads the caller from the headers set by the fronting auth proxy.
/// A missing role means employee.
pub fn session_from_headers(headers: &HeaderMap) -> Option<SessionContext> {
    let user_id = headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())?;

    let role = headers
        .get(USER_ROLE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(Role::parse)
        .unwrap_or(Role::Employee);

    Some(SessionContext::new(user_id, role))
}

pub async fn session_middleware(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let session = session_from_headers(request.headers())
        .ok_or_else(|| ApiError::unauthorized("Missing user identity"))?;

    request.extensions_mut().insert::<SessionContext>(session);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn parses_identity_headers() {
        let mut headers = HeaderMap::new();
        assert!(session_from_headers(&headers).is_none());

        headers.insert(USER_ID_HEADER, HeaderValue::from_static("  "));
        assert!(session_from_headers(&headers).is_none());

        headers.insert(USER_ID_HEADER, HeaderValue::from_static("owner"));
        let session = session_from_headers(&headers).unwrap();
        assert_eq!(session.user_id(), "owner");
        assert_eq!(session.role(), Role::Employee);

        headers.insert(USER_ROLE_HEADER, HeaderValue::from_static("Admin"));
        assert!(session_from_headers(&headers).unwrap().is_admin());
    }
}
