//! The logged in user, as seen by route handlers.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};

use crate::{UserID, endpoints};

/// The user making the request.
///
/// Put in place by the auth middleware. Handlers on routes without the
/// middleware will redirect to the log in page instead of running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    /// The ID of the logged in user.
    pub user_id: UserID,
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<UserID>() {
            Some(&user_id) => Ok(Session { user_id }),
            None => {
                tracing::error!(
                    "No user ID for {}. Is the route missing the auth middleware?",
                    parts.uri.path()
                );
                Err(Redirect::to(endpoints::LOG_IN_VIEW).into_response())
            }
        }
    }
}
