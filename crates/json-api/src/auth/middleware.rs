//! Auth middleware.
//!
//! Resolves the caller from an `Authorization: Bearer` header and stores the
//! user in the depot for downstream handlers.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use tracing::error;

use trolley_app::{auth::AuthServiceError, domain::users::UserUuid};

use crate::{extensions::*, state::State};

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    match authenticate(req, depot).await {
        Ok(user) => {
            depot.insert_user_uuid(user);
            ctrl.call_next(req, depot, res).await;
        }
        Err(status) => {
            res.render(status);
            ctrl.skip_rest();
        }
    }
}

async fn authenticate(req: &Request, depot: &Depot) -> Result<UserUuid, StatusError> {
    let token = extract_bearer_token(req).ok_or_else(|| {
        StatusError::unauthorized().brief("Missing or invalid Authorization header")
    })?;

    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .auth
        .authenticate_bearer(token)
        .await
        .map_err(|auth_error| match auth_error {
            AuthServiceError::NotFound => StatusError::unauthorized().brief("Invalid API token"),
            AuthServiceError::Sql(_) | AuthServiceError::Token(_) => {
                error!("bearer authentication failed: {auth_error}");

                StatusError::internal_server_error()
            }
        })
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
