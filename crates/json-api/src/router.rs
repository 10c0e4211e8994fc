//! App Router

use salvo::Router;

use crate::{auth, carts};

/// Authenticated cart routes.
pub(crate) fn app_router() -> Router {
    Router::new().hoop(auth::middleware::handler).push(
        Router::with_path("cart")
            .get(carts::get::handler)
            .delete(carts::clear::handler)
            .push(
                Router::with_path("items")
                    .post(carts::items::create::handler)
                    .push(
                        Router::with_path("{product}")
                            .put(carts::items::update::handler)
                            .delete(carts::items::delete::handler),
                    ),
            ),
    )
}
