//! Bearer token authentication

pub(crate) mod middleware;
