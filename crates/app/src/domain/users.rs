//! Users

use crate::uuids::TypedUuid;

/// Customer that owns a cart. Identity is resolved by the authentication layer.
#[derive(Debug)]
pub struct User;

/// User UUID
pub type UserUuid = TypedUuid<User>;
