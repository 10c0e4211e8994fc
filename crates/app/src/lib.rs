//! Cart domain, persistence and collaborators shared by the Trolley binaries.

pub mod auth;
pub mod context;
pub mod database;
pub mod domain;

#[cfg(test)]
mod test;

mod uuids;
