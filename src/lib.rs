//! Product catalog HTTP backend: CRUD over a single product resource plus
//! email/password registration and JWT bearer login, persisted in SQLite.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use auth::Keys;
use store::{ProductStore, UserStore};

/// Shared state handed to every handler. Stores are trait objects so
/// tests can run the router against an in-memory fake.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub products: Arc<dyn ProductStore>,
    pub keys: Keys,
    pub environment: String,
}
