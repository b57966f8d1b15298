pub mod auth;
pub mod client;
pub mod db;
pub mod friend;
pub mod store;
pub mod types;
pub mod user;

pub use auth::{AuthProvider, StaticSession};
pub use client::{ClientConfig, StoreConfig, ThriveClient};
