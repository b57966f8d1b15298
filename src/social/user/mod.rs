//! User directory
//!
//! Read access to the `users` collection. Registration happens elsewhere;
//! `upsert_user` exists for seeding and tooling.

pub mod dao;
pub mod models;

pub use dao::UserDao;
pub use models::User;
