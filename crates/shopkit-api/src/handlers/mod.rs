//! Route handlers organized by domain.

pub mod admin;
pub mod auth;
pub mod docs;
pub mod health;
pub mod manage;
pub mod orders;
pub mod products;
pub mod restricted;
