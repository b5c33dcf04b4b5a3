pub mod analysis;
pub mod document;
pub mod error;
pub mod health;
pub mod openapi;
