#![doc = "The `docforge` library crate."]
#![doc = ""]
#![doc = "Accounts and bearer-token authentication, AI text generation, DOCX/PPTX/PDF"]
#![doc = "export and saved projects. The binary (`main.rs`) builds a `Config`, opens the"]
#![doc = "pool and mounts `routes::config`."]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod generation;
pub mod models;
pub mod routes;

pub use crate::config::Config;
pub use crate::error::AppError;
