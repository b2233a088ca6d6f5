//! tresume - Terminal Resume Builder Library
//!
//! A step-by-step resume wizard with live preview, templates and PDF
//! export, built in Rust.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;
pub mod config;

pub use domain::*;
pub use application::*;
pub use config::AppConfig;
