//! Infrastructure layer providing external service integrations.
//!
//! This module contains implementations for external concerns like
//! durable storage, identity services, file import/export and PDF output.

pub mod storage;
pub mod persistence;
pub mod identity;
pub mod pdf;

pub use storage::*;
pub use persistence::*;
pub use identity::*;
pub use pdf::*;
