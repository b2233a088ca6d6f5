//! Application layer managing state and workflows.
//!
//! This module coordinates between the domain layer and presentation layer:
//! the resume store, the step wizard, sign-in, routing, the dashboard,
//! custom templates and PDF export.

pub mod store;
pub mod wizard;
pub mod session;
pub mod router;
pub mod dashboard;
pub mod templates;
pub mod export;
pub mod state;

pub use store::*;
pub use wizard::*;
pub use session::*;
pub use router::*;
pub use dashboard::*;
pub use templates::*;
pub use export::*;
pub use state::*;
