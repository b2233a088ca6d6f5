pub mod models;
pub mod services;
pub mod validation;
pub mod template;
pub mod errors;

pub use models::*;
pub use services::*;
pub use validation::*;
pub use template::*;
pub use errors::*;
