mod environment;
mod error;

pub use environment::{Environment, DEFAULT_SECRET_ID};
pub use error::AppError;
