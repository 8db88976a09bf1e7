pub mod cart;
pub mod error;
pub mod health;
pub mod json;

pub use error::AppError;
