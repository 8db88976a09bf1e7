mod error;
mod requests;
mod types;

pub use error::CartError;
pub use requests::AddItemRequest;
pub use types::{Cart, CartItem, Customer};
