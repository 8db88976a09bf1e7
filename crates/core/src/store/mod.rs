mod error;
mod http_mapping;
mod serialization;
mod traits;

pub use error::{RepositoryError, Result, StoreError};
pub use http_mapping::repository_error_to_status_code;
pub use serialization::{deserialize_cart, serialize_cart, SerializationError};
pub use traits::KeyValueStore;
