pub mod error;
pub mod types;
pub mod value;

pub use error::{FlexError, Result};
pub use types::{DataType, Field};
pub use value::Value;
