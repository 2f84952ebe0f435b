pub mod error;
pub mod options;
pub mod quote;
pub mod traits;
pub mod types;

pub use error::*;
pub use options::*;
pub use quote::*;
pub use traits::*;
pub use types::*;
