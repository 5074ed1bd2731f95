pub mod types;
pub mod validator;
pub mod resolved;

pub use types::*;
pub use validator::*;
pub use resolved::*;
