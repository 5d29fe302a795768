pub mod types;
pub mod catalog;
pub mod loader;
pub mod validator;

pub use types::*;
pub use catalog::*;
pub use loader::*;
pub use validator::*;
