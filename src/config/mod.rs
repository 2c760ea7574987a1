pub mod types;
pub mod settings;
pub mod loader;
pub mod validator;
pub mod resolved;

pub use types::*;
pub use settings::*;
pub use loader::*;
pub use validator::*;
pub use resolved::*;
