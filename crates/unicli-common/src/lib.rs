pub mod errors;
pub mod id;

pub use errors::{ConfigError, UnicliError};
pub use id::{new_id, new_tool_call_id, SessionId};

pub type Result<T> = std::result::Result<T, UnicliError>;
