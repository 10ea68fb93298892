pub mod context;
pub mod diff;
pub mod error;
pub mod fs;
pub mod path;
pub mod prompt;
pub mod response;
pub mod scanner;
pub mod session;

// Re-export common error type
pub use context::SessionContext;
pub use error::{QuillError, Result};
