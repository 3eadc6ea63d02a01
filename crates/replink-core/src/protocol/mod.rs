//! Wire protocol between the host and the remote helper.
//!
//! # Architecture
//!
//! - **helper**: script source for the remote link table and value wrapper
//! - **command**: builders for the exact command text sent per operation
//! - **literal**: argument transformer (host values to script expressions)
//! - **decode**: result decoder (responses to wrapped results or errors)

pub mod command;
pub mod decode;
pub mod helper;
pub mod literal;

pub use command::Commands;
pub use decode::Wrapped;
