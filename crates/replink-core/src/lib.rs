//! Replink Core - remote object proxies over a script command channel.
//!
//! This crate lets a host manipulate objects living inside a remote scripting
//! runtime (a JavaScript REPL such as MozRepl) as if they were local values.
//! Commands are short script strings sent over a synchronous
//! [`CommandChannel`]; remote objects are tracked through integer handles in a
//! link table that a small helper keeps on the remote side.
//!
//! The transport itself is not part of this crate. Anything that can run a
//! piece of script and return the printed response implements
//! [`CommandChannel`].
//!
//! # Example
//!
//! ```rust,ignore
//! use replink_core::{Arg, Session};
//!
//! fn main() -> replink_core::Result<()> {
//!     let session = Session::open(my_channel)?;
//!
//!     let document = session.evaluate("window.document")?.into_object().unwrap();
//!     let title = document.get("title")?;
//!     println!("title: {:?}", title.as_str());
//!
//!     for link in document.xpath("//a", None)? {
//!         println!("{:?}", link.get("href")?.as_str());
//!     }
//!
//!     let body = document.dive(&["body", "firstChild"])?;
//!     document.invoke("createElement", &[Arg::from("div")])?;
//!
//!     session.close();
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod channel;
pub mod config;
pub mod error;
pub mod protocol;
pub mod proxy;
pub mod session;
pub mod value;

// Re-export commonly used types
pub use adapters::{
    Elements, Keys, MappingView, RemoteCallable, RemoteMapping, RemoteSequence, SequenceView,
};
pub use channel::{from_fn, ChannelError, CommandChannel, FnChannel};
pub use config::{ProtocolConfig, SessionConfig};
pub use error::{BridgeError, Result};
pub use proxy::Proxy;
pub use session::Session;
pub use value::{Arg, Handle, Value};
