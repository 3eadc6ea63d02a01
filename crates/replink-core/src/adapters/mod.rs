//! Container capabilities over a proxy.
//!
//! A remote handle can act as a mapping, a sequence and a callable at the
//! same time. Each capability is a named trait implemented by a thin view
//! that turns container operations into proxy primitives (get, set,
//! enumerate, length). Nothing is cached beyond a single enumeration pass.

mod mapping;
mod sequence;

pub use mapping::{Keys, MappingView};
pub use sequence::{Elements, SequenceView};

use crate::error::Result;
use crate::proxy::Proxy;
use crate::value::{Arg, Value};

/// String-keyed access to a remote object's own properties.
pub trait RemoteMapping {
    fn get(&self, key: &str) -> Result<Value>;

    fn set(&self, key: &str, value: Arg) -> Result<()>;

    /// Own-property test, evaluated remotely.
    fn contains_key(&self, key: &str) -> Result<bool>;

    /// Delete `key`, returning the value it held.
    fn remove(&self, key: &str) -> Result<Value>;

    /// Snapshot own enumerable key names for one iteration pass.
    fn keys(&self) -> Result<Keys>;
}

/// Index-based access to a remote array-like object.
pub trait RemoteSequence {
    fn len(&self) -> Result<usize>;

    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    fn get(&self, index: usize) -> Result<Value>;

    fn set(&self, index: usize, value: Arg) -> Result<()>;

    /// Append through the remote object's own `push`.
    fn push(&self, value: Arg) -> Result<()>;

    /// Remove the last element through the remote object's own `pop`.
    fn pop(&self) -> Result<Value>;
}

/// Calling a remote function object.
pub trait RemoteCallable {
    fn call(&self, args: &[Arg]) -> Result<Value>;
}

impl RemoteCallable for Proxy {
    fn call(&self, args: &[Arg]) -> Result<Value> {
        Proxy::call(self, args)
    }
}
