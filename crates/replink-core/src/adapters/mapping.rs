//! Mapping view.

use super::RemoteMapping;
use crate::error::Result;
use crate::protocol::decode;
use crate::protocol::literal::render_name;
use crate::proxy::Proxy;
use crate::value::{Arg, Value};

/// A proxy seen as a mapping of its own enumerable properties.
///
/// Key iteration costs one round trip per pass; `contains_key` and `remove`
/// always go to the remote object instead of the snapshot.
#[derive(Debug, Clone, Copy)]
pub struct MappingView<'a> {
    proxy: &'a Proxy,
}

impl<'a> MappingView<'a> {
    pub fn new(proxy: &'a Proxy) -> Self {
        Self { proxy }
    }

    pub fn proxy(&self) -> &'a Proxy {
        self.proxy
    }

    /// Number of own enumerable properties.
    pub fn len(&self) -> Result<usize> {
        Ok(self.keys()?.remaining())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Values of own enumerable properties, in key order.
    ///
    /// One round trip for the key snapshot plus one per key.
    pub fn values(&self) -> Result<Vec<Value>> {
        self.keys()?.map(|key| self.proxy.get(&key)).collect()
    }

    /// Key/value pairs of own enumerable properties.
    pub fn entries(&self) -> Result<Vec<(String, Value)>> {
        self.keys()?
            .map(|key| {
                let value = self.proxy.get(&key)?;
                Ok((key, value))
            })
            .collect()
    }
}

impl RemoteMapping for MappingView<'_> {
    fn get(&self, key: &str) -> Result<Value> {
        self.proxy.get(key)
    }

    fn set(&self, key: &str, value: Arg) -> Result<()> {
        self.proxy.set(key, value)
    }

    fn contains_key(&self, key: &str) -> Result<bool> {
        let handle = self.proxy.checked_handle()?;
        let session = self.proxy.session();
        let response = session.send(&session.commands().has_own(handle, &render_name(key)?))?;
        decode::decode_bool(&response)
    }

    fn remove(&self, key: &str) -> Result<Value> {
        self.proxy.delete(key)
    }

    fn keys(&self) -> Result<Keys> {
        let handle = self.proxy.checked_handle()?;
        let session = self.proxy.session();
        let response = session.send(&session.commands().own_keys(handle))?;
        Ok(Keys::new(decode::decode_names(&response)?))
    }
}

/// Key names captured at the start of one iteration pass.
#[derive(Debug, Clone)]
pub struct Keys {
    snapshot: Vec<String>,
    cursor: usize,
}

impl Keys {
    fn new(snapshot: Vec<String>) -> Self {
        Self { snapshot, cursor: 0 }
    }

    /// Names not yet served.
    pub fn remaining(&self) -> usize {
        self.snapshot.len() - self.cursor
    }
}

impl Iterator for Keys {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        let key = self.snapshot.get(self.cursor)?.clone();
        self.cursor += 1;
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining(), Some(self.remaining()))
    }
}

impl ExactSizeIterator for Keys {}
