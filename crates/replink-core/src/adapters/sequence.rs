//! Sequence view.

use super::RemoteSequence;
use crate::error::{BridgeError, Result};
use crate::proxy::Proxy;
use crate::value::{Arg, Value};

/// A proxy seen as an array-like sequence.
///
/// Every operation is at least one round trip; `push` and `pop` go through the
/// remote object's own methods rather than index arithmetic.
#[derive(Debug, Clone, Copy)]
pub struct SequenceView<'a> {
    proxy: &'a Proxy,
}

impl<'a> SequenceView<'a> {
    pub fn new(proxy: &'a Proxy) -> Self {
        Self { proxy }
    }

    pub fn proxy(&self) -> &'a Proxy {
        self.proxy
    }

    /// Append every item, one round trip each.
    pub fn extend<I>(&self, items: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: Into<Arg>,
    {
        for item in items {
            self.push(item.into())?;
        }
        Ok(())
    }

    /// Iterate by index. The length is read once, when iteration starts.
    pub fn iter(&self) -> Result<Elements<'a>> {
        Ok(Elements {
            view: *self,
            index: 0,
            len: self.len()?,
        })
    }

    /// Fetch every element.
    pub fn to_vec(&self) -> Result<Vec<Value>> {
        self.iter()?.collect()
    }
}

impl RemoteSequence for SequenceView<'_> {
    fn len(&self) -> Result<usize> {
        let length = self.proxy.get("length")?;
        length
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| {
                BridgeError::protocol(format!(
                    "length of handle {} is a {}, not a non-negative integer",
                    self.proxy.handle(),
                    length.kind()
                ))
            })
    }

    fn get(&self, index: usize) -> Result<Value> {
        self.proxy.get(&index.to_string())
    }

    fn set(&self, index: usize, value: Arg) -> Result<()> {
        self.proxy.set(&index.to_string(), value)
    }

    fn push(&self, value: Arg) -> Result<()> {
        self.proxy.invoke("push", &[value])?;
        Ok(())
    }

    fn pop(&self) -> Result<Value> {
        self.proxy.invoke("pop", &[])
    }
}

/// Index-driven iterator over a sequence view.
#[derive(Debug)]
pub struct Elements<'a> {
    view: SequenceView<'a>,
    index: usize,
    len: usize,
}

impl Iterator for Elements<'_> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.len {
            return None;
        }
        let item = self.view.get(self.index);
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.len.saturating_sub(self.index);
        (left, Some(left))
    }
}
