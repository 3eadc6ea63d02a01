//! Remote proxy.
//!
//! A [`Proxy`] wraps one link-table handle. Clones share the handle; when the
//! last clone drops (or [`Proxy::release`] is called) the proxy moves to the
//! released state exactly once, runs its release action remotely and breaks
//! the link. Every operation on a released proxy fails with
//! [`BridgeError::InvalidHandle`].
//!
//! Method names are resolved remotely at call time through [`Proxy::invoke`];
//! there is no static method table.

use crate::adapters::{MappingView, SequenceView};
use crate::config::ProtocolConfig;
use crate::error::{BridgeError, Result};
use crate::protocol::decode;
use crate::protocol::literal::{encode_literal, render_args, render_name};
use crate::session::SessionShared;
use crate::value::{Arg, Handle, Value};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use tracing::trace;

/// Host-side handle to an object living in the remote runtime.
#[derive(Clone)]
pub struct Proxy {
    inner: Arc<ProxyInner>,
}

pub(crate) struct ProxyInner {
    session: Arc<SessionShared>,
    handle: Handle,
    type_name: String,
    release_action: Mutex<Option<String>>,
    released: AtomicBool,
}

impl ProxyInner {
    /// Move to the released state. Only the first call does any work.
    pub(crate) fn release(&self) {
        if self.released.swap(true, Ordering::SeqCst) {
            return;
        }
        self.session.forget(self.handle, self);
        let action = self
            .release_action
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        self.session.release_remote(self.handle, action.as_deref());
    }
}

impl Drop for ProxyInner {
    fn drop(&mut self) {
        self.release();
    }
}

impl Proxy {
    pub(crate) fn new(session: Arc<SessionShared>, handle: Handle, type_name: String) -> Self {
        Self {
            inner: Arc::new(ProxyInner {
                session,
                handle,
                type_name,
                release_action: Mutex::new(None),
                released: AtomicBool::new(false),
            }),
        }
    }

    pub(crate) fn downgrade(&self) -> Weak<ProxyInner> {
        Arc::downgrade(&self.inner)
    }

    pub(crate) fn session(&self) -> &Arc<SessionShared> {
        &self.inner.session
    }

    /// The link-table handle. Purely local, never forwarded remotely.
    pub fn handle(&self) -> Handle {
        self.inner.handle
    }

    /// Remote `typeof` of the referent, captured when the handle was issued.
    pub fn type_name(&self) -> &str {
        &self.inner.type_name
    }

    pub fn is_callable(&self) -> bool {
        self.inner.type_name == ProtocolConfig::CALLABLE_TYPE
    }

    pub fn is_released(&self) -> bool {
        self.inner.released.load(Ordering::SeqCst)
    }

    /// The handle, or `InvalidHandle` once released.
    pub(crate) fn checked_handle(&self) -> Result<Handle> {
        if self.is_released() {
            return Err(BridgeError::InvalidHandle(self.inner.handle));
        }
        Ok(self.inner.handle)
    }

    /// Attach remote code to run just before the link is broken.
    ///
    /// The code runs with `obj` (the referent), `handle` and `repl` (the
    /// session's channel expression) in scope. Replaces any earlier action.
    pub fn set_release_action(&self, code: impl Into<String>) {
        *self
            .inner
            .release_action
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(code.into());
    }

    /// Builder form of [`Proxy::set_release_action`].
    pub fn with_release_action(self, code: impl Into<String>) -> Self {
        self.set_release_action(code);
        self
    }

    /// Read a property.
    pub fn get(&self, name: &str) -> Result<Value> {
        let handle = self.checked_handle()?;
        let session = self.session();
        session.query(&session.commands().get_attr(handle, &render_name(name)?))
    }

    /// Assign a property. Proxies are assigned by reference.
    pub fn set(&self, name: &str, value: impl Into<Arg>) -> Result<()> {
        let handle = self.checked_handle()?;
        let session = self.session();
        let value = session.render(&value.into())?;
        session.send(&session.commands().set_attr(handle, &render_name(name)?, &value))?;
        Ok(())
    }

    /// Call a method by name with this object as receiver.
    pub fn invoke(&self, method: &str, args: &[Arg]) -> Result<Value> {
        let handle = self.checked_handle()?;
        let session = self.session();
        let method = session.render(&Arg::from(method))?;
        let args = render_args(args, session.namespace())?;
        trace!("invoke {} on handle {}", method, handle);
        session.query(&session.commands().call_method(handle, &method, &args))
    }

    /// Call the referent itself, with itself as receiver.
    pub fn call(&self, args: &[Arg]) -> Result<Value> {
        let handle = self.checked_handle()?;
        let session = self.session();
        let args = render_args(args, session.namespace())?;
        session.query(&session.commands().call_this(handle, &args))
    }

    /// Descend a property path in one round trip.
    ///
    /// A segment counts as present only when its value is truthy, so existing
    /// properties holding `0`, `""`, `false` or `null` are reported missing.
    pub fn dive<S: AsRef<str>>(&self, path: &[S]) -> Result<Value> {
        let handle = self.checked_handle()?;
        let session = self.session();
        let segments = path
            .iter()
            .map(|segment| render_name(segment.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        let code = session
            .commands()
            .dive(handle, &format!("[{}]", segments.join(", ")));
        let response = session.send(&code)?;
        Ok(session.unwrap_value(decode::decode_dive(&response)?))
    }

    /// Names of all enumerable properties, inherited ones included.
    pub fn keys(&self) -> Result<Vec<String>> {
        let handle = self.checked_handle()?;
        let session = self.session();
        let response = session.send(&session.commands().enumerate_keys(handle))?;
        decode::decode_names(&response)
    }

    /// Values of all enumerable properties, inherited ones included.
    pub fn values(&self) -> Result<Vec<Value>> {
        let handle = self.checked_handle()?;
        let session = self.session();
        let response = session.send(&session.commands().enumerate_values(handle))?;
        let wrapped = decode::decode_wrapped_list(&response)?;
        Ok(wrapped.into_iter().map(|w| session.unwrap_value(w)).collect())
    }

    /// Whether `name` resolves on the referent, through the prototype chain.
    pub fn has(&self, name: &str) -> Result<bool> {
        let handle = self.checked_handle()?;
        let session = self.session();
        let response = session.send(&session.commands().has(handle, &render_name(name)?))?;
        decode::decode_bool(&response)
    }

    /// Delete a property and return the value it held.
    pub fn delete(&self, name: &str) -> Result<Value> {
        let handle = self.checked_handle()?;
        let session = self.session();
        session.query(&session.commands().delete(handle, &render_name(name)?))
    }

    /// Evaluate an XPath query against this document (or this node's owner
    /// document), relative to `context` or to this object.
    pub fn xpath(&self, query: &str, context: Option<&Proxy>) -> Result<Vec<Proxy>> {
        let handle = self.checked_handle()?;
        let context = match context {
            Some(node) => node.checked_handle()?,
            None => handle,
        };
        let session = self.session();
        let query = encode_literal(&serde_json::Value::String(query.to_string()))?;
        let response = session.send(&session.commands().xpath(handle, &query, context))?;
        let handles = decode::decode_handles(&response)?;
        Ok(handles
            .into_iter()
            .map(|h| session.adopt(h, "object".to_string()))
            .collect())
    }

    /// Dispatch a synthetic mouse click at this element.
    pub fn click(&self) -> Result<()> {
        let handle = self.checked_handle()?;
        let session = self.session();
        session.send(&session.commands().click(handle))?;
        Ok(())
    }

    /// Remote strict equality between referents.
    ///
    /// Anything that is not a live proxy of the same session compares unequal
    /// without a round trip.
    pub fn identity(&self, other: &Value) -> Result<bool> {
        match other {
            Value::Object(proxy) => self.same_as(proxy),
            _ => Ok(false),
        }
    }

    /// Remote strict equality against another proxy.
    pub fn same_as(&self, other: &Proxy) -> Result<bool> {
        let handle = self.checked_handle()?;
        let Ok(other_handle) = other.checked_handle() else {
            return Ok(false);
        };
        if !Arc::ptr_eq(self.session(), other.session()) {
            return Ok(false);
        }
        let session = self.session();
        let response = session.send(&session.commands().identity(handle, other_handle))?;
        decode::decode_bool(&response)
    }

    /// Release now instead of waiting for the last clone to drop.
    pub fn release(&self) {
        self.inner.release();
    }

    /// View this object as a string-keyed mapping.
    pub fn as_mapping(&self) -> MappingView<'_> {
        MappingView::new(self)
    }

    /// View this object as an indexable sequence.
    pub fn as_sequence(&self) -> SequenceView<'_> {
        SequenceView::new(self)
    }
}

impl fmt::Debug for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("handle", &self.inner.handle)
            .field("type_name", &self.inner.type_name)
            .field("released", &self.is_released())
            .finish()
    }
}
