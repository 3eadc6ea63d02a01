//! Bridge session.
//!
//! A [`Session`] owns the command channel and the host-side registry of live
//! proxies. There is no implicit global session: callers open one explicitly
//! and either close it or let it drop, which releases every proxy still alive
//! on a best-effort basis.
//!
//! # Thread Safety
//!
//! Proxies share the session through an `Arc`. The registry is guarded by a
//! `std::sync::Mutex`; ordering of requests on the channel is the channel's
//! own responsibility.

use crate::channel::CommandChannel;
use crate::config::SessionConfig;
use crate::error::{BridgeError, Result};
use crate::protocol::decode::{self, Wrapped};
use crate::protocol::{helper, literal, Commands};
use crate::proxy::{Proxy, ProxyInner};
use crate::value::{Handle, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tracing::{debug, trace, warn};

/// An open bridge to one remote runtime.
pub struct Session {
    shared: Arc<SessionShared>,
}

/// State shared between the session and every proxy it produced.
pub(crate) struct SessionShared {
    channel: Box<dyn CommandChannel>,
    config: SessionConfig,
    commands: Commands,
    live: Mutex<HashMap<Handle, Weak<ProxyInner>>>,
    closed: AtomicBool,
}

impl Session {
    /// Open a session with the default configuration.
    pub fn open(channel: impl CommandChannel + 'static) -> Result<Self> {
        Self::open_with(channel, SessionConfig::default())
    }

    /// Open a session, installing the remote helper unless disabled.
    pub fn open_with(channel: impl CommandChannel + 'static, config: SessionConfig) -> Result<Self> {
        config.validate()?;
        let commands = Commands::new(config.namespace.clone(), config.channel_expr.clone());
        let session = Self {
            shared: Arc::new(SessionShared {
                channel: Box::new(channel),
                config,
                commands,
                live: Mutex::new(HashMap::new()),
                closed: AtomicBool::new(false),
            }),
        };

        if session.shared.config.install_helper {
            session.install_helper()?;
        }

        debug!("Bridge session opened (namespace {})", session.shared.config.namespace);
        Ok(session)
    }

    /// Install the remote helper. Safe to repeat: an existing link table is kept.
    pub fn install_helper(&self) -> Result<()> {
        let script = helper::install_script(&self.shared.config.namespace);
        let response = self.shared.send(&script)?;
        debug!("Helper install: {}", response.trim());
        Ok(())
    }

    /// Evaluate a remote expression and unwrap its value.
    pub fn evaluate(&self, expr: &str) -> Result<Value> {
        self.shared.query(&self.shared.commands.evaluate(expr))
    }

    /// Run raw script text, checking only for remote errors.
    pub fn execute(&self, code: &str) -> Result<String> {
        self.shared.send(code)
    }

    /// Break a link directly by handle.
    ///
    /// Proxies do this themselves on release; this is for handles obtained
    /// some other way.
    pub fn break_link(&self, handle: Handle) -> Result<()> {
        self.shared.send(&self.shared.commands.break_link(handle))?;
        Ok(())
    }

    /// Handles of every proxy that has not been released yet, in ascending order.
    pub fn live_handles(&self) -> Vec<Handle> {
        let mut handles: Vec<Handle> = self.shared.lock_live().keys().copied().collect();
        handles.sort();
        handles
    }

    pub fn config(&self) -> &SessionConfig {
        &self.shared.config
    }

    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }

    /// Release every live proxy and close the session. Idempotent.
    ///
    /// Release failures are logged, never returned.
    pub fn close(&self) {
        if self.shared.is_closed() {
            return;
        }

        let pending: Vec<Weak<ProxyInner>> = self.shared.lock_live().drain().map(|(_, p)| p).collect();
        let mut swept = 0;
        for inner in pending.iter().filter_map(Weak::upgrade) {
            inner.release();
            swept += 1;
        }

        self.shared.closed.store(true, Ordering::SeqCst);
        debug!("Bridge session closed, {} proxies released during sweep", swept);
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("namespace", &self.shared.config.namespace)
            .field("closed", &self.shared.is_closed())
            .finish()
    }
}

impl SessionShared {
    pub(crate) fn commands(&self) -> &Commands {
        &self.commands
    }

    pub(crate) fn namespace(&self) -> &str {
        &self.config.namespace
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn lock_live(&self) -> MutexGuard<'_, HashMap<Handle, Weak<ProxyInner>>> {
        // A panic while holding the lock cannot leave the map half-updated.
        self.live.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Send one command and reject `!!!` responses.
    pub(crate) fn send(&self, code: &str) -> Result<String> {
        if self.is_closed() {
            return Err(BridgeError::SessionClosed);
        }
        trace!("-> {}", code);
        let response = self.channel.execute(code)?;
        trace!("<- {}", response.trim_end());
        decode::check_remote_error(&response)?;
        Ok(response)
    }

    /// Send a query and unwrap its wrapped result.
    pub(crate) fn query(self: &Arc<Self>, code: &str) -> Result<Value> {
        let response = self.send(code)?;
        Ok(self.unwrap_value(decode::decode_wrapped(&response)?))
    }

    /// Turn a wrapped result into a value, adopting any handle.
    pub(crate) fn unwrap_value(self: &Arc<Self>, wrapped: Wrapped) -> Value {
        match wrapped {
            Wrapped::Null => Value::Null,
            Wrapped::Bool(b) => Value::Bool(b),
            Wrapped::Number(n) => Value::Number(n),
            Wrapped::String(s) => Value::String(s),
            Wrapped::Handle { handle, type_name } => Value::Object(self.adopt(handle, type_name)),
        }
    }

    /// Create the proxy owning a freshly issued handle.
    pub(crate) fn adopt(self: &Arc<Self>, handle: Handle, type_name: String) -> Proxy {
        let proxy = Proxy::new(Arc::clone(self), handle, type_name);
        let previous = self.lock_live().insert(handle, proxy.downgrade());
        if previous.is_some() {
            warn!("Handle {} was issued twice; the remote link table was reset", handle);
        }
        proxy
    }

    /// Drop the registry entry for `handle` if it still belongs to `owner`.
    ///
    /// A reissued handle may have been adopted again since; that newer entry
    /// stays.
    pub(crate) fn forget(&self, handle: Handle, owner: &ProxyInner) {
        let mut live = self.lock_live();
        if live
            .get(&handle)
            .is_some_and(|entry| std::ptr::eq(entry.as_ptr(), owner))
        {
            live.remove(&handle);
        }
    }

    /// Run the release action (if any) and break the link. Never fails.
    pub(crate) fn release_remote(&self, handle: Handle, action: Option<&str>) {
        if self.is_closed() {
            trace!("Skipping release of handle {}: session closed", handle);
            return;
        }
        if let Some(action) = action {
            match self.send(&self.commands.release(handle, action)) {
                Ok(_) => {
                    trace!("Released handle {}", handle);
                    return;
                }
                Err(e) => warn!("Release action for handle {} failed (ignored): {}", handle, e),
            }
        }
        // A release script that failed to parse or to bind its arguments never
        // reached its `finally`, so the link is broken on its own.
        match self.send(&self.commands.break_link(handle)) {
            Ok(_) => trace!("Broke link for handle {}", handle),
            Err(e) => warn!("Breaking link for handle {} failed (ignored): {}", handle, e),
        }
    }

    /// Render one argument for this session's namespace.
    pub(crate) fn render(&self, arg: &crate::value::Arg) -> Result<String> {
        literal::render_arg(arg, self.namespace())
    }
}
