//! Centralized configuration for the bridge.
//!
//! Protocol constants live on [`ProtocolConfig`]; per-session knobs live on
//! [`SessionConfig`].

use crate::error::{BridgeError, Result};

/// Wire-level constants shared by the host and the remote helper.
pub struct ProtocolConfig;

impl ProtocolConfig {
    /// Response lines starting with this marker carry a remote exception.
    pub const ERROR_MARKER: &'static str = "!!!";
    /// Global name the helper is installed under unless configured otherwise.
    pub const DEFAULT_NAMESPACE: &'static str = "__replink";
    /// Remote expression naming the REPL object handed to release actions.
    pub const DEFAULT_CHANNEL_EXPR: &'static str = "repl";
    /// Bumped whenever the helper's function set changes.
    pub const HELPER_VERSION: u32 = 1;
    /// `XPathResult.ORDERED_NODE_SNAPSHOT_TYPE`.
    pub const XPATH_ORDERED_SNAPSHOT: u32 = 7;
    /// Remote `typeof` name reported for callables.
    pub const CALLABLE_TYPE: &'static str = "function";
}

/// Configuration for one bridge session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Global identifier the remote helper lives under.
    pub namespace: String,
    /// Remote expression bound to `repl` inside release actions.
    pub channel_expr: String,
    /// Whether `Session::open` installs the helper.
    pub install_helper: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            namespace: ProtocolConfig::DEFAULT_NAMESPACE.to_string(),
            channel_expr: ProtocolConfig::DEFAULT_CHANNEL_EXPR.to_string(),
            install_helper: true,
        }
    }
}

impl SessionConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the helper namespace.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Set the remote expression exposed to release actions.
    pub fn with_channel_expr(mut self, expr: impl Into<String>) -> Self {
        self.channel_expr = expr.into();
        self
    }

    /// Skip helper installation, for runtimes where it is preloaded.
    pub fn with_install_helper(mut self, install: bool) -> Self {
        self.install_helper = install;
        self
    }

    /// Check that the namespace is usable as a bare script identifier.
    pub fn validate(&self) -> Result<()> {
        if !is_identifier(&self.namespace) {
            return Err(BridgeError::Config {
                message: format!("namespace '{}' is not a valid identifier", self.namespace),
            });
        }
        if self.channel_expr.trim().is_empty() {
            return Err(BridgeError::Config {
                message: "channel expression must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
