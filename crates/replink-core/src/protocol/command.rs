//! Remote command builders.
//!
//! Each method returns the exact script text sent over the channel. Queries
//! are wrapped in `JSON.stringify` so the runtime prints a literal the decoder
//! can parse; commands without a result are `void` expressions. Arguments
//! arrive already rendered by the literal module.

use crate::config::ProtocolConfig;
use crate::value::Handle;

/// Builds command text against one helper namespace.
#[derive(Debug, Clone)]
pub struct Commands {
    ns: String,
    channel_expr: String,
}

impl Commands {
    pub fn new(namespace: impl Into<String>, channel_expr: impl Into<String>) -> Self {
        Self {
            ns: namespace.into(),
            channel_expr: channel_expr.into(),
        }
    }

    fn link(&self, handle: Handle) -> String {
        super::literal::link_lookup(&self.ns, handle.get())
    }

    /// Evaluate an arbitrary expression and wrap its value.
    pub fn evaluate(&self, expr: &str) -> String {
        format!("JSON.stringify({}.wrapResult(({})))", self.ns, expr)
    }

    pub fn get_attr(&self, handle: Handle, name: &str) -> String {
        format!("JSON.stringify({}.getAttr({}, {}))", self.ns, handle, name)
    }

    pub fn set_attr(&self, handle: Handle, name: &str, value: &str) -> String {
        format!("void ({}[{}] = {})", self.link(handle), name, value)
    }

    pub fn call_method(&self, handle: Handle, name: &str, args: &str) -> String {
        format!(
            "JSON.stringify({}.callMethod({}, {}, {}))",
            self.ns, handle, name, args
        )
    }

    pub fn call_this(&self, handle: Handle, args: &str) -> String {
        format!("JSON.stringify({}.callThis({}, {}))", self.ns, handle, args)
    }

    pub fn dive(&self, handle: Handle, path: &str) -> String {
        format!("JSON.stringify({}.dive({}, {}))", self.ns, handle, path)
    }

    /// Every enumerable property name, inherited ones included.
    pub fn enumerate_keys(&self, handle: Handle) -> String {
        format!(
            "JSON.stringify((function (o) {{ var r = []; for (var k in o) {{ r.push(k); }} return r; }})({}))",
            self.link(handle)
        )
    }

    /// Every enumerable property value, inherited ones included.
    pub fn enumerate_values(&self, handle: Handle) -> String {
        format!(
            "JSON.stringify((function (o) {{ var r = []; for (var k in o) {{ r.push({}.wrapResult(o[k])); }} return r; }})({}))",
            self.ns,
            self.link(handle)
        )
    }

    /// Own enumerable property names only.
    pub fn own_keys(&self, handle: Handle) -> String {
        format!("JSON.stringify(Object.keys({}))", self.link(handle))
    }

    pub fn has_own(&self, handle: Handle, name: &str) -> String {
        format!(
            "JSON.stringify(Object.prototype.hasOwnProperty.call({}, {}))",
            self.link(handle),
            name
        )
    }

    pub fn has(&self, handle: Handle, name: &str) -> String {
        format!("JSON.stringify({} in {})", name, self.link(handle))
    }

    /// Delete a property, answering with its previous wrapped value.
    pub fn delete(&self, handle: Handle, name: &str) -> String {
        format!(
            "JSON.stringify((function (o, k) {{ var v = {}.wrapResult(o[k]); delete o[k]; return v; }})({}, {}))",
            self.ns,
            self.link(handle),
            name
        )
    }

    pub fn identity(&self, a: Handle, b: Handle) -> String {
        format!("JSON.stringify({} === {})", self.link(a), self.link(b))
    }

    /// Run an XPath query and link every match, in document order.
    pub fn xpath(&self, handle: Handle, query: &str, context: Handle) -> String {
        format!(
            "JSON.stringify((function (node, query, context) {{ var doc = node.ownerDocument || node; \
             var found = doc.evaluate(query, context, null, {}, null); var out = []; \
             for (var i = 0; i < found.snapshotLength; i++) {{ out.push({}.link(found.snapshotItem(i))); }} \
             return out; }})({}, {}, {}))",
            ProtocolConfig::XPATH_ORDERED_SNAPSHOT,
            self.ns,
            self.link(handle),
            query,
            self.link(context)
        )
    }

    pub fn click(&self, handle: Handle) -> String {
        format!(
            "void (function (el) {{ var doc = el.ownerDocument; var ev = doc.createEvent(\"MouseEvents\"); \
             ev.initMouseEvent(\"click\", true, true, doc.defaultView, 1, 0, 0, 0, 0, false, false, false, false, 0, null); \
             el.dispatchEvent(ev); }})({})",
            self.link(handle)
        )
    }

    pub fn break_link(&self, handle: Handle) -> String {
        format!("void {}.breakLink({})", self.ns, handle)
    }

    /// Run a release action, then break the link even if the action throws.
    ///
    /// The action sees `obj`, `handle` and `repl` in scope.
    pub fn release(&self, handle: Handle, action: &str) -> String {
        format!(
            "(function (obj, handle, repl) {{ try {{ {} }} finally {{ {}.breakLink(handle); }} }})({}, {}, {})",
            action,
            self.ns,
            self.link(handle),
            handle,
            self.channel_expr
        )
    }
}
