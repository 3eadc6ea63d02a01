//! Remote-side helper.
//!
//! The link table and value wrapper live inside the remote runtime. This
//! module holds their script source; `Session::open` ships it once per
//! session. Installing twice keeps the existing table, so a second host
//! attaching to the same runtime does not invalidate live handles.

use crate::config::ProtocolConfig;

const HELPER_TEMPLATE: &str = r#"(function (root) {
  var existing = root.__NS__;
  if (existing && existing.version === __VERSION__) { return "already-installed"; }
  var links = {};
  var nextId = 1;
  var hasOwn = Object.prototype.hasOwnProperty;
  var bridge = {
    version: __VERSION__,
    link: function (value) {
      if (value === undefined) { return undefined; }
      var id = nextId++;
      links[id] = value;
      return id;
    },
    getLink: function (id) {
      return hasOwn.call(links, id) ? links[id] : undefined;
    },
    breakLink: function (id) {
      delete links[id];
    },
    isPrimitive: function (value) {
      var t = typeof value;
      return t === "string" || t === "number" || t === "boolean" ||
        value instanceof String || value instanceof Number || value instanceof Boolean;
    },
    wrapResult: function (value) {
      if (value === undefined || value === null) { return { result: null, type: null }; }
      if (bridge.isPrimitive(value)) { return { result: value.valueOf(), type: null }; }
      return { result: bridge.link(value), type: typeof value };
    },
    getAttr: function (id, name) {
      return bridge.wrapResult(bridge.getLink(id)[name]);
    },
    dive: function (id, path) {
      var current = bridge.getLink(id);
      var reached = null;
      for (var i = 0; i < path.length; i++) {
        if (current === undefined || current === null || !current[path[i]]) {
          return { missing: String(path[i]), reached: reached };
        }
        current = current[path[i]];
        reached = String(path[i]);
      }
      return bridge.wrapResult(current);
    },
    callThis: function (id, args) {
      var fn = bridge.getLink(id);
      return bridge.wrapResult(fn.apply(fn, args));
    },
    callMethod: function (id, name, args) {
      var obj = bridge.getLink(id);
      return bridge.wrapResult(obj[name].apply(obj, args));
    }
  };
  root.__NS__ = bridge;
  return "installed";
})(this);"#;

/// Script that installs the helper under `namespace`.
pub fn install_script(namespace: &str) -> String {
    HELPER_TEMPLATE
        .replace("__NS__", namespace)
        .replace("__VERSION__", &ProtocolConfig::HELPER_VERSION.to_string())
}
