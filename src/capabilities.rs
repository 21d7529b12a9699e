//! Capability objects exposed to documents.
//!
//! A document's global scope does not survive navigation, so capabilities
//! are described by a registry of (name, gate, kind) entries and re-installed
//! at every navigation-start. The gates come from the immutable
//! [`StartupConfig`] and are read once, when the registry is built.
//!
//! Installation runs asynchronously with respect to the page: the parser may
//! reach inline scripts or fire `DOMContentLoaded` before the objects exist.
//! The last installed script therefore dispatches [`BRIDGES_READY_EVENT`] on
//! `window`, with the installed names as `detail`. Pages read the globals
//! directly if present, otherwise wait for that event. Nothing is dispatched
//! when every capability is disabled.

use tracing::{debug, info};

use crate::bridge::BRIDGE_PROMPT_PREFIX;
use crate::config::StartupConfig;
use crate::host::RenderHost;

/// Global name of the marker object.
pub const JS_BRIDGE_NAME: &str = "FB_JSBridge";

/// Global name of the command bridge object.
pub const OS_BRIDGE_NAME: &str = "FB_OSBridge";

/// Event dispatched on `window` once the capability objects exist.
pub const BRIDGES_READY_EVENT: &str = "fbshell:bridges-ready";

/// What a capability installs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapabilityKind {
    /// Empty frozen object; lets pages detect they run inside the shell.
    Marker,
    /// Object with `runCmd(args: string[]) -> string`.
    Command,
}

/// One entry of the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityRegistration {
    pub name: &'static str,
    pub enabled: bool,
    pub kind: CapabilityKind,
}

impl CapabilityRegistration {
    /// Script defining `window[name]` in the current document.
    pub fn install_script(&self) -> String {
        let body = match self.kind {
            CapabilityKind::Marker => "{}".to_string(),
            CapabilityKind::Command => command_shim(),
        };
        format!(
            "Object.defineProperty(window, {name:?}, {{ value: Object.freeze({body}), \
             configurable: true, enumerable: false, writable: false }});",
            name = self.name,
        )
    }
}

/// `runCmd` shim: argv goes out through a synchronous `window.prompt`.
fn command_shim() -> String {
    format!(
        "{{ runCmd: function (args) {{ \
             var argv = Array.prototype.map.call(args || [], String); \
             var out = window.prompt({prefix:?} + JSON.stringify(argv), \"\"); \
             return out === null ? \"\" : String(out); \
         }} }}",
        prefix = BRIDGE_PROMPT_PREFIX,
    )
}

/// Statement announcing `names` to the page.
fn ready_event_script(names: &[&str]) -> String {
    let detail = names
        .iter()
        .map(|name| format!("{name:?}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "window.dispatchEvent(new CustomEvent({event:?}, {{ detail: [{detail}] }}));",
        event = BRIDGES_READY_EVENT,
    )
}

/// Fixed set of capabilities, gated by the startup configuration.
#[derive(Debug, Clone)]
pub struct CapabilityInjector {
    registrations: Vec<CapabilityRegistration>,
}

impl CapabilityInjector {
    pub fn from_config(config: &StartupConfig) -> Self {
        Self {
            registrations: vec![
                CapabilityRegistration {
                    name: JS_BRIDGE_NAME,
                    enabled: config.enable_js_bridge(),
                    kind: CapabilityKind::Marker,
                },
                CapabilityRegistration {
                    name: OS_BRIDGE_NAME,
                    enabled: config.enable_os_bridge(),
                    kind: CapabilityKind::Command,
                },
            ],
        }
    }

    pub fn registrations(&self) -> &[CapabilityRegistration] {
        &self.registrations
    }

    /// Installs every enabled capability into the host's current document.
    ///
    /// Called on each navigation-start. Scripts are evaluated in order, so the
    /// ready event rides on the last one. Returns the number installed.
    pub fn on_navigation_started(&self, host: &dyn RenderHost) -> usize {
        let mut enabled = Vec::new();
        for registration in &self.registrations {
            if !registration.enabled {
                debug!(name = registration.name, "Capability disabled, skipping");
                continue;
            }
            enabled.push(registration);
        }

        let names: Vec<&str> = enabled.iter().map(|r| r.name).collect();
        for (index, registration) in enabled.iter().enumerate() {
            let mut script = registration.install_script();
            if index + 1 == enabled.len() {
                script.push(' ');
                script.push_str(&ready_event_script(&names));
            }
            host.install_global(registration.name, &script);
        }
        info!(installed = enabled.len(), "Capabilities installed into new document");
        enabled.len()
    }
}
