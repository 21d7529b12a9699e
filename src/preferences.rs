//! Servo engine preferences for a local web application.
//!
//! Builds a [`servo::Preferences`] struct once, before `ServoBuilder::build()`.
//! These are the per-document settings of the shell; nothing here changes
//! after startup:
//! - Thread pools sized to available CPU cores (clamped)
//! - Async clipboard API on, for local app content
//! - Devtools server on (web inspector)
//! - TLS not enforced, so `http://` app backends on localhost keep working
//!
//! The proxy is not set here: see [`crate::network::install_proxy`].

use tracing::info;

/// Builds Servo `Preferences` tuned for the current machine.
#[allow(clippy::field_reassign_with_default)]
pub fn build_servo_preferences() -> servo::Preferences {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get() as i64)
        .unwrap_or(4);

    let mut prefs = servo::Preferences::default();

    // ── Performance Tuning ────────────────────────────────────────────────
    prefs.layout_threads = cpus.min(8);
    prefs.threadpools_async_runtime_workers_max = (cpus * 2).min(16);
    prefs.threadpools_image_cache_workers_max = cpus.min(8);
    prefs.threadpools_webrender_workers_max = (cpus / 2).clamp(2, 8);
    prefs.threadpools_resource_workers_max = cpus.min(8);
    prefs.gfx_precache_shaders = true;

    // ── Per-document settings ─────────────────────────────────────────────
    prefs.dom_async_clipboard_enabled = true;
    prefs.devtools_server_enabled = true;
    prefs.network_enforce_tls_enabled = false;
    prefs.dom_allow_scripts_to_close_windows = false;

    info!(
        cpus,
        layout_threads = prefs.layout_threads,
        network_workers = prefs.threadpools_async_runtime_workers_max,
        devtools = prefs.devtools_server_enabled,
        "Servo preferences configured"
    );

    prefs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preferences_layout_threads_bounded() {
        let prefs = build_servo_preferences();
        assert!(prefs.layout_threads >= 1, "layout_threads should be >= 1");
        assert!(prefs.layout_threads <= 8, "layout_threads should be <= 8");
    }

    #[test]
    fn test_preferences_webrender_workers_bounded() {
        let prefs = build_servo_preferences();
        assert!(prefs.threadpools_webrender_workers_max >= 2);
        assert!(prefs.threadpools_webrender_workers_max <= 8);
    }

    #[test]
    fn test_preferences_clipboard_and_inspector_enabled() {
        let prefs = build_servo_preferences();
        assert!(prefs.devtools_server_enabled);
        assert!(prefs.dom_async_clipboard_enabled);
    }

    #[test]
    fn test_preferences_scripts_cannot_close_window() {
        assert!(!build_servo_preferences().dom_allow_scripts_to_close_windows);
    }

    #[test]
    fn test_preferences_tls_not_enforced() {
        assert!(!build_servo_preferences().network_enforce_tls_enabled);
    }

    #[test]
    fn test_preferences_leave_proxy_unset() {
        let prefs = build_servo_preferences();
        assert!(prefs.network_http_proxy_uri.is_empty());
    }
}
