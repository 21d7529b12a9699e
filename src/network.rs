//! Process-wide network posture: the optional HTTP proxy.
//!
//! The proxy is folded into the Servo `Preferences` handed to `ServoBuilder`,
//! which makes it the default for every request the engine issues. It is
//! installed once, before the first navigation, and never changed again.

use std::sync::OnceLock;

use tracing::{debug, info, warn};

use crate::config::StartupConfig;

/// Proxy URI recorded by the first [`install_proxy`] call.
static INSTALLED_PROXY: OnceLock<Option<String>> = OnceLock::new();

/// Builds the `http://host:port` proxy URI, or `None` when no host is set.
///
/// No validation: a port without a host yields no proxy, a host with port 0
/// is passed through as-is.
pub fn proxy_uri(config: &StartupConfig) -> Option<String> {
    let host = config.proxy_host();
    if host.is_empty() {
        if config.proxy_port() != 0 {
            debug!(port = config.proxy_port(), "Proxy port set without host, no proxy");
        }
        return None;
    }
    Some(format!("http://{}:{}", host, config.proxy_port()))
}

/// Writes the proxy into `prefs` the first time it is called.
///
/// Returns `true` if this call installed the posture. Later calls leave
/// `prefs` untouched and return `false`.
pub fn install_proxy(config: &StartupConfig, prefs: &mut servo::Preferences) -> bool {
    let mut installed_now = false;
    let uri = INSTALLED_PROXY.get_or_init(|| {
        installed_now = true;
        proxy_uri(config)
    });

    if !installed_now {
        warn!("Network posture already applied, ignoring second install");
        return false;
    }

    apply_uri(uri.as_deref(), prefs);
    true
}

/// Proxy installed for this process, if any.
#[cfg(test)]
fn installed_proxy() -> Option<&'static str> {
    INSTALLED_PROXY.get().and_then(|uri| uri.as_deref())
}

fn apply_uri(uri: Option<&str>, prefs: &mut servo::Preferences) {
    match uri {
        Some(uri) => {
            info!(proxy = uri, "Setting HTTP proxy");
            prefs.network_http_proxy_uri = uri.to_string();
            prefs.network_https_proxy_uri = uri.to_string();
        }
        None => debug!("No proxy configured"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(json: &str) -> StartupConfig {
        StartupConfig::resolve(&["fbshell"], Some(json.as_bytes()))
    }

    #[test]
    fn test_no_host_means_no_proxy() {
        assert_eq!(proxy_uri(&StartupConfig::default()), None);
        assert_eq!(proxy_uri(&config(r#"{"proxyPort":3128}"#)), None);
    }

    #[test]
    fn test_host_and_port_form_http_uri() {
        let c = config(r#"{"proxyHost":"10.0.0.1","proxyPort":3128}"#);
        assert_eq!(proxy_uri(&c).as_deref(), Some("http://10.0.0.1:3128"));
    }

    #[test]
    fn test_host_without_port_is_not_validated() {
        let c = config(r#"{"proxyHost":"proxy.lan"}"#);
        assert_eq!(proxy_uri(&c).as_deref(), Some("http://proxy.lan:0"));
    }

    #[test]
    fn test_apply_uri_sets_both_schemes() {
        let mut prefs = servo::Preferences::default();
        apply_uri(Some("http://proxy.lan:8080"), &mut prefs);
        assert_eq!(prefs.network_http_proxy_uri, "http://proxy.lan:8080");
        assert_eq!(prefs.network_https_proxy_uri, "http://proxy.lan:8080");
    }

    #[test]
    fn test_install_happens_only_once() {
        let first = config(r#"{"proxyHost":"first.lan","proxyPort":1}"#);
        let second = config(r#"{"proxyHost":"second.lan","proxyPort":2}"#);

        let mut prefs = servo::Preferences::default();
        assert!(install_proxy(&first, &mut prefs));
        assert_eq!(installed_proxy(), Some("http://first.lan:1"));

        let mut again = servo::Preferences::default();
        assert!(!install_proxy(&second, &mut again));
        assert_eq!(installed_proxy(), Some("http://first.lan:1"));
        assert_ne!(again.network_http_proxy_uri, "http://second.lan:2");
    }
}
