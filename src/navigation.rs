//! Dispatch of navigations to the render host.
//!
//! The startup URL is held by a [`DeferredTask`] until the window has had
//! [`STARTUP_NAVIGATION_DELAY`] to settle, then resolved against the working
//! directory of that moment and handed to the host.

use std::time::{Duration, Instant};

use tracing::info;

use crate::config::StartupConfig;
use crate::host::RenderHost;
use crate::scheduler::{DeferredTask, STARTUP_NAVIGATION_DELAY};
use crate::url_resolver::navigable_url_at_dispatch;

/// Resolves `raw` now and navigates `host` to it.
///
/// Returns `false` when the token cannot be turned into a URL.
pub fn dispatch(host: &dyn RenderHost, raw: &str) -> bool {
    let Some(url) = navigable_url_at_dispatch(raw) else {
        return false;
    };
    info!(url = %url, "Loading URL");
    host.navigate(url);
    true
}

/// The delayed first navigation.
#[derive(Debug)]
pub struct StartupNavigation {
    task: DeferredTask<String>,
}

impl StartupNavigation {
    /// Schedules the configured URL with the default startup delay.
    pub fn schedule(config: &StartupConfig, now: Instant) -> Self {
        Self::schedule_with_delay(config, STARTUP_NAVIGATION_DELAY, now)
    }

    pub fn schedule_with_delay(config: &StartupConfig, delay: Duration, now: Instant) -> Self {
        Self {
            task: DeferredTask::schedule(config.url().to_string(), delay, now),
        }
    }

    /// Deadline to wait for, or `None` once the navigation has been issued.
    pub fn pending_deadline(&self) -> Option<Instant> {
        self.task.is_pending().then(|| self.task.deadline())
    }

    /// Dispatches the startup URL if due. Returns `true` on the firing call.
    pub fn fire_if_due(&mut self, host: &dyn RenderHost, now: Instant) -> bool {
        match self.task.poll(now) {
            Some(raw) => {
                dispatch(host, &raw);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::testing::RecordingHost;

    fn config(json: &str) -> StartupConfig {
        StartupConfig::resolve(&["fbshell"], Some(json.as_bytes()))
    }

    #[test]
    fn test_dispatch_passes_absolute_urls_through() {
        let host = RecordingHost::default();
        assert!(dispatch(&host, "http://x"));
        assert_eq!(host.navigations.borrow()[0].as_str(), "http://x/");
    }

    #[test]
    fn test_dispatch_resolves_relative_marker() {
        let host = RecordingHost::default();
        assert!(dispatch(&host, "./www/index.html"));
        let url = host.navigations.borrow()[0].clone();
        assert_eq!(url.scheme(), "file");
        assert!(url.path().ends_with("/www/index.html"));
    }

    #[cfg(unix)]
    #[test]
    fn test_dispatch_absolute_path_stays_local() {
        let host = RecordingHost::default();
        assert!(dispatch(&host, "/abs/path.html"));
        assert_eq!(host.navigations.borrow()[0].as_str(), "file:///abs/path.html");
    }

    #[test]
    fn test_dispatch_bare_file_name_resolves_against_cwd() {
        let host = RecordingHost::default();
        assert!(dispatch(&host, "a.html"));
        let url = host.navigations.borrow()[0].clone();
        let expected = url::Url::from_file_path(std::env::current_dir().unwrap().join("a.html")).unwrap();
        assert_eq!(url.scheme(), "file");
        assert_eq!(url, expected);
    }

    #[test]
    fn test_dispatch_skips_invalid_token() {
        let host = RecordingHost::default();
        assert!(!dispatch(&host, ""));
        assert!(host.navigations.borrow().is_empty());
    }

    #[test]
    fn test_startup_navigation_waits_for_delay() {
        let host = RecordingHost::default();
        let start = Instant::now();
        let mut nav = StartupNavigation::schedule(&config(r#"{"url":"http://app.local"}"#), start);

        assert_eq!(nav.pending_deadline(), Some(start + STARTUP_NAVIGATION_DELAY));
        assert!(!nav.fire_if_due(&host, start + Duration::from_millis(500)));
        assert!(host.navigations.borrow().is_empty());

        assert!(nav.fire_if_due(&host, start + STARTUP_NAVIGATION_DELAY));
        assert_eq!(host.navigations.borrow().len(), 1);
        assert_eq!(nav.pending_deadline(), None);
    }

    #[test]
    fn test_startup_navigation_fires_once() {
        let host = RecordingHost::default();
        let start = Instant::now();
        let mut nav =
            StartupNavigation::schedule_with_delay(&StartupConfig::default(), Duration::ZERO, start);
        assert!(nav.fire_if_due(&host, start));
        assert!(!nav.fire_if_due(&host, start + Duration::from_secs(10)));
        assert_eq!(host.navigations.borrow().len(), 1);
    }
}
