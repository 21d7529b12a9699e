//! Contract between the shell core and the rendering engine.
//!
//! The core (capability injection, startup dispatch) only needs two things
//! from the engine, so it talks to this trait rather than to Servo types.
//! [`crate::servo_glue::ServoHost`] implements it over a Servo `WebView`;
//! tests use a recording double.

use url::Url;

/// Engine operations consumed by the core.
pub trait RenderHost {
    /// Starts loading `url` in the current view.
    fn navigate(&self, url: Url);

    /// Evaluates `source` in the global scope of the *current* document,
    /// defining the global `name`.
    ///
    /// Evaluation is asynchronous but ordered: successive calls run in call
    /// order, possibly after the page's own scripts. The binding dies with the
    /// document; callers re-install on each navigation-start.
    fn install_global(&self, name: &str, source: &str);
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;

    use super::*;

    /// Records every call made through [`RenderHost`].
    ///
    /// `begin_document()` simulates a navigation replacing the document:
    /// globals installed so far are forgotten.
    #[derive(Default)]
    pub struct RecordingHost {
        pub navigations: RefCell<Vec<Url>>,
        pub installs: RefCell<Vec<String>>,
        pub sources: RefCell<Vec<String>>,
        pub live_globals: RefCell<Vec<String>>,
    }

    impl RecordingHost {
        pub fn begin_document(&self) {
            self.live_globals.borrow_mut().clear();
        }

        pub fn has_global(&self, name: &str) -> bool {
            self.live_globals.borrow().iter().any(|g| g == name)
        }
    }

    impl RenderHost for RecordingHost {
        fn navigate(&self, url: Url) {
            self.navigations.borrow_mut().push(url);
        }

        fn install_global(&self, name: &str, source: &str) {
            self.installs.borrow_mut().push(name.to_string());
            self.sources.borrow_mut().push(source.to_string());
            self.live_globals.borrow_mut().push(name.to_string());
        }
    }
}
