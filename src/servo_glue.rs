//! Couche d'intégration entre Servo et fbshell.
//!
//! 1. **[`Waker`] / [`WakerEvent`]** : le pont `Send + Sync` entre les threads
//!    internes de Servo et le thread principal Winit.
//!
//! 2. **[`ServoHost`]** : implémente [`RenderHost`] au-dessus d'une `WebView`,
//!    pour que le cœur (injection, dispatch) ne dépende pas de Servo.
//!
//! 3. **[`WebViewDelegate`] pour [`AppState`]** : événement de début de
//!    navigation → réinjection des capacités ; `window.prompt` → pont de
//!    commandes.

use servo::{LoadStatus, SimpleDialog, WebView, WebViewDelegate};
use tracing::{debug, warn};
use url::Url;
use winit::event_loop::{EventLoop, EventLoopProxy};

use crate::bridge::CommandBridge;
use crate::browser::AppState;
use crate::host::RenderHost;

// ─────────────────────────────────────────────────────────────────────────────
// Waker : pont Servo → Winit
// ─────────────────────────────────────────────────────────────────────────────

/// Événement marqueur envoyé à travers le `EventLoopProxy` de Winit.
///
/// La boucle Winit le reçoit dans `user_event()` et appelle
/// `servo.spin_event_loop()` en réponse.
#[derive(Debug)]
pub struct WakerEvent;

/// Pont thread-safe entre les threads de Servo et la boucle Winit.
#[derive(Clone)]
pub struct Waker(EventLoopProxy<WakerEvent>);

impl Waker {
    pub fn new(event_loop: &EventLoop<WakerEvent>) -> Self {
        Self(event_loop.create_proxy())
    }
}

impl embedder_traits::EventLoopWaker for Waker {
    fn clone_box(&self) -> Box<dyn embedder_traits::EventLoopWaker> {
        Box::new(Self(self.0.clone()))
    }

    fn wake(&self) {
        if let Err(error) = self.0.send_event(WakerEvent) {
            warn!(?error, "Échec du réveil de la boucle d'événements Winit");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ServoHost : RenderHost au-dessus d'une WebView
// ─────────────────────────────────────────────────────────────────────────────

/// Vue [`RenderHost`] empruntée sur une `WebView` Servo.
pub struct ServoHost<'a>(pub &'a WebView);

impl RenderHost for ServoHost<'_> {
    fn navigate(&self, url: Url) {
        self.0.load(url);
    }

    fn install_global(&self, name: &str, source: &str) {
        let name = name.to_string();
        self.0.evaluate_javascript(source, move |result| match result {
            Ok(_) => debug!(name = %name, "Capacité injectée"),
            Err(error) => warn!(name = %name, ?error, "Échec de l'injection de la capacité"),
        });
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// WebViewDelegate : callbacks Servo → embedder
// ─────────────────────────────────────────────────────────────────────────────

/// Exécute `f` en confinant une éventuelle panique à la frontière FFI.
///
/// Un `RefCell` déjà emprunté ne doit pas remonter dans Servo.
fn guarded(what: &'static str, f: impl FnOnce()) {
    if std::panic::catch_unwind(std::panic::AssertUnwindSafe(f)).is_err() {
        warn!(what, "Panique interceptée dans un callback Servo");
    }
}

impl WebViewDelegate for AppState {
    fn notify_new_frame_ready(&self, _webview: WebView) {
        guarded("new_frame_ready", || self.window.request_redraw());
    }

    fn notify_page_title_changed(&self, _webview: WebView, title: Option<String>) {
        guarded("page_title_changed", || {
            if let Some(title) = title {
                self.window.set_title(&title);
            }
        });
    }

    fn notify_load_status_changed(&self, webview: WebView, status: LoadStatus) {
        if !triggers_injection(&status) {
            return;
        }
        guarded("load_status_changed", || {
            self.injector.on_navigation_started(&ServoHost(&webview));
        });
    }

    /// L'exécution d'une commande du pont bloque ce thread jusqu'à la fin du
    /// processus enfant, et le script appelant avec lui.
    fn show_simple_dialog(&self, _webview: WebView, dialog: SimpleDialog) {
        let (kind, message) = match &dialog {
            SimpleDialog::Prompt(prompt) => (DialogKind::Prompt, prompt.message()),
            SimpleDialog::Alert(alert) => (DialogKind::Alert, alert.message()),
            SimpleDialog::Confirm(confirm) => (DialogKind::Confirm, confirm.message()),
        };
        let answer = answer_dialog(&self.bridge, kind, message);

        match (dialog, answer) {
            (SimpleDialog::Prompt(mut prompt), DialogAnswer::Respond(output)) => {
                prompt.set_current_value(&output);
                prompt.confirm();
            }
            (SimpleDialog::Prompt(prompt), _) => prompt.dismiss(),
            (SimpleDialog::Alert(alert), _) => alert.confirm(),
            (SimpleDialog::Confirm(confirm), DialogAnswer::Acknowledge) => confirm.confirm(),
            (SimpleDialog::Confirm(confirm), _) => confirm.dismiss(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Décisions de routage (sans Servo)
// ─────────────────────────────────────────────────────────────────────────────

/// Début de navigation : le nouveau document existe dès `HeadParsed`.
///
/// `Started` arrive alors que l'ancien document est encore actif ; y
/// injecter serait perdu au remplacement. On réinjecte donc à chaque
/// `HeadParsed`, première, interne ou rechargement.
fn triggers_injection(status: &LoadStatus) -> bool {
    matches!(status, LoadStatus::HeadParsed)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DialogKind {
    Prompt,
    Alert,
    Confirm,
}

/// Réponse de l'embedder à un dialogue simple.
#[derive(Debug, PartialEq, Eq)]
enum DialogAnswer {
    /// Valide le prompt avec cette valeur.
    Respond(String),
    Dismiss,
    Acknowledge,
}

/// Un prompt préfixé va au pont de commandes ; tout autre dialogue reçoit une
/// réponse fixe (pas de chrome pour l'afficher) : prompt refusé, alert
/// acquittée, confirm refusé.
fn answer_dialog(bridge: &CommandBridge, kind: DialogKind, message: &str) -> DialogAnswer {
    match kind {
        DialogKind::Prompt => match bridge.handle_prompt(message) {
            Some(output) => DialogAnswer::Respond(output),
            None => DialogAnswer::Dismiss,
        },
        DialogKind::Alert => {
            debug!(message, "alert() ignoré");
            DialogAnswer::Acknowledge
        }
        DialogKind::Confirm => {
            debug!(message, "confirm() refusé");
            DialogAnswer::Dismiss
        }
    }
}
