//! Boucle d'événements Winit et cycle de vie de la fenêtre.
//!
//! ## Pattern "Two-Phase App"
//!
//! Winit 0.30 impose que les fenêtres soient créées dans `resumed()`. Servo a
//! besoin de la fenêtre pour son contexte de rendu, d'où un enum à deux états :
//!
//! ```text
//! App::Initial { .. }  →  [resumed()]  →  App::Running(Rc<AppState>)
//! ```
//!
//! ## Séquence de démarrage
//!
//! ```text
//! main : StartupConfig + Preferences (proxy inclus)
//!   └─ resumed() : fenêtre → contexte GL → Servo → WebView vide
//!        └─ StartupNavigation programmée (+1000 ms)
//!             └─ about_to_wait() : échéance atteinte → UrlResolver → load()
//!                  └─ HeadParsed → CapabilityInjector (à chaque navigation)
//! ```
//!
//! Tout tourne sur ce seul thread : événements fenêtre, réveils Servo,
//! tâche différée et appels du pont de commandes (bloquants).

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Instant;

use euclid::Scale;
use servo::{RenderingContext, Servo, ServoBuilder, WebView, WebViewBuilder, WindowRenderingContext};
use tracing::{error, info};
use webrender_api::units::DevicePoint;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::bridge::CommandBridge;
use crate::capabilities::CapabilityInjector;
use crate::config::StartupConfig;
use crate::input;
use crate::navigation::StartupNavigation;
use crate::rendering;
use crate::servo_glue::{ServoHost, Waker, WakerEvent};

const WINDOW_TITLE: &str = "fbshell";

// ─────────────────────────────────────────────────────────────────────────────
// AppState : état partagé entre Winit et Servo
// ─────────────────────────────────────────────────────────────────────────────

/// État de l'application, créé lors de `resumed()`.
///
/// Encapsulé dans `Rc` : la WebView le garde comme delegate, et tout vit sur
/// le thread principal.
pub struct AppState {
    pub window: Window,
    pub servo: Servo,
    pub rendering_context: Rc<WindowRenderingContext>,

    /// L'unique WebView (pas de gestion multi-documents).
    pub webview: RefCell<Option<WebView>>,

    pub startup: RefCell<StartupNavigation>,
    pub injector: CapabilityInjector,
    pub bridge: CommandBridge,

    pub cursor_position: Cell<DevicePoint>,
    pub modifiers: Cell<winit::keyboard::ModifiersState>,
}

impl AppState {
    /// Émet la navigation de démarrage si elle est due, puis programme le
    /// prochain réveil de la boucle.
    fn drive_startup(&self, event_loop: &ActiveEventLoop) {
        let mut startup = self.startup.borrow_mut();
        if let Some(webview) = self.webview.borrow().as_ref() {
            startup.fire_if_due(&ServoHost(webview), Instant::now());
        }
        match startup.pending_deadline() {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// App : enum deux phases
// ─────────────────────────────────────────────────────────────────────────────

pub enum App {
    /// En attente de `resumed()`.
    Initial {
        waker: Waker,
        config: Rc<StartupConfig>,
        preferences: Box<servo::Preferences>,
    },

    Running(Rc<AppState>),

    /// Échec d'initialisation, la boucle est en train de quitter.
    Failed,
}

impl App {
    /// `preferences` doit déjà porter la posture réseau (proxy).
    pub fn new(
        event_loop: &EventLoop<WakerEvent>,
        config: Rc<StartupConfig>,
        preferences: servo::Preferences,
    ) -> Self {
        Self::Initial {
            waker: Waker::new(event_loop),
            config,
            preferences: Box::new(preferences),
        }
    }
}

/// Attributs de fenêtre : taille imposée seulement si `width` est non nul.
fn window_attributes(config: &StartupConfig) -> WindowAttributes {
    let attributes = Window::default_attributes().with_title(WINDOW_TITLE);
    if config.width() == 0 {
        return attributes;
    }
    let width = config.width().max(1) as f64;
    let height = config.height().max(1) as f64;
    attributes.with_inner_size(LogicalSize::new(width, height))
}

fn start(
    event_loop: &ActiveEventLoop,
    waker: Waker,
    config: &StartupConfig,
    preferences: servo::Preferences,
) -> Result<Rc<AppState>, Box<dyn std::error::Error>> {
    // ── 1. Fenêtre ──────────────────────────────────────────────────────
    let window = event_loop.create_window(window_attributes(config))?;
    info!(size = ?window.inner_size(), "Fenêtre créée");

    // ── 2. Contexte de rendu ────────────────────────────────────────────
    let rendering_context = rendering::create_rendering_context(
        event_loop.display_handle()?,
        window.window_handle()?,
        window.inner_size(),
    )?;

    // ── 3. Servo (préférences figées ici pour tout le processus) ────────
    let servo = ServoBuilder::default()
        .preferences(preferences)
        .event_loop_waker(Box::new(waker))
        .build();

    // ── 4. AppState ─────────────────────────────────────────────────────
    let state = Rc::new(AppState {
        window,
        servo,
        rendering_context: rendering_context.clone(),
        webview: RefCell::new(None),
        startup: RefCell::new(StartupNavigation::schedule(config, Instant::now())),
        injector: CapabilityInjector::from_config(config),
        bridge: CommandBridge::from_config(config),
        cursor_position: Cell::new(DevicePoint::zero()),
        modifiers: Cell::new(winit::keyboard::ModifiersState::default()),
    });

    if state.bridge.is_enabled() {
        info!("FB_OSBridge actif : les scripts peuvent exécuter des commandes hôte");
    }

    // ── 5. WebView vide ; l'URL partira via StartupNavigation ───────────
    let scale_factor = state.window.scale_factor() as f32;
    let webview = WebViewBuilder::new(&state.servo, rendering_context as Rc<dyn RenderingContext>)
        .hidpi_scale_factor(Scale::new(scale_factor))
        .delegate(state.clone())
        .build();
    *state.webview.borrow_mut() = Some(webview);

    Ok(state)
}

// ─────────────────────────────────────────────────────────────────────────────
// ApplicationHandler : dispatch des événements Winit
// ─────────────────────────────────────────────────────────────────────────────

impl ApplicationHandler<WakerEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Self::Initial { .. } = self else {
            return;
        };
        let Self::Initial {
            waker,
            config,
            preferences,
        } = std::mem::replace(self, Self::Failed)
        else {
            return;
        };

        match start(event_loop, waker, &config, *preferences) {
            Ok(state) => {
                state.drive_startup(event_loop);
                *self = Self::Running(state);
            }
            Err(e) => {
                error!(error = %e, "Impossible de démarrer l'application");
                event_loop.exit();
            }
        }
    }

    fn user_event(&mut self, _event_loop: &ActiveEventLoop, _event: WakerEvent) {
        if let Self::Running(state) = self {
            state.servo.spin_event_loop();
        }
    }

    /// Point de réveil de `ControlFlow::WaitUntil` : la tâche différée est
    /// évaluée ici.
    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if let Self::Running(state) = self {
            state.drive_startup(event_loop);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        let Self::Running(state) = self else {
            return;
        };
        state.servo.spin_event_loop();

        if let WindowEvent::CloseRequested = event {
            event_loop.exit();
            return;
        }

        let webview = state.webview.borrow();
        let Some(webview) = webview.as_ref() else {
            return;
        };

        match event {
            WindowEvent::RedrawRequested => {
                webview.paint();
                state.rendering_context.present();
            }
            WindowEvent::Resized(new_size) => {
                state.rendering_context.resize(new_size);
                webview.resize(new_size);
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                state.modifiers.set(modifiers.state());
            }
            WindowEvent::CursorMoved { position, .. } => {
                let point = DevicePoint::new(position.x as f32, position.y as f32);
                state.cursor_position.set(point);
                input::forward_cursor_moved(webview, point);
            }
            WindowEvent::CursorLeft { .. } => input::forward_cursor_left(webview),
            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => {
                input::forward_mouse_button(webview, button_state, button, state.cursor_position.get());
            }
            WindowEvent::MouseWheel { delta, .. } => {
                input::forward_wheel(webview, delta, state.cursor_position.get());
            }
            WindowEvent::KeyboardInput { event, .. } => {
                input::forward_key(webview, &event, state.modifiers.get());
            }
            _ => (),
        }
    }
}

#[cfg(test)]
mod tests {
    use winit::dpi::Size;

    use super::*;

    fn config(json: &str) -> StartupConfig {
        StartupConfig::resolve(&["fbshell"], Some(json.as_bytes()))
    }

    #[test]
    fn test_zero_width_defers_to_platform_size() {
        let attributes = window_attributes(&StartupConfig::default());
        assert!(attributes.inner_size.is_none());
        assert_eq!(attributes.title, WINDOW_TITLE);
    }

    #[test]
    fn test_configured_size_is_applied() {
        let attributes = window_attributes(&config(r#"{"width":800,"height":600}"#));
        assert_eq!(
            attributes.inner_size,
            Some(Size::from(LogicalSize::new(800.0, 600.0)))
        );
    }

    #[test]
    fn test_width_without_height_gets_minimal_height() {
        let attributes = window_attributes(&config(r#"{"width":640}"#));
        assert_eq!(
            attributes.inner_size,
            Some(Size::from(LogicalSize::new(640.0, 1.0)))
        );
    }
}
