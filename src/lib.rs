//! # fbshell — coquille d'application web sur Servo
//!
//! Affiche une application web locale dans une fenêtre native et lui expose
//! deux objets globaux : `FB_JSBridge` (marqueur) et `FB_OSBridge`
//! (exécution synchrone de commandes hôte).
//!
//! ## Cœur (indépendant de Servo)
//!
//! - [`config`] : fusion `config.json` + argv en un `StartupConfig` immuable.
//! - [`network`] : proxy HTTP process-wide, posé une seule fois.
//! - [`url_resolver`] : `./chemin` → `file://` au moment du dispatch.
//! - [`scheduler`] / [`navigation`] : première navigation différée.
//! - [`capabilities`] : registre des objets injectés à chaque navigation.
//! - [`bridge`] : exécution de commandes pour les scripts. **Aucun sandbox.**
//! - [`host`] : le trait `RenderHost` par lequel le cœur parle au moteur.
//!
//! ## Intégration
//!
//! - [`browser`] : boucle Winit, pattern "Two-Phase App".
//! - [`servo_glue`] : `Waker`, `ServoHost`, `WebViewDelegate`.
//! - [`preferences`], [`rendering`], [`resources`], [`input`] : plomberie Servo.

pub mod bridge;
pub mod browser;
pub mod capabilities;
pub mod config;
pub mod error;
pub mod host;
pub mod input;
pub mod navigation;
pub mod network;
pub mod preferences;
pub mod rendering;
pub mod resources;
pub mod scheduler;
pub mod servo_glue;
pub mod url_resolver;
