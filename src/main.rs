//! Point d'entrée de fbshell.
//!
//! Usage :
//!   fbshell [URL]
//!
//! Exemples :
//!   cargo run                              → charge ./www/index.html (ou l'URL de config.json)
//!   cargo run -- http://localhost:8080     → l'argument remplace l'URL de config.json
//!
//! Le reste de la configuration vient de `config.json` dans le répertoire
//! courant (ou du chemin donné par `FBSHELL_CONFIG`).

use std::env;
use std::error::Error;
use std::rc::Rc;

use winit::event_loop::EventLoop;

use fbshell::config::StartupConfig;

fn main() -> Result<(), Box<dyn Error>> {
    // ── 1. Logging / Tracing ───────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // ── 2. Provider crypto TLS ─────────────────────────────────────────
    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .map_err(|_| "Échec de l'installation du provider crypto rustls")?;

    // ── 3. Configuration immuable (config.json + argv) ─────────────────
    let args: Vec<String> = env::args().collect();
    let config = Rc::new(StartupConfig::load(&args));
    tracing::info!(
        url = config.url(),
        js_bridge = config.enable_js_bridge(),
        os_bridge = config.enable_os_bridge(),
        "Configuration de démarrage"
    );

    // ── 4. Préférences Servo + posture réseau, avant toute navigation ──
    let mut preferences = fbshell::preferences::build_servo_preferences();
    fbshell::network::install_proxy(&config, &mut preferences);

    // ── 5. Lecteur de ressources Servo ─────────────────────────────────
    fbshell::resources::init();

    // ── 6. Boucle d'événements Winit ───────────────────────────────────
    let event_loop = EventLoop::with_user_event().build()?;
    let mut app = fbshell::browser::App::new(&event_loop, config, preferences);

    Ok(event_loop.run_app(&mut app)?)
}
