//! Contexte de rendu GPU de la fenêtre.
//!
//! La WebView peint directement dans la surface de la fenêtre : pas de
//! chrome, donc pas de FBO offscreen intermédiaire.

use std::error::Error;
use std::rc::Rc;

use servo::{RenderingContext, WindowRenderingContext};
use winit::dpi::PhysicalSize;
use winit::raw_window_handle::{DisplayHandle, WindowHandle};

/// Crée le contexte OpenGL (surfman) lié à la fenêtre et le rend courant.
///
/// Une erreur ici est fatale pour l'application : l'appelant la journalise
/// et quitte la boucle d'événements.
pub fn create_rendering_context(
    display_handle: DisplayHandle<'_>,
    window_handle: WindowHandle<'_>,
    size: PhysicalSize<u32>,
) -> Result<Rc<WindowRenderingContext>, Box<dyn Error>> {
    let rendering_context = WindowRenderingContext::new(display_handle, window_handle, size)
        .map_err(|e| format!("WindowRenderingContext: {e:?}"))?;

    rendering_context
        .make_current()
        .map_err(|e| format!("make_current: {e:?}"))?;

    Ok(Rc::new(rendering_context))
}
