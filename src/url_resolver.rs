//! Résolution des URLs de démarrage au moment du dispatch.
//!
//! Un jeton commençant par `./` désigne un fichier relatif au répertoire
//! courant *au moment où la navigation part*, pas au moment où la
//! configuration a été lue. Tout le reste passe tel quel dans
//! [`resolve_url`] ; à la conversion en [`Url`], un jeton sans schéma
//! (`/abs/page.html`, `a.html`) reste un fichier local, jamais un hôte distant.

use std::env;
use std::path::{Path, PathBuf};

use tracing::warn;
use url::{ParseError, Url};

/// Marqueur de chemin relatif.
const RELATIVE_MARKER: &str = "./";

/// Réécrit `raw` en URL `file://` absolue s'il commence par `./`, en prenant
/// `cwd` comme racine. Les autres chaînes sont renvoyées inchangées.
pub fn resolve_url(raw: &str, cwd: &Path) -> String {
    let Some(rest) = raw.strip_prefix(RELATIVE_MARKER) else {
        return raw.to_string();
    };

    let path = cwd.join(rest);
    match Url::from_file_path(&path) {
        Ok(url) => url.to_string(),
        // cwd non absolu : on garde la forme brute plutôt que d'échouer.
        Err(()) => format!("file:///{}", path.display()),
    }
}

/// Transforme un jeton résolu en [`Url`] navigable.
///
/// Un jeton avec schéma est gardé tel quel. Un jeton sans schéma est un
/// fichier local : absolu s'il commence par `/`, sinon relatif à `cwd`.
/// Renvoie `None` pour un jeton vide ou un chemin non convertible.
pub fn to_navigable_url(resolved: &str, cwd: &Path) -> Option<Url> {
    match Url::parse(resolved) {
        Ok(url) => return Some(url),
        Err(ParseError::RelativeUrlWithoutBase) if !resolved.is_empty() => {}
        Err(e) => {
            warn!(url = resolved, error = %e, "URL invalide, navigation ignorée");
            return None;
        }
    }

    let path = Path::new(resolved);
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    };
    match Url::from_file_path(&path) {
        Ok(url) => Some(url),
        Err(()) => {
            warn!(url = resolved, path = %path.display(), "Chemin local inutilisable, navigation ignorée");
            None
        }
    }
}

/// Résout puis convertit `raw` avec le répertoire courant de cet instant.
pub fn navigable_url_at_dispatch(raw: &str) -> Option<Url> {
    let cwd = match env::current_dir() {
        Ok(cwd) => cwd,
        Err(e) => {
            warn!(error = %e, url = raw, "Répertoire courant illisible");
            PathBuf::new()
        }
    };
    to_navigable_url(&resolve_url(raw, &cwd), &cwd)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_relative_marker_becomes_file_url() {
        assert_eq!(
            resolve_url("./a/b.html", Path::new("/home/u")),
            "file:///home/u/a/b.html"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_default_startup_page() {
        assert_eq!(
            resolve_url("./www/index.html", Path::new("/opt/app")),
            "file:///opt/app/www/index.html"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_spaces_are_percent_encoded() {
        assert_eq!(
            resolve_url("./my page.html", Path::new("/srv")),
            "file:///srv/my%20page.html"
        );
    }

    #[test]
    fn test_other_strings_pass_through() {
        let cwd = Path::new("/home/u");
        assert_eq!(resolve_url("http://x", cwd), "http://x");
        assert_eq!(resolve_url("https://example.com/a", cwd), "https://example.com/a");
        assert_eq!(resolve_url("/abs/path.html", cwd), "/abs/path.html");
        assert_eq!(resolve_url("file:///tmp/x.html", cwd), "file:///tmp/x.html");
        assert_eq!(resolve_url("a.html", cwd), "a.html");
        assert_eq!(resolve_url("../up.html", cwd), "../up.html");
    }

    #[test]
    fn test_dispatch_uses_current_directory() {
        let cwd = env::current_dir().unwrap();
        let url = navigable_url_at_dispatch("./index.html").unwrap();
        assert_eq!(url.scheme(), "file");
        assert_eq!(url, Url::from_file_path(cwd.join("index.html")).unwrap());
    }

    #[test]
    fn test_navigable_url_keeps_scheme() {
        let url = to_navigable_url("http://x", Path::new("/home/u")).unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host_str(), Some("x"));
    }

    #[cfg(unix)]
    #[test]
    fn test_navigable_url_absolute_path_is_local_file() {
        let url = to_navigable_url("/abs/path.html", Path::new("/home/u")).unwrap();
        assert_eq!(url.as_str(), "file:///abs/path.html");
    }

    #[cfg(unix)]
    #[test]
    fn test_navigable_url_bare_name_is_relative_to_cwd() {
        let cwd = Path::new("/home/u");
        assert_eq!(
            to_navigable_url("a.html", cwd).unwrap().as_str(),
            "file:///home/u/a.html"
        );
        assert_eq!(
            to_navigable_url("www/index.html", cwd).unwrap().as_str(),
            "file:///home/u/www/index.html"
        );
    }

    #[test]
    fn test_navigable_url_never_guesses_remote_host() {
        let url = to_navigable_url("servo.org", Path::new("/home/u")).unwrap();
        assert_eq!(url.scheme(), "file");
    }

    #[test]
    fn test_navigable_url_rejects_garbage() {
        assert!(to_navigable_url("", Path::new("/home/u")).is_none());
        assert!(to_navigable_url("http://[::1", Path::new("/home/u")).is_none());
    }
}
