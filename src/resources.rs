//! Lecteur de ressources Servo.
//!
//! Servo a besoin de ses fichiers de ressources (préférences, certificats,
//! domaines publics, etc.). L'embedder fournit une implémentation de
//! `ResourceReaderMethods` enregistrée via `servo::resources::set()`.
//!
//! Recherche du dossier `resources/` :
//! 1. Variable d'environnement `SERVO_RESOURCES_PATH`
//! 2. À côté de l'exécutable (ou à la racine du projet sous `target/`)
//! 3. Dans le répertoire courant

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::{env, fs};

use servo::resources::{self, Resource};
use tracing::{error, info};

/// Dossier resources/ résolu une seule fois.
static RESOURCES_DIR: OnceLock<PathBuf> = OnceLock::new();

/// Initialise le lecteur de ressources Servo.
///
/// **Doit être appelé avant `ServoBuilder::build()`**.
pub fn init() {
    resources::set(Box::new(ResourceReader));
}

struct ResourceReader;

impl resources::ResourceReaderMethods for ResourceReader {
    fn read(&self, file: Resource) -> Vec<u8> {
        read_required(resources_dir(), file.filename())
    }

    fn sandbox_access_files_dirs(&self) -> Vec<PathBuf> {
        vec![resources_dir().to_path_buf()]
    }

    fn sandbox_access_files(&self) -> Vec<PathBuf> {
        vec![]
    }
}

/// Lit une ressource obligatoire.
///
/// Servo ne peut pas démarrer sans (préférences, certificats...) : une
/// ressource absente arrête le processus ici, avec le chemin fautif, plutôt
/// qu'un contenu vide qui casserait Servo plus loin.
fn read_required(dir: &Path, filename: &str) -> Vec<u8> {
    let path = dir.join(filename);
    match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(path = %path.display(), error = %e, "Ressource Servo illisible");
            panic!("Ressource Servo '{filename}' illisible ({}): {e}", path.display());
        }
    }
}

fn resources_dir() -> &'static Path {
    RESOURCES_DIR.get_or_init(|| {
        let candidates = candidate_dirs(
            env::var_os("SERVO_RESOURCES_PATH").map(PathBuf::from),
            env::current_exe().ok(),
            env::current_dir().ok(),
        );
        let found = candidates.into_iter().find(|dir| dir.is_dir());
        match found {
            Some(dir) => {
                info!(path = %dir.display(), "Dossier resources/ trouvé");
                dir
            }
            None => {
                error!(
                    "Dossier 'resources/' introuvable. Définissez SERVO_RESOURCES_PATH \
                     ou placez-le à côté de l'exécutable."
                );
                PathBuf::from("resources")
            }
        }
    })
}

/// Ordre de recherche, du plus explicite au plus implicite.
fn candidate_dirs(
    env_override: Option<PathBuf>,
    exe: Option<PathBuf>,
    cwd: Option<PathBuf>,
) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    dirs.extend(env_override);

    if let Some(exe_dir) = exe.as_deref().and_then(Path::parent) {
        dirs.push(exe_dir.join("resources"));
        // target/{debug,release}/fbshell → racine du projet
        if let Some(target_dir) = exe_dir.parent()
            && target_dir.file_name().is_some_and(|n| n == "target")
            && let Some(project_root) = target_dir.parent()
        {
            dirs.push(project_root.join("resources"));
        }
    }

    if let Some(cwd) = cwd {
        dirs.push(cwd.join("resources"));
    }
    dirs
}
