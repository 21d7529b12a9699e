//! Startup configuration: `config.json` merged with the command line.
//!
//! The result is a single immutable [`StartupConfig`], built once in `main`
//! and shared by reference with every component for the rest of the process.
//!
//! ## Merge rules
//!
//! 1. `argv[1]`, when present, is the startup URL. The file's `url` key is
//!    then ignored.
//! 2. A missing, unreadable or malformed `config.json` is not an error: every
//!    field the command line did not set keeps its built-in default.
//! 3. Otherwise each known key is taken from the file when present and of the
//!    expected JSON type. Unknown keys are ignored.
//!
//! ## Config file location
//!
//! 1. `FBSHELL_CONFIG` environment variable (explicit override)
//! 2. `./config.json` relative to the working directory

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// Default startup page, relative to the working directory.
pub const DEFAULT_URL: &str = "./www/index.html";

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Environment variable overriding the config file path.
pub const CONFIG_PATH_ENV: &str = "FBSHELL_CONFIG";

/// Fully resolved startup configuration.
///
/// Fields are private: once built, nothing can mutate it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartupConfig {
    url: String,
    width: i64,
    height: i64,
    proxy_host: String,
    proxy_port: i64,
    #[serde(rename = "enableJSBridge")]
    enable_js_bridge: bool,
    #[serde(rename = "enableOSBridge")]
    enable_os_bridge: bool,
}

impl Default for StartupConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            width: 0,
            height: 0,
            proxy_host: String::new(),
            proxy_port: 0,
            enable_js_bridge: true,
            enable_os_bridge: true,
        }
    }
}

impl StartupConfig {
    /// Startup URL, unresolved (may still carry the `./` marker).
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Requested window width. `0` defers to the platform default size.
    pub fn width(&self) -> i64 {
        self.width
    }

    pub fn height(&self) -> i64 {
        self.height
    }

    pub fn proxy_host(&self) -> &str {
        &self.proxy_host
    }

    pub fn proxy_port(&self) -> i64 {
        self.proxy_port
    }

    /// Whether `FB_JSBridge` is installed into documents.
    pub fn enable_js_bridge(&self) -> bool {
        self.enable_js_bridge
    }

    /// Whether `FB_OSBridge` is installed into documents.
    ///
    /// This is the only switch guarding host command execution.
    pub fn enable_os_bridge(&self) -> bool {
        self.enable_os_bridge
    }

    /// Loads the config file from disk and merges it with `args`.
    ///
    /// `args` is the full process argument list, `args[0]` being the binary.
    /// Never fails: I/O errors degrade to defaults.
    pub fn load<S: AsRef<str>>(args: &[S]) -> Self {
        Self::load_from(&config_path(), args)
    }

    /// Same as [`StartupConfig::load`] with an explicit config file path.
    pub fn load_from<S: AsRef<str>>(path: &Path, args: &[S]) -> Self {
        let raw = match fs::read(path) {
            Ok(bytes) => {
                info!(path = %path.display(), "Configuration file loaded");
                Some(bytes)
            }
            Err(e) => {
                info!(path = %path.display(), error = %e, "Could not open config file, using defaults");
                None
            }
        };
        let config = Self::resolve(args, raw.as_deref());
        debug!(config = ?config, "Startup configuration resolved");
        config
    }

    /// Pure merge of the argument list with the raw bytes of the config file.
    pub fn resolve<S: AsRef<str>>(args: &[S], raw: Option<&[u8]>) -> Self {
        let mut config = Self::default();

        let cli_url = args.get(1).map(|arg| arg.as_ref().to_string());
        if let Some(ref url) = cli_url {
            config.url = url.clone();
        }

        let Some(object) = raw.and_then(parse_object) else {
            return config;
        };

        if cli_url.is_none()
            && let Some(url) = string_key(&object, "url")
        {
            config.url = url;
        }
        if let Some(width) = int_key(&object, "width") {
            config.width = width;
        }
        if let Some(height) = int_key(&object, "height") {
            config.height = height;
        }
        if let Some(host) = string_key(&object, "proxyHost") {
            config.proxy_host = host;
        }
        if let Some(port) = int_key(&object, "proxyPort") {
            config.proxy_port = port;
        }
        if let Some(enabled) = bool_key(&object, "enableJSBridge") {
            config.enable_js_bridge = enabled;
        }
        if let Some(enabled) = bool_key(&object, "enableOSBridge") {
            config.enable_os_bridge = enabled;
        }

        config
    }
}

/// Returns the config file path: env override first, then `./config.json`.
fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

/// Parses `raw` as a JSON object. Anything else yields `None`.
fn parse_object(raw: &[u8]) -> Option<Map<String, Value>> {
    match serde_json::from_slice::<Value>(raw) {
        Ok(Value::Object(object)) => Some(object),
        Ok(other) => {
            warn!(kind = json_kind(&other), "Config file is not a JSON object, using defaults");
            None
        }
        Err(e) => {
            warn!(error = %e, "Invalid config file, using defaults");
            None
        }
    }
}

fn string_key(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::String(s) => Some(s.clone()),
        other => {
            warn!(key, kind = json_kind(other), "Ignoring config key: expected a string");
            None
        }
    }
}

fn int_key(object: &Map<String, Value>, key: &str) -> Option<i64> {
    let value = object.get(key)?;
    let int = value.as_i64();
    if int.is_none() {
        warn!(key, kind = json_kind(value), "Ignoring config key: expected an integer");
    }
    int
}

fn bool_key(object: &Map<String, Value>, key: &str) -> Option<bool> {
    let value = object.get(key)?;
    let flag = value.as_bool();
    if flag.is_none() {
        warn!(key, kind = json_kind(value), "Ignoring config key: expected a boolean");
    }
    flag
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
