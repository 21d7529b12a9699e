//! `FB_OSBridge`: synchronous host command execution for scripted content.
//!
//! ## Trust model
//!
//! Any script running in a document where `FB_OSBridge` is installed can run
//! **any** program on the host with the shell's privileges. There is no
//! allow-list, no sandbox and no confirmation. The only gate is the
//! `enableOSBridge` config flag, read once at startup. Ship content you
//! trust, or turn the flag off.
//!
//! ## Blocking
//!
//! [`CommandBridge::run`] executes on the winit event-loop thread and waits
//! for the child to exit. Rendering, input and Servo wake-ups are frozen
//! until then. There is no timeout and no cancel.
//!
//! ## Transport
//!
//! Servo has no API to bind a native object into a page, but `window.prompt`
//! is synchronous from the script's point of view and is answered by the
//! embedder. The injected `runCmd` shim sends
//! `BRIDGE_PROMPT_PREFIX + JSON.stringify(argv)` as the prompt message; the
//! delegate hands it to [`CommandBridge::handle_prompt`] and answers the
//! prompt with the captured stdout.
//!
//! ## Availability
//!
//! The object is installed after the new document exists but with no
//! ordering against the page's own scripts, `DOMContentLoaded` included.
//! Pages wait for the `fbshell:bridges-ready` event on `window` (see
//! [`crate::capabilities::BRIDGES_READY_EVENT`]) unless `FB_OSBridge` is
//! already defined.

use std::process::{Command, Stdio};

use tracing::{debug, info, warn};

use crate::config::StartupConfig;
use crate::error::{BridgeError, Result};

/// Prompt message prefix marking a bridge invocation.
pub const BRIDGE_PROMPT_PREFIX: &str = "fbshell:os-bridge:";

/// Executes host commands on behalf of scripts.
#[derive(Debug, Clone, Copy)]
pub struct CommandBridge {
    enabled: bool,
}

impl CommandBridge {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn from_config(config: &StartupConfig) -> Self {
        Self::new(config.enable_os_bridge())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Runs `args[0]` with `args[1..]` as literal arguments and returns its
    /// stdout.
    ///
    /// Blocks until the child exits. stderr and the exit status are dropped.
    /// Spawn failures and empty `args` give an empty string, which the caller
    /// cannot tell apart from a successful run with no output.
    pub fn run(&self, args: &[String]) -> String {
        match execute(args) {
            Ok(stdout) => stdout,
            Err(e) => {
                warn!(error = %e, "Command bridge call failed");
                String::new()
            }
        }
    }

    /// Answers a `window.prompt` message if it is a bridge invocation.
    ///
    /// Returns `None` for ordinary prompts and for any invocation while the
    /// bridge is disabled, `Some(stdout)` otherwise. A malformed payload
    /// answers with an empty string.
    pub fn handle_prompt(&self, message: &str) -> Option<String> {
        let payload = message.strip_prefix(BRIDGE_PROMPT_PREFIX)?;

        if !self.enabled {
            warn!(error = %BridgeError::Disabled, "Refusing command bridge invocation");
            return None;
        }

        match decode_invocation(payload) {
            Ok(args) => Some(self.run(&args)),
            Err(e) => {
                warn!(error = %e, "Command bridge call failed");
                Some(String::new())
            }
        }
    }
}

/// Decodes the JSON argv sent by the script shim.
pub fn decode_invocation(payload: &str) -> Result<Vec<String>> {
    let args: Vec<String> = serde_json::from_str(payload)?;
    if args.is_empty() {
        return Err(BridgeError::EmptyInvocation);
    }
    Ok(args)
}

fn execute(args: &[String]) -> Result<String> {
    let (program, rest) = args.split_first().ok_or(BridgeError::EmptyInvocation)?;

    info!(program = %program, argc = rest.len(), "Running host command");

    let output = Command::new(program)
        .args(rest)
        .stdin(Stdio::null())
        .output()
        .map_err(|source| BridgeError::Spawn {
            program: program.clone(),
            source,
        })?;

    debug!(
        program = %program,
        status = %output.status,
        stdout_bytes = output.stdout.len(),
        stderr_bytes = output.stderr.len(),
        "Host command finished"
    );

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
