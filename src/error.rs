use thiserror::Error;

pub type Result<T> = std::result::Result<T, BridgeError>;

/// Host-side failures of the command bridge.
///
/// These are logged and never reach the script: the script always receives a
/// string, empty when one of these occurred.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("command bridge is disabled")]
    Disabled,

    #[error("malformed invocation payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    #[error("empty invocation: no executable given")]
    EmptyInvocation,

    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
