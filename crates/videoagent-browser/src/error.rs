//! Flow automation errors.

use thiserror::Error;

use crate::cdp::CdpError;

/// Why a Flow submission did not go through.
#[derive(Debug, Error)]
pub enum BrowserError {
    /// No candidate port answered `/json/version`.
    #[error(
        "No DevTools port detected. Close every Chrome window and relaunch with a dedicated profile: \
         chrome --remote-debugging-port=9222 --user-data-dir=<profile dir>"
    )]
    NoDevToolsPort,

    #[error("No Flow tab is open and no Flow URL was provided")]
    NoFlowTab,

    #[error("Prompt input not found")]
    InputNotFound,

    #[error("Submit failed: {0}")]
    SubmitFailed(String),

    /// Every input/submit attempt within the time budget failed.
    #[error("Still not submitted after {attempts} attempts. Last failure: {last_reason}")]
    AttemptsExhausted { attempts: u32, last_reason: String },

    #[error(transparent)]
    Cdp(#[from] CdpError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_port_message_has_launch_hint() {
        let message = BrowserError::NoDevToolsPort.to_string();
        assert!(message.contains("--remote-debugging-port=9222"));
    }

    #[test]
    fn test_exhausted_message() {
        let err = BrowserError::AttemptsExhausted {
            attempts: 3,
            last_reason: "Prompt input not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Still not submitted after 3 attempts. Last failure: Prompt input not found"
        );
    }

    #[test]
    fn test_cdp_error_is_transparent() {
        let err: BrowserError = CdpError::SessionClosed.into();
        assert_eq!(err.to_string(), "Session closed");
    }
}
