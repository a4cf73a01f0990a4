use thiserror::Error;

/// Errors that can occur while driving a GUI application through the
/// accessibility tree.
#[derive(Debug, Error)]
pub enum AutomationError {
    /// The accessibility service itself could not be reached.
    #[error("could not init accessibility service: {0}")]
    ServiceInit(String),

    /// No top-level element in the accessibility tree is owned by the PID.
    #[error("no such pid: {0}")]
    PidNotFound(u32),

    /// The application exists but exposes no drawing-area element.
    #[error("client has no drawing area (pid {0})")]
    SurfaceNotFound(u32),

    /// A wait deadline elapsed.
    #[error("timed out: {0}")]
    Timeout(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The external input-injection call reported failure.
    #[error("input injection failed: {0}")]
    Injection(String),

    /// The pixel-capture call or PNG encode reported failure.
    #[error("screen capture failed: {0}")]
    Capture(String),

    /// An accessibility-tree query failed at the service boundary.
    #[error("platform error: {0}")]
    PlatformError(String),

    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),
}
