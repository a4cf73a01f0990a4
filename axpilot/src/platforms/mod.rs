use crate::element::UiElement;
use crate::errors::AutomationError;
use std::sync::Arc;

/// Entry point into the platform's accessibility service.
///
/// The backend is an injected dependency of the locator and dispatcher,
/// so tests can substitute a synthetic in-memory tree.
pub trait AccessibilityBackend: Send + Sync {
    /// The desktop root element, top of the accessibility tree. It has
    /// no process-owning semantics itself; its direct children are the
    /// running applications.
    fn desktop(&self) -> Result<UiElement, AutomationError>;
}

#[cfg(target_os = "linux")]
pub mod linux;

/// Create the accessibility backend for the current platform.
pub fn create_backend() -> Result<Arc<dyn AccessibilityBackend>, AutomationError> {
    #[cfg(target_os = "linux")]
    {
        Ok(Arc::new(linux::AtspiBackend::connect()?))
    }
    #[cfg(not(target_os = "linux"))]
    {
        Err(AutomationError::UnsupportedPlatform(
            "the accessibility backend is only implemented for Linux (AT-SPI2)".to_string(),
        ))
    }
}
