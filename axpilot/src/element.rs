use crate::errors::AutomationError;
use crate::geometry::{ScreenRect, WindowRect};
use std::fmt;
use std::fmt::Debug;

/// Role string identifying an application's primary render target.
///
/// Matches the debug form of the AT-SPI drawing-area role so the locator
/// can compare roles from the real backend and from test fixtures alike.
pub const ROLE_DRAWING_AREA: &str = "DrawingArea";

/// Read-only view of one node in the externally owned accessibility tree.
///
/// Implementations borrow the element from the accessibility service for
/// the duration of a single command invocation; nothing is cached across
/// invocations. Absence and stale handles surface as errors from the
/// individual queries, never as panics.
pub trait AccessibleElement: Send + Sync + Debug {
    fn child_count(&self) -> Result<usize, AutomationError>;

    fn child_at(&self, index: usize) -> Result<UiElement, AutomationError>;

    /// PID of the process owning this element.
    fn process_id(&self) -> Result<u32, AutomationError>;

    fn role(&self) -> Result<String, AutomationError>;

    fn name(&self) -> Result<String, AutomationError>;

    /// Extents in absolute display pixels.
    fn screen_extents(&self) -> Result<ScreenRect, AutomationError>;

    /// Extents relative to the owning window's origin.
    fn window_extents(&self) -> Result<WindowRect, AutomationError>;

    /// Whether the element can receive keyboard focus at all.
    fn is_focusable(&self) -> Result<bool, AutomationError>;

    /// Ask the service to give this element input focus. Returns whether
    /// the service accepted the request; acceptance does not guarantee
    /// focus actually moved.
    fn grab_focus(&self) -> Result<bool, AutomationError>;

    fn clone_box(&self) -> Box<dyn AccessibleElement>;
}

/// Owning handle to an accessibility-tree node.
pub struct UiElement {
    inner: Box<dyn AccessibleElement>,
}

impl UiElement {
    pub fn new(inner: Box<dyn AccessibleElement>) -> Self {
        Self { inner }
    }

    pub fn child_count(&self) -> Result<usize, AutomationError> {
        self.inner.child_count()
    }

    pub fn child_at(&self, index: usize) -> Result<UiElement, AutomationError> {
        self.inner.child_at(index)
    }

    pub fn process_id(&self) -> Result<u32, AutomationError> {
        self.inner.process_id()
    }

    pub fn role(&self) -> Result<String, AutomationError> {
        self.inner.role()
    }

    pub fn name(&self) -> Result<String, AutomationError> {
        self.inner.name()
    }

    pub fn screen_extents(&self) -> Result<ScreenRect, AutomationError> {
        self.inner.screen_extents()
    }

    pub fn window_extents(&self) -> Result<WindowRect, AutomationError> {
        self.inner.window_extents()
    }

    pub fn is_focusable(&self) -> Result<bool, AutomationError> {
        self.inner.is_focusable()
    }

    pub fn grab_focus(&self) -> Result<bool, AutomationError> {
        self.inner.grab_focus()
    }
}

impl Clone for UiElement {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone_box(),
        }
    }
}

impl fmt::Debug for UiElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}
