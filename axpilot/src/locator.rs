//! Maps an opaque process ID to its application element and drawing
//! surface, with a polling variant for applications that are still
//! starting up.

use crate::element::{UiElement, ROLE_DRAWING_AREA};
use crate::errors::AutomationError;
use crate::platforms::AccessibilityBackend;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Interval between locate attempts while waiting for readiness.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Wall-clock deadline for the `wait` command.
pub const READY_TIMEOUT: Duration = Duration::from_secs(4);

/// Result of one locate pass. Absence is a normal outcome, not an error;
/// the poller retries on it and every other command treats it as a
/// terminal lookup failure.
#[derive(Debug)]
pub struct Located {
    pub application: Option<UiElement>,
    pub surface: Option<UiElement>,
}

/// Finds an application's drawing surface in the accessibility tree.
pub struct SurfaceLocator {
    backend: Arc<dyn AccessibilityBackend>,
}

impl SurfaceLocator {
    pub fn new(backend: Arc<dyn AccessibilityBackend>) -> Self {
        Self { backend }
    }

    /// One locate pass: linear-scan the desktop's direct children for the
    /// PID, then search that application's subtree for a drawing area.
    pub fn locate(&self, pid: u32) -> Result<Located, AutomationError> {
        let desktop = self.backend.desktop()?;
        let application = find_application(&desktop, pid)?;
        let surface = application.as_ref().and_then(find_drawing_surface);
        Ok(Located {
            application,
            surface,
        })
    }

    /// Re-locate every [`POLL_INTERVAL`] until both the application and its
    /// drawing surface exist, or `timeout` elapses.
    pub fn wait_until_ready(
        &self,
        pid: u32,
        timeout: Duration,
    ) -> Result<(UiElement, UiElement), AutomationError> {
        let start = Instant::now();
        loop {
            let located = self.locate(pid)?;
            if let Located {
                application: Some(application),
                surface: Some(surface),
            } = located
            {
                debug!(pid, elapsed = ?start.elapsed(), "drawing surface ready");
                return Ok((application, surface));
            }
            if start.elapsed() >= timeout {
                return Err(AutomationError::Timeout(format!(
                    "pid {pid} did not expose a drawing area within {timeout:?}"
                )));
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

/// First direct child of the desktop owned by `pid`, in child order.
fn find_application(desktop: &UiElement, pid: u32) -> Result<Option<UiElement>, AutomationError> {
    let count = desktop.child_count()?;
    for index in 0..count {
        let child = match desktop.child_at(index) {
            Ok(child) => child,
            Err(e) => {
                debug!(index, error = %e, "skipping unreadable desktop child");
                continue;
            }
        };
        match child.process_id() {
            Ok(p) if p == pid => return Ok(Some(child)),
            Ok(_) => {}
            Err(e) => debug!(index, error = %e, "skipping child without process id"),
        }
    }
    Ok(None)
}

/// Pre-order depth-first search for the first drawing-area element.
///
/// First match wins and later matches are ignored; existing test suites
/// depend on this tie-break, so it must not change even for applications
/// that expose more than one drawing area.
fn find_drawing_surface(element: &UiElement) -> Option<UiElement> {
    let is_surface = element
        .role()
        .map(|role| role == ROLE_DRAWING_AREA)
        .unwrap_or(false);
    if is_surface {
        return Some(element.clone());
    }

    let count = element.child_count().unwrap_or(0);
    for index in 0..count {
        if let Ok(child) = element.child_at(index) {
            if let Some(found) = find_drawing_surface(&child) {
                return Some(found);
            }
        }
    }
    None
}
