//! One command per process invocation: locate the drawing surface (or
//! poll for it), translate the command into injector/capturer calls, and
//! produce a single exit status.

use crate::capture::{save_png, ScreenCapturer};
use crate::command::{DriverCommand, ExitStatus, MoveMode};
use crate::element::UiElement;
use crate::errors::AutomationError;
use crate::geometry::{ScreenRect, WindowRect};
use crate::input::InputInjector;
use crate::locator::{SurfaceLocator, READY_TIMEOUT};
use crate::platforms::AccessibilityBackend;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::debug;

/// Settle time around the explicit `focus` command.
const FOCUS_SETTLE: Duration = Duration::from_millis(500);

/// The resolved target of a non-`wait` command. Both extents are read
/// once per invocation, before any input is injected.
struct Target {
    surface: UiElement,
    screen: ScreenRect,
    window: WindowRect,
}

/// Executes driver commands against an application identified by PID.
///
/// All collaborators are injected so tests can substitute an in-memory
/// tree, a recording injector, and a recording capturer.
pub struct Driver {
    locator: SurfaceLocator,
    input: Box<dyn InputInjector>,
    capture: Box<dyn ScreenCapturer>,
    wait_timeout: Duration,
}

impl Driver {
    pub fn new(
        backend: Arc<dyn AccessibilityBackend>,
        input: Box<dyn InputInjector>,
        capture: Box<dyn ScreenCapturer>,
    ) -> Self {
        Self {
            locator: SurfaceLocator::new(backend),
            input,
            capture,
            wait_timeout: READY_TIMEOUT,
        }
    }

    /// Override the `wait` deadline. Production keeps [`READY_TIMEOUT`].
    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout = timeout;
        self
    }

    /// Run exactly one command and return its exit status. Lookup and
    /// external-call failures come back as errors; the caller maps them
    /// to the generic failure status.
    pub fn run(&self, pid: u32, command: &DriverCommand) -> Result<ExitStatus, AutomationError> {
        if matches!(command, DriverCommand::Wait) {
            self.locator.wait_until_ready(pid, self.wait_timeout)?;
            return Ok(ExitStatus::Success);
        }

        let target = self.resolve_target(pid)?;

        match command {
            DriverCommand::Wait => Ok(ExitStatus::Success),
            DriverCommand::MouseMove { mode, x, y } => {
                match mode {
                    MoveMode::Absolute => {
                        self.input.move_pointer(target.screen.point_at(*x, *y))?
                    }
                    MoveMode::Relative => self.input.move_pointer_relative(*x, *y)?,
                }
                Ok(ExitStatus::Success)
            }
            DriverCommand::MouseButton { button, action } => {
                self.input.button(*button, *action)?;
                Ok(ExitStatus::Success)
            }
            DriverCommand::QueryScreenSize { width, height } => {
                debug!(
                    actual_width = target.window.width,
                    actual_height = target.window.height,
                    "drawing surface window extents"
                );
                Ok(ExitStatus::from_query(target.window.size_is(*width, *height)))
            }
            DriverCommand::TakeScreenshot { path } => {
                let shot = self.capture.capture(target.screen)?;
                save_png(&shot, path)?;
                Ok(ExitStatus::Success)
            }
            DriverCommand::Focus => {
                // Best effort with settle time on both sides; there is no
                // reliable way to verify the focus actually moved.
                thread::sleep(FOCUS_SETTLE);
                grab_focus_best_effort(&target.surface);
                thread::sleep(FOCUS_SETTLE);
                Ok(ExitStatus::Success)
            }
            DriverCommand::Key { code, action } => {
                self.input.key(*code, *action)?;
                Ok(ExitStatus::Success)
            }
            DriverCommand::Resize { width, height } => {
                // Targets whichever window is active, not necessarily the
                // located one; existing harnesses rely on this.
                self.input.resize_active_window(*width, *height)?;
                Ok(ExitStatus::Success)
            }
        }
    }

    /// Locate once, read both extents, and try to give the surface input
    /// focus. Focus-grabbing is known not to work reliably, so failure
    /// here never fails the command.
    fn resolve_target(&self, pid: u32) -> Result<Target, AutomationError> {
        let located = self.locator.locate(pid)?;
        let application = located
            .application
            .ok_or(AutomationError::PidNotFound(pid))?;
        let surface = located
            .surface
            .ok_or(AutomationError::SurfaceNotFound(pid))?;

        let screen = surface.screen_extents()?;
        let window = surface.window_extents()?;

        grab_focus_best_effort(&application);
        grab_focus_best_effort(&surface);

        Ok(Target {
            surface,
            screen,
            window,
        })
    }
}

fn grab_focus_best_effort(element: &UiElement) {
    match element.grab_focus() {
        Ok(true) => {}
        Ok(false) => debug!(?element, "focus grab refused"),
        Err(e) => debug!(?element, error = %e, "focus grab failed"),
    }
}
