//! GUI test driving through accessibility APIs
//!
//! Given the PID of a running graphical application, this crate locates
//! the application's primary drawing surface in the accessibility tree
//! and executes one command against it: wait for readiness, synthesize
//! mouse or keyboard input, query geometry, capture a screenshot, or
//! resize the active window. Outcomes are reported as small integer
//! exit statuses suitable for a test harness.
//!
//! The accessibility service, the input-injection facility, and the
//! pixel-capture facility are all modeled as ports with one real adapter
//! each, so the search, polling, and dispatch logic is testable against
//! in-memory fakes.

pub mod capture;
pub mod command;
pub mod dispatcher;
pub mod element;
pub mod errors;
pub mod geometry;
pub mod input;
pub mod locator;
pub mod platforms;
#[cfg(test)]
mod tests;

pub use capture::{MonitorCapturer, ScreenCapturer, ScreenshotResult};
pub use command::{CommandParseError, DriverCommand, ExitStatus, MoveMode};
pub use dispatcher::Driver;
pub use element::{AccessibleElement, UiElement, ROLE_DRAWING_AREA};
pub use errors::AutomationError;
pub use geometry::{ScreenPoint, ScreenRect, WindowRect};
pub use input::{ButtonAction, InputInjector, KeyAction, XdotoolInjector};
pub use locator::{Located, SurfaceLocator, POLL_INTERVAL, READY_TIMEOUT};
pub use platforms::{create_backend, AccessibilityBackend};
