//! Port for the external input-injection facility, plus the adapter that
//! shells out to `xdotool`.
//!
//! The injector owns no state and performs no retries: one failed
//! external invocation is one failed command.

use crate::errors::AutomationError;
use crate::geometry::ScreenPoint;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonAction {
    Press,
    Release,
    Click,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyAction {
    /// Press and release in one call.
    Press,
    Down,
    Up,
}

/// Synthesizes pointer and keyboard events as if generated by real
/// hardware. All coordinates are literal device pixels; key codes are
/// X11 keysyms.
pub trait InputInjector: Send + Sync {
    fn move_pointer(&self, target: ScreenPoint) -> Result<(), AutomationError>;

    fn move_pointer_relative(&self, dx: i32, dy: i32) -> Result<(), AutomationError>;

    fn button(&self, button: u8, action: ButtonAction) -> Result<(), AutomationError>;

    fn key(&self, code: u32, action: KeyAction) -> Result<(), AutomationError>;

    /// Resize whichever window is currently active, blocking until the
    /// resize has been applied.
    fn resize_active_window(&self, width: u32, height: u32) -> Result<(), AutomationError>;
}

/// Injector backed by the `xdotool` binary.
pub struct XdotoolInjector {
    program: PathBuf,
}

impl XdotoolInjector {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn invoke(&self, args: &[String]) -> Result<(), AutomationError> {
        debug!(program = %self.program.display(), ?args, "injecting input");
        let status = Command::new(&self.program).args(args).status().map_err(|e| {
            AutomationError::Injection(format!(
                "failed to run {}: {e}",
                self.program.display()
            ))
        })?;
        if status.success() {
            Ok(())
        } else {
            Err(AutomationError::Injection(format!(
                "{} {} exited with {status}",
                self.program.display(),
                args.first().map(String::as_str).unwrap_or("")
            )))
        }
    }

    /// xdotool accepts raw keysyms as hexadecimal tokens.
    fn key_token(code: u32) -> String {
        format!("0x{code:x}")
    }
}

impl Default for XdotoolInjector {
    fn default() -> Self {
        Self::new("xdotool")
    }
}

impl InputInjector for XdotoolInjector {
    fn move_pointer(&self, target: ScreenPoint) -> Result<(), AutomationError> {
        self.invoke(&[
            "mousemove".to_string(),
            target.x.to_string(),
            target.y.to_string(),
        ])
    }

    fn move_pointer_relative(&self, dx: i32, dy: i32) -> Result<(), AutomationError> {
        // "--" keeps negative deltas from being parsed as flags.
        self.invoke(&[
            "mousemove_relative".to_string(),
            "--".to_string(),
            dx.to_string(),
            dy.to_string(),
        ])
    }

    fn button(&self, button: u8, action: ButtonAction) -> Result<(), AutomationError> {
        let subcommand = match action {
            ButtonAction::Press => "mousedown",
            ButtonAction::Release => "mouseup",
            ButtonAction::Click => "click",
        };
        self.invoke(&[subcommand.to_string(), button.to_string()])
    }

    fn key(&self, code: u32, action: KeyAction) -> Result<(), AutomationError> {
        let subcommand = match action {
            KeyAction::Press => "key",
            KeyAction::Down => "keydown",
            KeyAction::Up => "keyup",
        };
        self.invoke(&[subcommand.to_string(), Self::key_token(code)])
    }

    fn resize_active_window(&self, width: u32, height: u32) -> Result<(), AutomationError> {
        self.invoke(&[
            "getactivewindow".to_string(),
            "windowsize".to_string(),
            "--sync".to_string(),
            width.to_string(),
            height.to_string(),
        ])
    }
}
