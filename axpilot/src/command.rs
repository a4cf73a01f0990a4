//! The command protocol: every string argument from the CLI is decoded
//! into a tagged variant here, once; dispatch never sees raw strings.

use crate::input::{ButtonAction, KeyAction};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// How pointer-move coordinates are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MoveMode {
    /// Window-relative offsets, translated to the drawing surface's
    /// screen-space origin before injection.
    Absolute,
    /// Raw pointer deltas, forwarded without translation.
    Relative,
}

/// The closed set of commands the driver executes, one per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriverCommand {
    Wait,
    MouseMove { mode: MoveMode, x: i32, y: i32 },
    MouseButton { button: u8, action: ButtonAction },
    QueryScreenSize { width: i32, height: i32 },
    TakeScreenshot { path: PathBuf },
    Focus,
    Key { code: u32, action: KeyAction },
    Resize { width: u32, height: u32 },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("no such command: {0}")]
    UnknownCommand(String),

    #[error("{command}: {reason}")]
    InvalidArguments { command: String, reason: String },
}

/// Process exit statuses of the driver. Boolean outcomes map uniformly:
/// success is 0, failure is 1. 3 and 4 are reserved for the
/// `query-screen-size` answer and never alias the failure codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    Success,
    Failure,
    UnknownCommand,
    SizeMatch,
    SizeMismatch,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        match self {
            ExitStatus::Success => 0,
            ExitStatus::Failure => 1,
            ExitStatus::UnknownCommand => 2,
            ExitStatus::SizeMatch => 3,
            ExitStatus::SizeMismatch => 4,
        }
    }

    pub fn from_query(matches: bool) -> Self {
        if matches {
            ExitStatus::SizeMatch
        } else {
            ExitStatus::SizeMismatch
        }
    }
}

impl From<bool> for ExitStatus {
    fn from(ok: bool) -> Self {
        if ok {
            ExitStatus::Success
        } else {
            ExitStatus::Failure
        }
    }
}

impl DriverCommand {
    /// Decode a command name and its raw arguments. Arity and value
    /// ranges are validated here so dispatch can assume a well-formed
    /// command.
    pub fn parse(name: &str, args: &[String]) -> Result<Self, CommandParseError> {
        match name {
            "wait" => {
                expect_arity(name, args, 0)?;
                Ok(DriverCommand::Wait)
            }
            "mouse" => parse_mouse(args),
            "query-screen-size" => {
                expect_arity(name, args, 2)?;
                Ok(DriverCommand::QueryScreenSize {
                    width: parse_int(name, "width", &args[0])?,
                    height: parse_int(name, "height", &args[1])?,
                })
            }
            "take-screenshot" => {
                expect_arity(name, args, 1)?;
                Ok(DriverCommand::TakeScreenshot {
                    path: PathBuf::from(&args[0]),
                })
            }
            "focus" => {
                expect_arity(name, args, 0)?;
                Ok(DriverCommand::Focus)
            }
            "key" => parse_key(name, args, KeyAction::Press),
            "key-down" => parse_key(name, args, KeyAction::Down),
            "key-up" => parse_key(name, args, KeyAction::Up),
            "resize" => {
                expect_arity(name, args, 2)?;
                Ok(DriverCommand::Resize {
                    width: parse_int(name, "width", &args[0])?,
                    height: parse_int(name, "height", &args[1])?,
                })
            }
            other => Err(CommandParseError::UnknownCommand(other.to_string())),
        }
    }
}

fn parse_mouse(args: &[String]) -> Result<DriverCommand, CommandParseError> {
    match args.first().map(String::as_str) {
        Some("m") => {
            expect_arity("mouse m", args, 4)?;
            let mode = match args[1].as_str() {
                "abs" => MoveMode::Absolute,
                "rel" => MoveMode::Relative,
                other => {
                    return Err(CommandParseError::InvalidArguments {
                        command: "mouse m".to_string(),
                        reason: format!("expected abs or rel, got {other:?}"),
                    })
                }
            };
            Ok(DriverCommand::MouseMove {
                mode,
                x: parse_int("mouse m", "x", &args[2])?,
                y: parse_int("mouse m", "y", &args[3])?,
            })
        }
        Some(code) => {
            expect_arity("mouse", args, 1)?;
            let (button, action) = parse_button_code(code)?;
            Ok(DriverCommand::MouseButton { button, action })
        }
        None => Err(CommandParseError::InvalidArguments {
            command: "mouse".to_string(),
            reason: "missing action".to_string(),
        }),
    }
}

/// Decode the three-character button code: `b`, a button number 1-5, and
/// an action letter (`c` click, `p` press, `r` release). Example: `b1c`.
fn parse_button_code(code: &str) -> Result<(u8, ButtonAction), CommandParseError> {
    let invalid = |reason: String| CommandParseError::InvalidArguments {
        command: "mouse".to_string(),
        reason,
    };

    let bytes = code.as_bytes();
    if bytes.len() != 3 || bytes[0] != b'b' {
        return Err(invalid(format!("unrecognized button code {code:?}")));
    }
    let button = match bytes[1] {
        digit @ b'1'..=b'5' => digit - b'0',
        _ => return Err(invalid(format!("bad button number in {code:?}"))),
    };
    let action = match bytes[2] {
        b'c' => ButtonAction::Click,
        b'p' => ButtonAction::Press,
        b'r' => ButtonAction::Release,
        _ => return Err(invalid(format!("bad button action in {code:?}"))),
    };
    Ok((button, action))
}

fn parse_key(
    name: &str,
    args: &[String],
    action: KeyAction,
) -> Result<DriverCommand, CommandParseError> {
    expect_arity(name, args, 1)?;
    Ok(DriverCommand::Key {
        code: parse_int(name, "key code", &args[0])?,
        action,
    })
}

fn expect_arity(command: &str, args: &[String], arity: usize) -> Result<(), CommandParseError> {
    if args.len() == arity {
        Ok(())
    } else {
        Err(CommandParseError::InvalidArguments {
            command: command.to_string(),
            reason: format!("expected {arity} argument(s), got {}", args.len()),
        })
    }
}

fn parse_int<T: std::str::FromStr>(
    command: &str,
    what: &str,
    raw: &str,
) -> Result<T, CommandParseError> {
    raw.parse().map_err(|_| CommandParseError::InvalidArguments {
        command: command.to_string(),
        reason: format!("{what} is not a valid number: {raw:?}"),
    })
}
