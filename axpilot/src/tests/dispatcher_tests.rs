//! Command dispatch against fakes: coordinate translation, exit-status
//! mapping, lookup failures, and external-call propagation.

use super::fixtures::{
    AppearingBackend, FailingInjector, FakeBackend, FakeElement, InjectedEvent, RecordingCapturer,
    RecordingInjector,
};
use crate::command::{DriverCommand, ExitStatus, MoveMode};
use crate::dispatcher::Driver;
use crate::errors::AutomationError;
use crate::geometry::{ScreenRect, WindowRect};
use crate::input::{ButtonAction, KeyAction};
use crate::platforms::AccessibilityBackend;
use std::sync::{Arc, Mutex};
use std::time::Duration;

const PID: u32 = 4242;

fn canvas_app() -> FakeElement {
    FakeElement::new("Frame", "app")
        .with_pid(PID)
        .with_children(vec![
            FakeElement::new("Panel", "panel"),
            FakeElement::drawing_area("canvas").with_extents(
                ScreenRect::new(10, 20, 200, 100),
                WindowRect::new(2, 30, 200, 100),
            ),
        ])
}

struct Harness {
    driver: Driver,
    injector: RecordingInjector,
    capturer: RecordingCapturer,
}

fn harness(backend: impl AccessibilityBackend + 'static) -> Harness {
    let injector = RecordingInjector::default();
    let capturer = RecordingCapturer::default();
    let driver = Driver::new(
        Arc::new(backend),
        Box::new(injector.clone()),
        Box::new(capturer.clone()),
    );
    Harness {
        driver,
        injector,
        capturer,
    }
}

fn default_harness() -> Harness {
    super::init_tracing();
    harness(FakeBackend::new(vec![canvas_app()]))
}

#[test]
fn absolute_mouse_move_adds_screen_origin() {
    let h = default_harness();
    let status = h
        .driver
        .run(
            PID,
            &DriverCommand::MouseMove {
                mode: MoveMode::Absolute,
                x: 5,
                y: 7,
            },
        )
        .unwrap();
    assert_eq!(status, ExitStatus::Success);
    assert_eq!(h.injector.events(), vec![InjectedEvent::MoveAbs(15, 27)]);
}

#[test]
fn relative_mouse_move_bypasses_translation() {
    let h = default_harness();
    h.driver
        .run(
            PID,
            &DriverCommand::MouseMove {
                mode: MoveMode::Relative,
                x: -3,
                y: 4,
            },
        )
        .unwrap();
    assert_eq!(h.injector.events(), vec![InjectedEvent::MoveRel(-3, 4)]);
}

#[test]
fn button_action_is_forwarded_verbatim() {
    let h = default_harness();
    h.driver
        .run(
            PID,
            &DriverCommand::MouseButton {
                button: 2,
                action: ButtonAction::Press,
            },
        )
        .unwrap();
    assert_eq!(
        h.injector.events(),
        vec![InjectedEvent::Button(2, ButtonAction::Press)]
    );
}

#[test]
fn key_action_is_forwarded_verbatim() {
    let h = default_harness();
    h.driver
        .run(
            PID,
            &DriverCommand::Key {
                code: 0xff0d,
                action: KeyAction::Down,
            },
        )
        .unwrap();
    assert_eq!(
        h.injector.events(),
        vec![InjectedEvent::Key(0xff0d, KeyAction::Down)]
    );
}

#[test]
fn resize_targets_the_active_window() {
    let h = default_harness();
    h.driver
        .run(
            PID,
            &DriverCommand::Resize {
                width: 800,
                height: 600,
            },
        )
        .unwrap();
    assert_eq!(h.injector.events(), vec![InjectedEvent::Resize(800, 600)]);
}

#[test]
fn query_screen_size_compares_window_space_exactly() {
    let h = default_harness();
    let exact = h
        .driver
        .run(
            PID,
            &DriverCommand::QueryScreenSize {
                width: 200,
                height: 100,
            },
        )
        .unwrap();
    assert_eq!(exact, ExitStatus::SizeMatch);
    assert_eq!(exact.code(), 3);

    // One pixel off is a mismatch.
    let off = h
        .driver
        .run(
            PID,
            &DriverCommand::QueryScreenSize {
                width: 201,
                height: 100,
            },
        )
        .unwrap();
    assert_eq!(off, ExitStatus::SizeMismatch);
    assert_eq!(off.code(), 4);
}

#[test]
fn screenshot_captures_the_surface_screen_rectangle() {
    let h = default_harness();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shot.png");

    let status = h
        .driver
        .run(
            PID,
            &DriverCommand::TakeScreenshot { path: path.clone() },
        )
        .unwrap();
    assert_eq!(status, ExitStatus::Success);
    assert_eq!(h.capturer.requests(), vec![ScreenRect::new(10, 20, 200, 100)]);

    let written = image::open(&path).unwrap();
    assert_eq!(written.width(), 200);
    assert_eq!(written.height(), 100);
}

#[test]
fn lookup_failure_is_terminal_for_non_wait_commands() {
    let h = default_harness();
    let err = h
        .driver
        .run(
            9999,
            &DriverCommand::MouseMove {
                mode: MoveMode::Absolute,
                x: 0,
                y: 0,
            },
        )
        .unwrap_err();
    assert!(matches!(err, AutomationError::PidNotFound(9999)));
    assert!(h.injector.events().is_empty());
}

#[test]
fn missing_drawing_area_is_its_own_failure() {
    let bare = FakeElement::new("Frame", "app").with_pid(PID);
    let h = harness(FakeBackend::new(vec![bare]));
    let err = h
        .driver
        .run(PID, &DriverCommand::Key {
            code: 32,
            action: KeyAction::Press,
        })
        .unwrap_err();
    assert!(matches!(err, AutomationError::SurfaceNotFound(p) if p == PID));
    assert!(h.injector.events().is_empty());
}

#[test]
fn failed_injection_aborts_the_command() {
    let driver = Driver::new(
        Arc::new(FakeBackend::new(vec![canvas_app()])),
        Box::new(FailingInjector),
        Box::new(RecordingCapturer::default()),
    );
    let err = driver
        .run(
            PID,
            &DriverCommand::MouseMove {
                mode: MoveMode::Absolute,
                x: 1,
                y: 1,
            },
        )
        .unwrap_err();
    assert!(matches!(err, AutomationError::Injection(_)));
}

#[test]
fn focus_grab_failure_never_fails_the_command() {
    let app = FakeElement::new("Frame", "app")
        .with_pid(PID)
        .with_fail_focus()
        .with_children(vec![FakeElement::drawing_area("canvas")
            .with_extents(
                ScreenRect::new(0, 0, 50, 50),
                WindowRect::new(0, 0, 50, 50),
            )
            .with_fail_focus()]);
    let h = harness(FakeBackend::new(vec![app]));
    let status = h
        .driver
        .run(
            PID,
            &DriverCommand::QueryScreenSize {
                width: 50,
                height: 50,
            },
        )
        .unwrap();
    assert_eq!(status, ExitStatus::SizeMatch);
}

#[test]
fn input_commands_try_to_focus_the_surface_first() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let app = FakeElement::new("Frame", "app")
        .with_pid(PID)
        .with_focus_log(log.clone())
        .with_children(vec![FakeElement::drawing_area("canvas")
            .with_extents(
                ScreenRect::new(0, 0, 50, 50),
                WindowRect::new(0, 0, 50, 50),
            )
            .with_focus_log(log.clone())]);
    let h = harness(FakeBackend::new(vec![app]));
    h.driver
        .run(
            PID,
            &DriverCommand::MouseButton {
                button: 1,
                action: ButtonAction::Click,
            },
        )
        .unwrap();
    assert_eq!(*log.lock().unwrap(), vec!["app", "canvas"]);
}

#[test]
fn wait_succeeds_when_surface_appears_within_deadline() {
    let h = harness(AppearingBackend::new(vec![canvas_app()], 3));
    let status = h.driver.run(PID, &DriverCommand::Wait).unwrap();
    assert_eq!(status, ExitStatus::Success);
}

#[test]
fn wait_fails_after_deadline() {
    let h = harness(FakeBackend::new(vec![]));
    let driver = h.driver.with_wait_timeout(Duration::from_millis(250));
    let err = driver.run(PID, &DriverCommand::Wait).unwrap_err();
    assert!(matches!(err, AutomationError::Timeout(_)));
}
