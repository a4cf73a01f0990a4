//! Tree search and readiness polling against a synthetic tree.

use super::fixtures::{AppearingBackend, FakeBackend, FakeElement};
use crate::errors::AutomationError;
use crate::geometry::{ScreenRect, WindowRect};
use crate::locator::SurfaceLocator;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn canvas_app(pid: u32) -> FakeElement {
    FakeElement::new("Frame", "app")
        .with_pid(pid)
        .with_children(vec![
            FakeElement::new("Panel", "panel"),
            FakeElement::drawing_area("canvas").with_extents(
                ScreenRect::new(10, 10, 200, 100),
                WindowRect::new(2, 30, 200, 100),
            ),
        ])
}

#[test]
fn absent_pid_yields_neither_element() {
    let locator = SurfaceLocator::new(Arc::new(FakeBackend::new(vec![canvas_app(4242)])));
    let located = locator.locate(9999).unwrap();
    assert!(located.application.is_none());
    assert!(located.surface.is_none());
}

#[test]
fn application_without_drawing_area() {
    let app = FakeElement::new("Frame", "app")
        .with_pid(17)
        .with_children(vec![FakeElement::new("Panel", "panel")]);
    let locator = SurfaceLocator::new(Arc::new(FakeBackend::new(vec![app])));
    let located = locator.locate(17).unwrap();
    assert!(located.application.is_some());
    assert!(located.surface.is_none());
}

#[test]
fn first_drawing_area_in_preorder_wins() {
    // Pre-order: panel, canvas, overlay. "canvas" must win, "overlay"
    // must be ignored.
    let app = FakeElement::new("Frame", "app")
        .with_pid(4242)
        .with_children(vec![
            FakeElement::new("Panel", "panel"),
            FakeElement::drawing_area("canvas"),
            FakeElement::drawing_area("overlay"),
        ]);
    let locator = SurfaceLocator::new(Arc::new(FakeBackend::new(vec![app])));
    let surface = locator.locate(4242).unwrap().surface.unwrap();
    assert_eq!(surface.name().unwrap(), "canvas");
}

#[test]
fn deeper_subtree_visited_before_later_sibling() {
    // A drawing area nested under an earlier sibling still precedes a
    // shallower one that comes later in child order.
    let app = FakeElement::new("Frame", "app")
        .with_pid(7)
        .with_children(vec![
            FakeElement::new("Panel", "panel")
                .with_children(vec![FakeElement::drawing_area("nested")]),
            FakeElement::drawing_area("shallow"),
        ]);
    let locator = SurfaceLocator::new(Arc::new(FakeBackend::new(vec![app])));
    let surface = locator.locate(7).unwrap().surface.unwrap();
    assert_eq!(surface.name().unwrap(), "nested");
}

#[test]
fn search_is_deterministic_across_calls() {
    let locator = SurfaceLocator::new(Arc::new(FakeBackend::new(vec![canvas_app(4242)])));
    let first = locator.locate(4242).unwrap().surface.unwrap();
    let second = locator.locate(4242).unwrap().surface.unwrap();
    assert_eq!(first.name().unwrap(), second.name().unwrap());
}

#[test]
fn only_desktop_children_are_candidate_applications() {
    // An element owned by the PID below the top level must not be picked
    // up by the linear scan.
    let other = FakeElement::new("Frame", "other")
        .with_pid(1)
        .with_children(vec![canvas_app(4242)]);
    let locator = SurfaceLocator::new(Arc::new(FakeBackend::new(vec![other])));
    let located = locator.locate(4242).unwrap();
    assert!(located.application.is_none());
}

#[test]
fn wait_returns_once_surface_appears() {
    super::init_tracing();
    let backend = AppearingBackend::new(vec![canvas_app(4242)], 3);
    let locator = SurfaceLocator::new(Arc::new(backend));
    let (application, surface) = locator
        .wait_until_ready(4242, Duration::from_secs(4))
        .unwrap();
    assert_eq!(application.process_id().unwrap(), 4242);
    assert_eq!(surface.name().unwrap(), "canvas");
}

#[test]
fn wait_times_out_for_pid_that_never_appears() {
    let locator = SurfaceLocator::new(Arc::new(FakeBackend::new(vec![])));
    let timeout = Duration::from_millis(300);
    let start = Instant::now();
    let err = locator.wait_until_ready(4242, timeout).unwrap_err();
    assert!(matches!(err, AutomationError::Timeout(_)));
    assert!(start.elapsed() >= timeout);
}
