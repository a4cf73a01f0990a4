//! Port for the external pixel-capture facility, plus the adapter that
//! captures through the monitor backend and crops to the requested
//! screen-space rectangle.

use crate::errors::AutomationError;
use crate::geometry::ScreenRect;
use std::path::Path;
use tracing::debug;

/// Raw capture output, RGBA row-major.
#[derive(Debug, Clone)]
pub struct ScreenshotResult {
    pub image_data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Rasterizes a screen-space rectangle to an in-memory pixel buffer.
pub trait ScreenCapturer: Send + Sync {
    fn capture(&self, rect: ScreenRect) -> Result<ScreenshotResult, AutomationError>;
}

/// Encode a capture as PNG and persist it. The format is always PNG
/// regardless of the destination path's extension; no compression or
/// format options are exposed.
pub fn save_png(shot: &ScreenshotResult, path: &Path) -> Result<(), AutomationError> {
    let image = image::RgbaImage::from_raw(shot.width, shot.height, shot.image_data.clone())
        .ok_or_else(|| {
            AutomationError::Capture(format!(
                "pixel buffer does not match {}x{} RGBA",
                shot.width, shot.height
            ))
        })?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|e| AutomationError::Capture(format!("could not write {}: {e}", path.display())))
}

/// Capturer backed by `xcap`: grabs the monitor containing the
/// rectangle's origin (primary monitor as fallback) and crops.
#[derive(Default)]
pub struct MonitorCapturer;

impl MonitorCapturer {
    fn capture_error(e: impl std::fmt::Display) -> AutomationError {
        AutomationError::Capture(e.to_string())
    }
}

impl ScreenCapturer for MonitorCapturer {
    fn capture(&self, rect: ScreenRect) -> Result<ScreenshotResult, AutomationError> {
        let monitors = xcap::Monitor::all().map_err(Self::capture_error)?;

        let mut selected = None;
        for monitor in &monitors {
            let x = monitor.x().map_err(Self::capture_error)?;
            let y = monitor.y().map_err(Self::capture_error)?;
            let width = monitor.width().map_err(Self::capture_error)? as i32;
            let height = monitor.height().map_err(Self::capture_error)? as i32;
            let contains_origin = rect.x >= x
                && rect.x < x + width
                && rect.y >= y
                && rect.y < y + height;
            if contains_origin {
                selected = Some((monitor, x, y, width, height));
                break;
            }
            if selected.is_none() && monitor.is_primary().map_err(Self::capture_error)? {
                selected = Some((monitor, x, y, width, height));
            }
        }
        let (monitor, mx, my, mw, mh) = selected.ok_or_else(|| {
            AutomationError::Capture("no monitor available for capture".to_string())
        })?;

        let image = monitor.capture_image().map_err(Self::capture_error)?;

        // Clamp the requested rectangle to the monitor, in monitor-local
        // coordinates.
        let local_x = (rect.x - mx).clamp(0, mw);
        let local_y = (rect.y - my).clamp(0, mh);
        let width = rect.width.min(mw - local_x);
        let height = rect.height.min(mh - local_y);
        if width <= 0 || height <= 0 {
            return Err(AutomationError::Capture(format!(
                "capture rectangle {rect:?} lies outside the monitor"
            )));
        }

        debug!(?rect, local_x, local_y, width, height, "cropping monitor capture");
        let cropped = image::imageops::crop_imm(
            &image,
            local_x as u32,
            local_y as u32,
            width as u32,
            height as u32,
        )
        .to_image();

        Ok(ScreenshotResult {
            width: cropped.width(),
            height: cropped.height(),
            image_data: cropped.into_raw(),
        })
    }
}
