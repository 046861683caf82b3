// Copyright (c) 2024 Marc Pabst
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use web_time::Duration;

use renderer::affine::Affine;
use renderer::colors::RGBA;

use super::geometry::{MonitorProfile, Point};
use super::motion::MotionParams;
use crate::errors::SkeletonError;
use crate::input::EventVec;

/// Options for creating a window.
#[derive(Debug, Clone, PartialEq)]
pub enum WindowOptions {
    Windowed {
        /// The width and height of the window in pixels. Defaults to 800x600
        /// (px).
        resolution: Option<(u32, u32)>,
        /// The refresh rate to use in Hz. Defaults to 60 Hz.
        refresh_rate: Option<f64>,
    },
    /// Cover the whole monitor at its native resolution.
    Fullscreen {
        /// The refresh rate to use in Hz. Defaults to 60 Hz.
        refresh_rate: Option<f64>,
    },
}

impl Default for WindowOptions {
    fn default() -> Self {
        WindowOptions::Windowed {
            resolution: None,
            refresh_rate: None,
        }
    }
}

impl WindowOptions {
    pub const DEFAULT_RESOLUTION: (u32, u32) = (800, 600);
    pub const DEFAULT_REFRESH_RATE: f64 = 60.0;

    /// Size of the drawing surface in pixels.
    pub fn resolution(&self, monitor: &MonitorProfile) -> (u32, u32) {
        match self {
            WindowOptions::Windowed { resolution, .. } => resolution.unwrap_or(Self::DEFAULT_RESOLUTION),
            WindowOptions::Fullscreen { .. } => monitor.size_px,
        }
    }

    pub fn refresh_rate(&self) -> f64 {
        match self {
            WindowOptions::Windowed { refresh_rate, .. } | WindowOptions::Fullscreen { refresh_rate } => {
                refresh_rate.unwrap_or(Self::DEFAULT_REFRESH_RATE)
            }
        }
    }

    /// Check that a window can be created with these options.
    pub fn validate(&self, monitor: &MonitorProfile) -> Result<(), SkeletonError> {
        let (width, height) = self.resolution(monitor);
        if width == 0 || height == 0 {
            return Err(SkeletonError::WindowCreationError(format!(
                "resolution must be non-zero, got {}x{}",
                width, height
            )));
        }
        self.frame_interval()?;
        Ok(())
    }

    /// Time between two flips at the requested refresh rate.
    pub fn frame_interval(&self) -> Result<Duration, SkeletonError> {
        let refresh_rate = self.refresh_rate();
        if !(refresh_rate > 0.0 && refresh_rate.is_finite()) {
            return Err(SkeletonError::WindowCreationError(format!(
                "refresh rate must be positive, got {}",
                refresh_rate
            )));
        }
        Duration::try_from_secs_f64(1.0 / refresh_rate).map_err(|e| {
            SkeletonError::WindowCreationError(format!("refresh rate {} is out of range: {}", refresh_rate, e))
        })
    }
}

/// A window that stimuli draw into. Positions are given in the stimulus
/// plane (origin at the center, y up, pixels) and orientations in degrees,
/// clockwise-positive, with 0° along +x.
pub trait RenderWindow {
    /// Width and height of the drawing surface in pixels.
    fn size(&self) -> (u32, u32);
    fn monitor(&self) -> &MonitorProfile;
    fn draw_disc(&mut self, center: Point, radius: f64, edges: u32, color: RGBA, opacity: f64);
    /// Draw a rectangle of `width` x `height` centered on `center`, with its
    /// `width` side rotated by `orientation` degrees.
    fn draw_rect(&mut self, center: Point, width: f64, height: f64, orientation: f64, color: RGBA, opacity: f64);
    /// Advance and draw the dot field identified by `field_id`. The window
    /// keeps the per-dot state between frames.
    fn draw_dot_field(&mut self, field_id: u32, params: &MotionParams);
    /// Return the events received since the last call.
    fn poll_events(&mut self) -> Result<EventVec, SkeletonError>;
    /// Drop any pending events.
    fn clear_events(&mut self);
    /// Seconds since the last call to `reset_clock` (or window creation).
    fn now(&self) -> f64;
    fn reset_clock(&mut self);
    /// Present the back buffer and wait for the next frame.
    fn flip(&mut self) -> Result<(), SkeletonError>;
    fn close(&mut self);
}

/// Maps a primitive placed at `center` and rotated by `orientation` onto
/// scene pixels of a `size` surface (origin top left, y down).
///
/// Clockwise in the y-up stimulus plane stays clockwise on screen, which is
/// a positive angle for the y-down scene.
pub fn to_scene_transform(center: Point, orientation: f64, size: (u32, u32)) -> Affine {
    let p = to_scene_point(center, size);
    Affine::rotate(orientation) * Affine::translate(p.x, p.y)
}

pub fn to_scene_point(p: Point, size: (u32, u32)) -> renderer::shapes::Point {
    renderer::shapes::Point::new(size.0 as f64 / 2.0 + p.x, size.1 as f64 / 2.0 - p.y)
}

/// Maps field coordinates (y up, origin at the window center) onto scene
/// pixels without rotation.
pub fn field_transform(size: (u32, u32)) -> Affine {
    Affine::scale_xy(1.0, -1.0) * Affine::translate(size.0 as f64 / 2.0, size.1 as f64 / 2.0)
}
