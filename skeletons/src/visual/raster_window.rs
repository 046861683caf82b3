// Copyright (c) 2024 Marc Pabst
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

use renderer::colors::RGBA;
use renderer::dots::DotField;
use renderer::prelude::{DynamicScene, Shape};
use renderer::raster_backend::RasterScene;
use renderer::{Backend, DynamicRenderer};
use web_time::{Duration, Instant};

use super::geometry::{MonitorProfile, Point};
use super::motion::MotionParams;
use super::window::{field_transform, to_scene_transform, RenderWindow, WindowOptions};
use crate::errors::SkeletonError;
use crate::input::{Event, EventVec};

/// An off-screen window backed by the raster renderer. Frames are paced to
/// the refresh rate and can be written to disk as PNG files.
pub struct RasterWindow {
    monitor: MonitorProfile,
    size: (u32, u32),
    renderer: DynamicRenderer,
    scene: DynamicScene,
    /// per-stimulus dot simulations, keyed by stimulus id
    dot_fields: HashMap<u32, DotField>,
    events: VecDeque<Event>,
    clock_start: Instant,
    last_flip: Option<Instant>,
    frame_interval: Duration,
    frames: u64,
    frame_dir: Option<PathBuf>,
    seed: u64,
    paced: bool,
    closed: bool,
}

impl std::fmt::Debug for RasterWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterWindow")
            .field("size", &self.size)
            .field("frames", &self.frames)
            .field("frame_dir", &self.frame_dir)
            .finish_non_exhaustive()
    }
}

impl RasterWindow {
    pub fn new(options: WindowOptions, monitor: MonitorProfile) -> Result<Self, SkeletonError> {
        options.validate(&monitor)?;

        let size = options.resolution(&monitor);
        let refresh_rate = options.refresh_rate();
        let frame_interval = options.frame_interval()?;
        let renderer = Backend::Raster.create_renderer();
        let mut scene = renderer.create_scene(size.0, size.1);
        scene.set_background_color(RGBA::GRAY);
        scene.clear();

        log::info!(
            "created {}x{} raster window at {} Hz for monitor '{}'",
            size.0,
            size.1,
            refresh_rate,
            monitor.name
        );

        Ok(Self {
            monitor,
            size,
            renderer,
            scene,
            dot_fields: HashMap::new(),
            events: VecDeque::new(),
            clock_start: Instant::now(),
            last_flip: None,
            frame_interval,
            frames: 0,
            frame_dir: None,
            seed: 0,
            paced: true,
            closed: false,
        })
    }

    /// Write every presented frame as `frame_NNNNNN.png` into `dir`.
    pub fn with_frame_dir<P: Into<PathBuf>>(mut self, dir: P) -> Result<Self, SkeletonError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            SkeletonError::WindowCreationError(format!("cannot create frame directory {}: {}", dir.display(), e))
        })?;
        self.frame_dir = Some(dir);
        Ok(self)
    }

    /// Seed for the dot field simulations.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// When disabled, `flip` returns immediately instead of waiting for the
    /// next frame.
    pub fn with_pacing(mut self, paced: bool) -> Self {
        self.paced = paced;
        self
    }

    /// Queue an input event, to be returned by the next poll.
    pub fn push_event(&mut self, event: Event) {
        self.events.push_back(event);
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Color of the back buffer at pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<RGBA> {
        if x >= self.size.0 || y >= self.size.1 {
            return None;
        }
        self.scene.try_as::<RasterScene>().map(|s| s.pixel(x, y))
    }

    /// Write the back buffer to `path`.
    pub fn save_frame(&self, path: &Path) -> Result<(), SkeletonError> {
        self.renderer.save_frame(&self.scene, path)?;
        Ok(())
    }

    fn wait_for_next_frame(&mut self) {
        if let Some(last) = self.last_flip {
            let target = last + self.frame_interval;
            let now = Instant::now();
            if target > now {
                spin_sleep::sleep(target - now);
            }
        }
        self.last_flip = Some(Instant::now());
    }
}

impl RenderWindow for RasterWindow {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn monitor(&self) -> &MonitorProfile {
        &self.monitor
    }

    fn draw_disc(&mut self, center: Point, radius: f64, edges: u32, color: RGBA, opacity: f64) {
        let shape = Shape::Circle {
            center: renderer::shapes::Point::new(0.0, 0.0),
            radius,
            edges,
        };
        let transform = to_scene_transform(center, 0.0, self.size);
        self.scene.draw_shape_fill(shape, color, Some(transform), opacity as f32);
    }

    fn draw_rect(&mut self, center: Point, width: f64, height: f64, orientation: f64, color: RGBA, opacity: f64) {
        let shape = Shape::centered_rectangle(width, height);
        let transform = to_scene_transform(center, orientation, self.size);
        self.scene.draw_shape_fill(shape, color, Some(transform), opacity as f32);
    }

    fn draw_dot_field(&mut self, field_id: u32, params: &MotionParams) {
        let params = params.to_dot_field_params(&self.monitor);
        let seed = self.seed.wrapping_add(field_id as u64);

        let field = self
            .dot_fields
            .entry(field_id)
            .or_insert_with(|| DotField::new(params.clone(), seed));
        if field.params() != &params {
            log::debug!("dot field {} parameters changed, restarting simulation", field_id);
            *field = DotField::new(params, seed);
        }

        field.update();
        field.draw(self.scene.0.as_mut(), field_transform(self.size));
    }

    fn poll_events(&mut self) -> Result<EventVec, SkeletonError> {
        if self.closed {
            return Err(SkeletonError::InputPollError("window is closed".to_string()));
        }
        Ok(self.events.drain(..).collect::<Vec<_>>().into())
    }

    fn clear_events(&mut self) {
        self.events.clear();
    }

    fn now(&self) -> f64 {
        self.clock_start.elapsed().as_secs_f64()
    }

    fn reset_clock(&mut self) {
        self.clock_start = Instant::now();
    }

    fn flip(&mut self) -> Result<(), SkeletonError> {
        if let Some(dir) = &self.frame_dir {
            let path = dir.join(format!("frame_{:06}.png", self.frames));
            self.renderer.save_frame(&self.scene, &path)?;
        }

        if self.paced {
            self.wait_for_next_frame();
        }

        self.frames += 1;
        self.scene.clear();
        Ok(())
    }

    fn close(&mut self) {
        if !self.closed {
            log::info!("closing raster window after {} frames", self.frames);
        }
        self.closed = true;
        self.dot_fields.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Key;

    fn window(size: u32) -> RasterWindow {
        RasterWindow::new(
            WindowOptions::Windowed {
                resolution: Some((size, size)),
                refresh_rate: Some(1000.0),
            },
            MonitorProfile::default(),
        )
        .unwrap()
        .with_pacing(false)
    }

    #[test]
    fn rectangle_orientation_is_respected() {
        let mut w = window(100);
        w.draw_rect(Point::ORIGIN, 40.0, 10.0, 0.0, RGBA::WHITE, 1.0);
        assert_eq!(w.pixel(65, 50), Some(RGBA::WHITE));
        assert_eq!(w.pixel(50, 65).map(|c| c.to_rgba8()), Some(RGBA::GRAY.to_rgba8()));

        w.flip().unwrap();
        w.draw_rect(Point::ORIGIN, 40.0, 10.0, 90.0, RGBA::WHITE, 1.0);
        assert_eq!(w.pixel(50, 65), Some(RGBA::WHITE));
        assert_eq!(w.pixel(65, 50).map(|c| c.to_rgba8()), Some(RGBA::GRAY.to_rgba8()));
    }

    #[test]
    fn positive_y_is_up() {
        let mut w = window(100);
        w.draw_disc(Point::new(0.0, 30.0), 5.0, 32, RGBA::WHITE, 1.0);
        assert_eq!(w.pixel(50, 20), Some(RGBA::WHITE));
        assert_ne!(w.pixel(50, 80), Some(RGBA::WHITE));
    }

    #[test]
    fn opacity_is_clamped_when_compositing() {
        let mut w = window(20);
        w.draw_disc(Point::ORIGIN, 5.0, 32, RGBA::WHITE, 3.0);
        assert_eq!(w.pixel(10, 10), Some(RGBA::WHITE));

        w.flip().unwrap();
        w.draw_disc(Point::ORIGIN, 5.0, 32, RGBA::WHITE, -1.0);
        assert_eq!(w.pixel(10, 10).map(|c| c.to_rgba8()), Some(RGBA::GRAY.to_rgba8()));
    }

    #[test]
    fn dot_fields_persist_between_frames() {
        let mut w = window(200).with_seed(7);
        let params = MotionParams {
            units: crate::visual::geometry::Units::Pixels,
            field_size: (100.0, 100.0),
            ..Default::default()
        };
        w.draw_dot_field(10, &params);
        w.flip().unwrap();
        w.draw_dot_field(10, &params);
        assert_eq!(w.dot_fields[&10].frame(), 2);
        assert_eq!(w.dot_fields.len(), 1);
    }

    #[test]
    fn injected_events_are_polled_once() {
        let mut w = window(10);
        w.push_event(Event::KeyPress {
            key: Key::Escape,
            timestamp: 0.0,
        });
        assert!(w.poll_events().unwrap().key_pressed(Key::Escape));
        assert!(w.poll_events().unwrap().is_empty());

        w.close();
        assert!(w.poll_events().is_err());
    }

    #[test]
    fn frames_are_written_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let mut w = window(16).with_frame_dir(dir.path()).unwrap();
        w.flip().unwrap();
        w.flip().unwrap();
        assert!(dir.path().join("frame_000000.png").exists());
        assert!(dir.path().join("frame_000001.png").exists());
        assert_eq!(w.frame_count(), 2);
    }

    #[test]
    fn zero_sized_window_fails() {
        let result = RasterWindow::new(
            WindowOptions::Windowed {
                resolution: Some((0, 0)),
                refresh_rate: None,
            },
            MonitorProfile::default(),
        );
        assert!(matches!(result, Err(SkeletonError::WindowCreationError(_))));
    }

    #[test]
    fn vanishing_refresh_rate_fails() {
        let result = RasterWindow::new(
            WindowOptions::Windowed {
                resolution: Some((16, 16)),
                refresh_rate: Some(1e-30),
            },
            MonitorProfile::default(),
        );
        assert!(matches!(result, Err(SkeletonError::WindowCreationError(_))));
    }
}
