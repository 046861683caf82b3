// Copyright (c) 2024 Marc Pabst
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A window that records draw calls and runs on a simulated clock. Used for
//! dry runs and tests.

use std::collections::VecDeque;

use renderer::colors::RGBA;

use super::geometry::{MonitorProfile, Point};
use super::motion::MotionParams;
use super::window::RenderWindow;
use crate::errors::SkeletonError;
use crate::input::{Event, EventVec};

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Disc {
        center: Point,
        radius: f64,
        edges: u32,
        color: RGBA,
        opacity: f64,
    },
    Rect {
        center: Point,
        width: f64,
        height: f64,
        orientation: f64,
        color: RGBA,
        opacity: f64,
    },
    DotField {
        field_id: u32,
    },
}

#[derive(Debug)]
pub struct RecordingWindow {
    size: (u32, u32),
    monitor: MonitorProfile,
    frame_duration: f64,
    /// frames presented since creation
    flips: u64,
    clock_start: f64,
    pending: Vec<DrawCall>,
    frames: Vec<Vec<DrawCall>>,
    scheduled: VecDeque<Event>,
    closed: bool,
}

impl RecordingWindow {
    pub fn new(size: (u32, u32), refresh_rate: f64) -> Self {
        Self {
            size,
            monitor: MonitorProfile::default(),
            frame_duration: 1.0 / refresh_rate,
            flips: 0,
            clock_start: 0.0,
            pending: Vec::new(),
            frames: Vec::new(),
            scheduled: VecDeque::new(),
            closed: false,
        }
    }

    /// Deliver `event` by the first poll at or after its timestamp.
    pub fn schedule_event(&mut self, event: Event) {
        let at = event.timestamp();
        let index = self.scheduled.iter().position(|e| e.timestamp() > at).unwrap_or(self.scheduled.len());
        self.scheduled.insert(index, event);
    }

    /// Draw calls issued since the last flip.
    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.pending
    }

    /// Draw calls of every presented frame, oldest first.
    pub fn frames(&self) -> &[Vec<DrawCall>] {
        &self.frames
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn elapsed(&self) -> f64 {
        self.flips as f64 * self.frame_duration
    }
}

impl RenderWindow for RecordingWindow {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn monitor(&self) -> &MonitorProfile {
        &self.monitor
    }

    fn draw_disc(&mut self, center: Point, radius: f64, edges: u32, color: RGBA, opacity: f64) {
        self.pending.push(DrawCall::Disc {
            center,
            radius,
            edges,
            color,
            opacity,
        });
    }

    fn draw_rect(&mut self, center: Point, width: f64, height: f64, orientation: f64, color: RGBA, opacity: f64) {
        self.pending.push(DrawCall::Rect {
            center,
            width,
            height,
            orientation,
            color,
            opacity,
        });
    }

    fn draw_dot_field(&mut self, field_id: u32, _params: &MotionParams) {
        self.pending.push(DrawCall::DotField { field_id });
    }

    fn poll_events(&mut self) -> Result<EventVec, SkeletonError> {
        let now = self.now();
        let mut events = Vec::new();
        while self.scheduled.front().is_some_and(|e| e.timestamp() <= now) {
            events.extend(self.scheduled.pop_front());
        }
        Ok(events.into())
    }

    fn clear_events(&mut self) {
        let now = self.now();
        self.scheduled.retain(|e| e.timestamp() > now);
    }

    fn now(&self) -> f64 {
        self.elapsed() - self.clock_start
    }

    fn reset_clock(&mut self) {
        self.clock_start = self.elapsed();
    }

    fn flip(&mut self) -> Result<(), SkeletonError> {
        self.frames.push(std::mem::take(&mut self.pending));
        self.flips += 1;
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
