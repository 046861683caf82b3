// Copyright (c) 2024 Marc Pabst
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Session control: which stimulus is active and whether it is visible on a
//! given frame, and the frame loop driving a window.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::catalog::build_catalog;
use crate::errors::SkeletonError;
use crate::logging::{FrameStats, LogRecord, StimulusLog};
use crate::options::{AdvanceMode, ExperimentOptions};
use crate::visual::stimuli::Stimulus;
use crate::visual::window::RenderWindow;

/// What the scheduler decided for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameState {
    /// Index of the active stimulus.
    pub index: usize,
    /// Whether the active stimulus is drawn.
    pub visible: bool,
    /// Whether the index changed on this frame.
    pub advanced: bool,
    /// Time since the start of the current interval.
    pub interval_time: f64,
}

/// Cycles through `n` stimuli in on/off intervals.
#[derive(Debug, Clone)]
pub struct IntervalScheduler {
    duration_on: f64,
    duration_off: f64,
    n: usize,
    mode: AdvanceMode,
    index: usize,
    last_interval_time: f64,
    completed: u64,
}

impl IntervalScheduler {
    pub fn new(duration_on: f64, duration_off: f64, n: usize, mode: AdvanceMode) -> Result<Self, SkeletonError> {
        if n == 0 {
            return Err(SkeletonError::EmptyCatalogError);
        }
        if !(duration_on > 0.0 && duration_off >= 0.0) {
            return Err(SkeletonError::InvalidConfigError(format!(
                "invalid interval durations: on {}, off {}",
                duration_on, duration_off
            )));
        }
        Ok(Self {
            duration_on,
            duration_off,
            n,
            mode,
            index: 0,
            last_interval_time: 0.0,
            completed: 0,
        })
    }

    pub fn interval_length(&self) -> f64 {
        self.duration_on + self.duration_off
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Advance the schedule to time `t` (seconds since the session started).
    /// Times are expected to be non-decreasing.
    pub fn tick(&mut self, t: f64) -> FrameState {
        let interval_length = self.interval_length();
        let interval_time = t.rem_euclid(interval_length);

        let advanced = match self.mode {
            AdvanceMode::EdgeTriggered => {
                let edge = self.last_interval_time.ceil() == interval_length && interval_time.floor() == 0.0;
                if edge {
                    self.index = (self.index + 1) % self.n;
                }
                edge
            }
            AdvanceMode::IntervalCount => {
                let completed = (t / interval_length).floor().max(0.0) as u64;
                let changed = completed != self.completed;
                self.completed = completed;
                self.index = (completed % self.n as u64) as usize;
                changed
            }
        };
        self.last_interval_time = interval_time;

        FrameState {
            index: self.index,
            visible: interval_time < self.duration_on,
            advanced,
            interval_time,
        }
    }
}

/// Outcome of [`Experiment::run`].
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    /// Seconds between the start of the session and the last frame.
    pub elapsed: f64,
    /// True if the session ended because of an input event.
    pub stopped_by_input: bool,
    pub frame_stats: Option<FrameStats>,
}

/// A session showing a list of stimuli in turn.
#[derive(Debug)]
pub struct Experiment {
    options: ExperimentOptions,
    stimuli: Vec<Box<dyn Stimulus>>,
}

impl Experiment {
    /// Create a session over `stimuli`, shuffled once if `options.random`
    /// is set.
    pub fn new(options: ExperimentOptions, mut stimuli: Vec<Box<dyn Stimulus>>) -> Result<Self, SkeletonError> {
        options.validate()?;
        if stimuli.is_empty() {
            return Err(SkeletonError::EmptyCatalogError);
        }

        if options.random {
            let seed = options.seed.unwrap_or_else(rand::random);
            log::info!("shuffling {} stimuli with seed {}", stimuli.len(), seed);
            stimuli.shuffle(&mut StdRng::seed_from_u64(seed));
        }

        Ok(Self { options, stimuli })
    }

    /// A session over the full catalog.
    pub fn from_catalog(options: ExperimentOptions) -> Result<Self, SkeletonError> {
        let catalog = build_catalog(options.thickness);
        Self::new(options, catalog)
    }

    pub fn options(&self) -> &ExperimentOptions {
        &self.options
    }

    pub fn stimuli(&self) -> &[Box<dyn Stimulus>] {
        &self.stimuli
    }

    /// Stimulus ids in presentation order.
    pub fn order(&self) -> Vec<u32> {
        self.stimuli.iter().map(|s| s.stimulus_id()).collect()
    }

    /// Run the frame loop until the session duration has passed or any input
    /// event arrives. The frame on which either is noticed is still drawn
    /// and logged. The window is closed afterwards.
    pub fn run(&mut self, window: &mut dyn RenderWindow, log: &mut StimulusLog) -> Result<RunSummary, SkeletonError> {
        let mut scheduler = IntervalScheduler::new(
            self.options.duration_on,
            self.options.duration_off,
            self.stimuli.len(),
            self.options.advance_mode,
        )?;
        let fade_step = self.options.fade_step;

        log::info!(
            "starting session: {} stimuli, {} s on, {} s off, {} s total",
            self.stimuli.len(),
            self.options.duration_on,
            self.options.duration_off,
            self.options.duration
        );

        if fade_step.is_some() {
            self.stimuli[scheduler.index()].set_opacity(0.0);
        }

        window.reset_clock();
        let start = window.now();
        let mut active = true;
        let mut stopped_by_input = false;
        let mut frame: u64 = 0;
        let mut times = Vec::new();

        while active {
            if window.now() - start >= self.options.duration {
                active = false;
            }

            let events = window.poll_events()?;
            if !events.is_empty() {
                log::info!("stopping session after input: {:?}", events.first());
                stopped_by_input = true;
                active = false;
            }
            window.clear_events();

            let time = window.now() - start;
            let state = scheduler.tick(time);
            let stimulus = &mut self.stimuli[state.index];

            if state.advanced {
                log::debug!("frame {}: switching to stimulus {}", frame, stimulus.stimulus_id());
                if fade_step.is_some() {
                    stimulus.set_opacity(0.0);
                }
            }
            if let Some(step) = fade_step {
                stimulus.change_opacity(step);
            }

            if state.visible {
                stimulus.draw(window);
            }

            window.flip()?;

            log.push(LogRecord {
                time,
                frame,
                stimulus_shown: state.visible,
                stimulus_id: stimulus.stimulus_id(),
                stimulus_type: stimulus.stimulus_type(),
            })?;
            times.push(time);

            frame += 1;
        }

        log.flush()?;
        window.close();

        let summary = RunSummary {
            frames: frame,
            elapsed: times.last().copied().unwrap_or(0.0),
            stopped_by_input,
            frame_stats: FrameStats::from_times(times),
        };

        match &summary.frame_stats {
            Some(stats) => log::info!("session finished: {}", stats),
            None => log::info!("session finished after {} frame(s)", summary.frames),
        }

        Ok(summary)
    }
}
