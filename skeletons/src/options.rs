// Copyright (c) 2024 Marc Pabst
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use strum::{Display, EnumString};

use crate::errors::SkeletonError;

/// Options for an experiment session.
#[derive(Debug, Clone, PartialEq)]
pub struct ExperimentOptions {
    /// Line thickness of the skeletons in pixels. Also the dot size of the
    /// motion stimulus.
    pub thickness: f64,

    /// Seconds a stimulus is shown at the start of each interval.
    pub duration_on: f64,

    /// Seconds of blank screen that follow.
    pub duration_off: f64,

    /// Shuffle the catalog once before the session starts.
    pub random: bool,

    /// Seed for the shuffle. A random seed is drawn when `None`.
    pub seed: Option<u64>,

    /// Length of the session in seconds.
    pub duration: f64,

    /// How the scheduler decides when to move to the next stimulus.
    pub advance_mode: AdvanceMode,

    /// Opacity added to the active stimulus on every frame. When set, each
    /// new stimulus starts fully transparent and fades in.
    pub fade_step: Option<f64>,
}

/// How the scheduler decides that an interval is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum AdvanceMode {
    /// Advance when the previous frame was in the last second of the
    /// interval and the current frame is in its first second. Only reliable
    /// for whole-second intervals sampled at a steady frame rate.
    EdgeTriggered,
    /// Derive the index from the number of completed intervals.
    #[default]
    IntervalCount,
}

impl Default for ExperimentOptions {
    fn default() -> Self {
        Self {
            thickness: 10.0,
            duration_on: 1.0,
            duration_off: 1.0,
            random: true,
            seed: None,
            duration: 300.0,
            advance_mode: AdvanceMode::IntervalCount,
            fade_step: None,
        }
    }
}

impl ExperimentOptions {
    pub fn interval_length(&self) -> f64 {
        self.duration_on + self.duration_off
    }

    pub fn validate(&self) -> Result<(), SkeletonError> {
        let invalid = |msg: String| Err(SkeletonError::InvalidConfigError(msg));

        if !(self.thickness >= 0.0 && self.thickness.is_finite()) {
            return invalid(format!("thickness must be non-negative, got {}", self.thickness));
        }
        if !(self.duration_on > 0.0 && self.duration_on.is_finite()) {
            return invalid(format!("duration_on must be positive, got {}", self.duration_on));
        }
        if !(self.duration_off >= 0.0 && self.duration_off.is_finite()) {
            return invalid(format!("duration_off must be non-negative, got {}", self.duration_off));
        }
        if !(self.duration > 0.0) {
            return invalid(format!("session duration must be positive, got {}", self.duration));
        }
        if let Some(step) = self.fade_step {
            if !step.is_finite() {
                return invalid(format!("fade step must be finite, got {}", step));
            }
        }
        Ok(())
    }
}
