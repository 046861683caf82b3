// Copyright (c) 2024 Marc Pabst
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Random-dot motion stimulus. The dot simulation itself lives in the
//! window; this module only carries the parameters.

use renderer::colors::RGBA;
use renderer::dots::{DotFieldParams, FieldShape, NoiseDots, SignalDots};

use super::geometry::{MonitorProfile, Units};
use super::stimuli::{Stimulus, StimulusType};
use super::window::RenderWindow;

/// Stimulus id of the motion stimulus in the catalog.
pub const MOTION_STIMULUS_ID: u32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct MotionParams {
    /// Units of `field_size` and `speed`.
    pub units: Units,
    pub coherence: f64,
    pub field_size: (f64, f64),
    pub color: RGBA,
    /// Dot diameter in pixels.
    pub dot_size: f64,
    /// Lifetime of a dot in frames.
    pub dot_life: i32,
    pub noise_dots: NoiseDots,
    pub signal_dots: SignalDots,
    /// Distance travelled per frame.
    pub speed: f64,
    pub n_dots: usize,
    pub field_shape: FieldShape,
    /// Direction of coherent motion in degrees, counter-clockwise from +x.
    pub direction: f64,
}

impl Default for MotionParams {
    fn default() -> Self {
        Self {
            units: Units::Degrees,
            coherence: 0.5,
            field_size: (50.0, 50.0),
            color: RGBA::from_signed(-1.0, -1.0, -1.0),
            dot_size: 10.0,
            dot_life: 20,
            noise_dots: NoiseDots::Direction,
            signal_dots: SignalDots::Same,
            speed: 0.01,
            n_dots: 200,
            field_shape: FieldShape::Circle,
            direction: 90.0,
        }
    }
}

impl MotionParams {
    /// Convert into dot field parameters in pixels for `monitor`.
    pub fn to_dot_field_params(&self, monitor: &MonitorProfile) -> DotFieldParams {
        DotFieldParams {
            coherence: self.coherence.clamp(0.0, 1.0),
            field_size: (
                monitor.to_pixels(self.field_size.0, self.units),
                monitor.to_pixels(self.field_size.1, self.units),
            ),
            field_shape: self.field_shape,
            dot_size: self.dot_size,
            dot_life: self.dot_life,
            noise_dots: self.noise_dots,
            signal_dots: self.signal_dots,
            speed: monitor.to_pixels(self.speed, self.units),
            n_dots: self.n_dots,
            direction: self.direction,
            color: self.color,
        }
    }
}

/// A field of moving dots.
#[derive(Debug, Clone)]
pub struct MotionStim {
    params: MotionParams,
    stimulus_id: u32,
}

impl MotionStim {
    pub fn new(params: MotionParams) -> Self {
        Self {
            params,
            stimulus_id: MOTION_STIMULUS_ID,
        }
    }

    pub fn params(&self) -> &MotionParams {
        &self.params
    }
}

impl Stimulus for MotionStim {
    fn draw(&mut self, window: &mut dyn RenderWindow) {
        window.draw_dot_field(self.stimulus_id, &self.params);
    }

    fn stimulus_id(&self) -> u32 {
        self.stimulus_id
    }

    fn stimulus_type(&self) -> StimulusType {
        StimulusType::Motion
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual::recording::{DrawCall, RecordingWindow};

    #[test]
    fn pixel_params_pass_through() {
        let params = MotionParams {
            units: Units::Pixels,
            speed: 2.0,
            field_size: (300.0, 200.0),
            ..Default::default()
        };
        let dots = params.to_dot_field_params(&MonitorProfile::default());
        assert_eq!(dots.field_size, (300.0, 200.0));
        assert_eq!(dots.speed, 2.0);
        assert_eq!(dots.n_dots, 200);
        assert_eq!(dots.dot_life, 20);
        assert_eq!(dots.color, RGBA::BLACK);
    }

    #[test]
    fn degree_params_are_scaled() {
        let monitor = MonitorProfile {
            name: "bench".to_string(),
            width_cm: 30.0,
            distance_cm: 15.0,
            size_px: (800, 800),
        };
        let dots = MotionParams::default().to_dot_field_params(&monitor);
        assert!((dots.field_size.0 - monitor.deg_to_pix(50.0)).abs() < 1e-9);
        assert!(dots.speed > 0.0 && dots.speed < 1.0);
    }

    #[test]
    fn opacity_is_ignored_and_draw_forwards() {
        let mut stim = MotionStim::new(MotionParams::default());
        stim.set_opacity(0.0);
        stim.change_opacity(0.5);
        assert_eq!(stim.params(), &MotionParams::default());
        assert_eq!(stim.stimulus_id(), 10);
        assert_eq!(stim.stimulus_type(), StimulusType::Motion);

        let mut window = RecordingWindow::new((800, 800), 60.0);
        stim.draw(&mut window);
        assert_eq!(window.draw_calls(), &[DrawCall::DotField { field_id: 10 }]);
    }
}
