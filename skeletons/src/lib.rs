// Copyright (c) 2024 Marc Pabst
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Skeleton shape stimuli for vision experiments: trees of points drawn as
//! discs and oriented bars, a random-dot motion stimulus, and a scheduler
//! that cycles through them in on/off intervals while logging every frame.

pub mod catalog;
pub mod errors;
pub mod experiment;
pub mod input;
pub mod logging;
pub mod options;
pub mod visual;

// re-export the renderer
pub use renderer;

pub mod prelude {
    pub use super::catalog::{build_catalog, build_shapes, motion_stimulus, sketches};
    pub use super::errors::SkeletonError;
    pub use super::experiment::{Experiment, FrameState, IntervalScheduler, RunSummary};
    pub use super::input::{Event, EventVec, Key};
    pub use super::logging::{LogRecord, StimulusLog};
    pub use super::options::{AdvanceMode, ExperimentOptions};
    pub use super::visual::geometry::{length, midpoint, orientation, MonitorProfile, Point, Units};
    pub use super::visual::motion::{MotionParams, MotionStim};
    pub use super::visual::raster_window::RasterWindow;
    pub use super::visual::recording::RecordingWindow;
    pub use super::visual::skeleton::{Primitive, SkeletonNode, SkeletonStim};
    pub use super::visual::stimuli::{Stimulus, StimulusType};
    pub use super::visual::window::{RenderWindow, WindowOptions};
}
