// Copyright (c) 2024 Marc Pabst
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::window::RenderWindow;

/// Kind of a stimulus, as written to the stimulus log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum StimulusType {
    Shape,
    Motion,
}

/// The stimulus trait.
pub trait Stimulus: std::fmt::Debug + Send + Sync + downcast_rs::Downcast + dyn_clone::DynClone {
    /// Draw the stimulus into the window's back buffer.
    fn draw(&mut self, window: &mut dyn RenderWindow);
    /// Identifier written to the stimulus log.
    fn stimulus_id(&self) -> u32;
    fn stimulus_type(&self) -> StimulusType;
    /// Set the opacity of the stimulus. Does nothing by default.
    fn set_opacity(&mut self, _opacity: f64) {
        // do nothing by default
    }
    /// Add `delta` to the current opacity. Does nothing by default.
    fn change_opacity(&mut self, _delta: f64) {
        // do nothing by default
    }
}
downcast_rs::impl_downcast!(Stimulus);
dyn_clone::clone_trait_object!(Stimulus);
