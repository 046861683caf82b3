// Copyright (c) 2024 Marc Pabst
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

pub mod geometry;
pub mod motion;
pub mod raster_window;
pub mod recording;
pub mod skeleton;
pub mod stimuli;
pub mod window;
