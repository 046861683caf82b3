// Copyright (c) 2024 Marc Pabst
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SkeletonError {
    // file errors
    #[error("{0}")]
    IOError(#[from] std::io::Error),
    #[error("File already exists and is not empty: {0}")]
    FileExistsAndNotEmptyError(String),

    // stimulus log errors
    #[error("The column names provided need to be unique")]
    ColumnNamesNotUniqueError,
    #[error("The length of the data ({0}) does not match the length of the column names ({1}).")]
    DataLengthMismatchError(usize, usize),
    #[error("{0}")]
    CSVError(#[from] csv::Error),

    // window errors
    #[error("Could not create window: {0}")]
    WindowCreationError(String),
    #[error("Failed to poll input events: {0}")]
    InputPollError(String),
    #[error("{0}")]
    ImageError(#[from] renderer::image::ImageError),

    // experiment setup errors
    #[error("Invalid experiment configuration: {0}")]
    InvalidConfigError(String),
    #[error("The stimulus catalog is empty.")]
    EmptyCatalogError,
    #[error("No stimulus with id {0} in the catalog.")]
    UnknownStimulusError(u32),
}

