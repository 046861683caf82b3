// Copyright (c) 2024 Marc Pabst
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::ops::{Deref, DerefMut};

use strum::{Display, EnumString};

/// Keys the experiment cares about. Anything else is reported as `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Key {
    Escape,
    Space,
    Return,
    Q,
    Other,
}

/// An input event reported by a window.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    KeyPress { key: Key, timestamp: f64 },
    KeyRelease { key: Key, timestamp: f64 },
}

impl Event {
    /// Seconds on the window clock at which the event happened.
    pub fn timestamp(&self) -> f64 {
        match self {
            Event::KeyPress { timestamp, .. } | Event::KeyRelease { timestamp, .. } => *timestamp,
        }
    }
}

/// The events collected since the last poll.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventVec(Vec<Event>);

impl Deref for EventVec {
    type Target = Vec<Event>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for EventVec {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl From<Vec<Event>> for EventVec {
    fn from(events: Vec<Event>) -> Self {
        EventVec(events)
    }
}

impl IntoIterator for EventVec {
    type Item = Event;
    type IntoIter = std::vec::IntoIter<Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl EventVec {
    /// Check if the given key was pressed.
    pub fn key_pressed(&self, key: Key) -> bool {
        self.0
            .iter()
            .any(|e| matches!(e, Event::KeyPress { key: k, .. } if *k == key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_pressed_ignores_releases() {
        let events: EventVec = vec![
            Event::KeyRelease {
                key: Key::Space,
                timestamp: 0.1,
            },
            Event::KeyPress {
                key: Key::Escape,
                timestamp: 0.2,
            },
        ]
        .into();

        assert!(events.key_pressed(Key::Escape));
        assert!(!events.key_pressed(Key::Space));
        assert_eq!(events[1].timestamp(), 0.2);
    }

    #[test]
    fn keys_parse_from_names() {
        assert_eq!("escape".parse::<Key>().unwrap(), Key::Escape);
        assert_eq!(Key::Return.to_string(), "return");
    }
}
