// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Traits for the producers of the two receiver inputs.
#[cfg(test)]
use mockall::automock;

use crate::kinova_jaco::jaco_command::JacoCommand;

/// Supplies decoded lcmt_jaco_command messages, e.g. from an LCM subscriber.
#[cfg_attr(test, automock)]
pub trait CommandSource {
    /// The most recently received message, or None if nothing has been received yet.
    fn latest_message(&mut self) -> Option<JacoCommand>;
}

/// Supplies the measured position of all joints and fingers.
#[cfg_attr(test, automock)]
pub trait PositionMeasuredSource {
    /// Measured joint positions followed by finger positions, or None while no measurement is
    /// available.
    fn position_measured(&mut self) -> Option<Vec<f64>>;
}
