// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Contains the ReceiverContext type which holds the inputs and the state of a
//! [`JacoCommandReceiver`](`crate::JacoCommandReceiver`).
use std::cell::OnceCell;

use crate::exception::JacoResult;
use crate::kinova_jaco::jaco_command::{GroomedCommand, JacoCommand};
use crate::kinova_jaco::jaco_command_receiver::POSITION_MEASURED_INPUT_PORT;
use crate::utils::{check_size, VectorN};

/// Input values, latched state and cached derived values of one receiver.
///
/// Create it with [`JacoCommandReceiver::create_default_context`](`crate::JacoCommandReceiver::create_default_context`).
/// Every input setter invalidates the cached values which depend on that input, so the cached
/// values are only recomputed when the corresponding input changed.
#[derive(Debug, Clone)]
pub struct ReceiverContext {
    num_joints: usize,
    num_fingers: usize,
    time: f64,
    message: Option<JacoCommand>,
    position_measured: Option<VectorN>,
    latched_position_measured_is_set: bool,
    latched_position_measured: VectorN,
    groomed_input: OnceCell<GroomedCommand>,
    position_measured_or_zero: OnceCell<VectorN>,
}

impl ReceiverContext {
    pub(crate) fn new(num_joints: usize, num_fingers: usize) -> Self {
        ReceiverContext {
            num_joints,
            num_fingers,
            time: 0.,
            message: None,
            position_measured: None,
            latched_position_measured_is_set: false,
            latched_position_measured: VectorN::zeros(num_joints + num_fingers),
            groomed_input: OnceCell::new(),
            position_measured_or_zero: OnceCell::new(),
        }
    }

    pub fn num_joints(&self) -> usize {
        self.num_joints
    }

    pub fn num_fingers(&self) -> usize {
        self.num_fingers
    }

    /// Number of joints plus number of fingers.
    pub fn num_positions(&self) -> usize {
        self.num_joints + self.num_fingers
    }

    /// Current time in \[s\].
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn set_time(&mut self, time: f64) {
        self.time = time;
    }

    /// Sets the value of the "lcmt_jaco_command" input.
    ///
    /// # Errors
    /// * [`SizeMismatchError`](`crate::exception::JacoException::SizeMismatchError`) if one of
    /// the message arrays does not match the number of joints or fingers. The previous input
    /// value is kept in that case.
    pub fn fix_message_input(&mut self, message: JacoCommand) -> JacoResult<()> {
        message.check_size(self.num_joints, self.num_fingers)?;
        self.message = Some(message);
        self.groomed_input = OnceCell::new();
        Ok(())
    }

    /// Disconnects the "lcmt_jaco_command" input, which is treated like no message.
    pub fn clear_message_input(&mut self) {
        self.message = None;
        self.groomed_input = OnceCell::new();
    }

    /// Sets the value of the "position_measured" input.
    ///
    /// # Errors
    /// * [`SizeMismatchError`](`crate::exception::JacoException::SizeMismatchError`) if
    /// `position` does not hold one entry per joint and finger. The previous input value is
    /// kept in that case.
    pub fn fix_position_measured_input(&mut self, position: &[f64]) -> JacoResult<()> {
        check_size(POSITION_MEASURED_INPUT_PORT, self.num_positions(), position)?;
        self.position_measured = Some(VectorN::from_row_slice(position));
        self.position_measured_or_zero = OnceCell::new();
        Ok(())
    }

    /// Disconnects the "position_measured" input, which is treated like all zero.
    pub fn clear_position_measured_input(&mut self) {
        self.position_measured = None;
        self.position_measured_or_zero = OnceCell::new();
    }

    pub fn message_input(&self) -> Option<&JacoCommand> {
        self.message.as_ref()
    }

    pub fn position_measured_input(&self) -> Option<&VectorN> {
        self.position_measured.as_ref()
    }

    /// Whether the initial position has been latched.
    pub fn is_latched(&self) -> bool {
        self.latched_position_measured_is_set
    }

    /// The latched initial position, if it has been latched.
    pub fn latched_position(&self) -> Option<&VectorN> {
        if self.latched_position_measured_is_set {
            Some(&self.latched_position_measured)
        } else {
            None
        }
    }

    pub(crate) fn latch(&mut self, position: VectorN) {
        debug_assert_eq!(position.len(), self.num_positions());
        self.latched_position_measured = position;
        self.latched_position_measured_is_set = true;
    }

    pub(crate) fn groomed_input_cache(&self) -> &OnceCell<GroomedCommand> {
        &self.groomed_input
    }

    pub(crate) fn position_measured_or_zero_cache(&self) -> &OnceCell<VectorN> {
        &self.position_measured_or_zero
    }
}
