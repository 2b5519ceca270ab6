// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Contains the CommandedState type which is produced on the "state" output.
use serde::Deserialize;
use serde::Serialize;

use crate::utils::{stack, VectorN};

/// Commanded position and velocity for each joint and finger.
///
/// Both vectors hold the arm joints first and the fingers afterwards.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CommandedState {
    num_joints: usize,
    /// Commanded positions. Unit: \[rad\]
    pub position: VectorN,
    /// Commanded velocities. Unit: \[rad/s\]
    pub velocity: VectorN,
}

impl CommandedState {
    pub(crate) fn new(num_joints: usize, position: VectorN, velocity: VectorN) -> Self {
        debug_assert_eq!(position.len(), velocity.len());
        CommandedState {
            num_joints,
            position,
            velocity,
        }
    }

    /// Number of arm joints.
    pub fn num_joints(&self) -> usize {
        self.num_joints
    }

    /// Number of fingers.
    pub fn num_fingers(&self) -> usize {
        self.position.len() - self.num_joints
    }

    /// Flat vector of size 2N: positions followed by velocities.
    pub fn to_vector(&self) -> VectorN {
        stack(&self.position, &self.velocity)
    }

    pub fn joint_position(&self) -> &[f64] {
        &self.position.as_slice()[..self.num_joints]
    }

    pub fn finger_position(&self) -> &[f64] {
        &self.position.as_slice()[self.num_joints..]
    }

    pub fn joint_velocity(&self) -> &[f64] {
        &self.velocity.as_slice()[..self.num_joints]
    }

    pub fn finger_velocity(&self) -> &[f64] {
        &self.velocity.as_slice()[self.num_joints..]
    }
}

#[cfg(test)]
mod tests {
    use crate::kinova_jaco::commanded_state::CommandedState;
    use crate::utils::VectorN;

    #[test]
    fn layout() {
        let state = CommandedState::new(
            2,
            VectorN::from_row_slice(&[1., 2., 3.]),
            VectorN::from_row_slice(&[4., 5., 6.]),
        );
        assert_eq!(state.num_joints(), 2);
        assert_eq!(state.num_fingers(), 1);
        assert_eq!(state.to_vector().as_slice(), &[1., 2., 3., 4., 5., 6.]);
        assert_eq!(state.joint_position(), &[1., 2.]);
        assert_eq!(state.finger_position(), &[3.]);
        assert_eq!(state.joint_velocity(), &[4., 5.]);
        assert_eq!(state.finger_velocity(), &[6.]);
    }
}
