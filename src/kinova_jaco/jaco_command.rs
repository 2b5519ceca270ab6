// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Contains the lcmt_jaco_command message record and its groomed form.
use serde::Deserialize;
use serde::Serialize;

use crate::exception::JacoResult;
use crate::kinova_jaco::jaco_constants::FINGER_SDK_TO_URDF;
use crate::utils::{check_size, joints_then_fingers, VectorN};

/// A decoded lcmt_jaco_command message.
///
/// Finger values are in the units of the Kinova SDK. A default constructed message has a
/// `utime` of zero, which marks that no message has been received yet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct JacoCommand {
    /// Time at which the message was sent. Unit: \[us\]
    pub utime: i64,
    /// Commanded joint positions. Unit: \[rad\]
    pub joint_position: Vec<f64>,
    /// Commanded joint velocities. Unit: \[rad/s\]
    pub joint_velocity: Vec<f64>,
    /// Commanded finger positions in Kinova SDK units.
    pub finger_position: Vec<f64>,
    /// Commanded finger velocities in Kinova SDK units.
    pub finger_velocity: Vec<f64>,
}

impl JacoCommand {
    /// Creates a message with `utime` 0 and all values set to zero.
    pub fn new_zeroed(num_joints: usize, num_fingers: usize) -> Self {
        JacoCommand {
            utime: 0,
            joint_position: vec![0.; num_joints],
            joint_velocity: vec![0.; num_joints],
            finger_position: vec![0.; num_fingers],
            finger_velocity: vec![0.; num_fingers],
        }
    }

    /// Whether this message was actually received, i.e. it is not a default constructed one.
    pub fn is_valid(&self) -> bool {
        self.utime != 0
    }

    /// Checks every array of the message against the declared number of joints and fingers.
    ///
    /// # Errors
    /// * [`SizeMismatchError`](`crate::exception::JacoException::SizeMismatchError`) naming the
    /// first field with a wrong length.
    pub fn check_size(&self, num_joints: usize, num_fingers: usize) -> JacoResult<()> {
        check_size(
            "lcmt_jaco_command.joint_position",
            num_joints,
            &self.joint_position,
        )?;
        check_size(
            "lcmt_jaco_command.joint_velocity",
            num_joints,
            &self.joint_velocity,
        )?;
        check_size(
            "lcmt_jaco_command.finger_position",
            num_fingers,
            &self.finger_position,
        )?;
        check_size(
            "lcmt_jaco_command.finger_velocity",
            num_fingers,
            &self.finger_velocity,
        )
    }
}

/// The latest message after validation and unit translation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GroomedCommand {
    /// Whether a valid message has been received.
    pub received: bool,
    /// Joint positions followed by finger positions.
    pub position: VectorN,
    /// Joint velocities followed by finger velocities. Finger velocities are in the units of
    /// the finger joints, see [`FINGER_SDK_TO_URDF`].
    pub velocity: VectorN,
}

impl GroomedCommand {
    /// Grooms a message. A missing or invalid message results in zero position and velocity.
    ///
    /// The message must already have passed [`JacoCommand::check_size`].
    pub fn new(message: Option<&JacoCommand>, num_joints: usize, num_fingers: usize) -> Self {
        match message {
            Some(message) if message.is_valid() => {
                let finger_velocity: Vec<f64> = message
                    .finger_velocity
                    .iter()
                    .map(|v| v * FINGER_SDK_TO_URDF)
                    .collect();
                GroomedCommand {
                    received: true,
                    position: joints_then_fingers(
                        &message.joint_position,
                        &message.finger_position,
                    ),
                    velocity: joints_then_fingers(&message.joint_velocity, &finger_velocity),
                }
            }
            _ => GroomedCommand {
                received: false,
                position: VectorN::zeros(num_joints + num_fingers),
                velocity: VectorN::zeros(num_joints + num_fingers),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::exception::JacoException;
    use crate::kinova_jaco::jaco_command::{GroomedCommand, JacoCommand};
    use crate::kinova_jaco::jaco_constants::FINGER_SDK_TO_URDF;

    fn float_compare(a: f64, b: f64, thresh: f64) {
        assert!((a - b).abs() < thresh, "{} != {}", a, b);
    }

    fn message() -> JacoCommand {
        JacoCommand {
            utime: 12,
            joint_position: vec![0.1, 0.2],
            joint_velocity: vec![1.0, -1.0],
            finger_position: vec![3400., 6800., 0.],
            finger_velocity: vec![680., -680., 0.],
        }
    }

    #[test]
    fn default_message_is_not_valid() {
        assert!(!JacoCommand::default().is_valid());
        assert!(!JacoCommand::new_zeroed(7, 3).is_valid());
        assert!(message().is_valid());
    }

    #[test]
    fn groom_missing_or_invalid_message() {
        for groomed in [
            GroomedCommand::new(None, 2, 3),
            GroomedCommand::new(Some(&JacoCommand::new_zeroed(2, 3)), 2, 3),
        ]
        .iter()
        {
            assert!(!groomed.received);
            assert_eq!(groomed.position.len(), 5);
            assert_eq!(groomed.velocity.len(), 5);
            assert!(groomed.position.iter().all(|x| *x == 0.));
            assert!(groomed.velocity.iter().all(|x| *x == 0.));
        }
    }

    #[test]
    fn groom_scales_finger_velocities_only() {
        let groomed = GroomedCommand::new(Some(&message()), 2, 3);
        assert!(groomed.received);
        assert_eq!(groomed.position.as_slice(), &[0.1, 0.2, 3400., 6800., 0.]);
        assert_eq!(groomed.velocity[0], 1.0);
        assert_eq!(groomed.velocity[1], -1.0);
        float_compare(groomed.velocity[2], 680. * FINGER_SDK_TO_URDF, 1e-12);
        float_compare(groomed.velocity[3], -680. * FINGER_SDK_TO_URDF, 1e-12);
        assert!(groomed.velocity[3] < 0.);
        assert_eq!(groomed.velocity[4], 0.);
    }

    #[test]
    fn check_size_names_field() {
        assert!(message().check_size(2, 3).is_ok());
        let mut bad = message();
        bad.finger_velocity.pop();
        assert_eq!(
            bad.check_size(2, 3),
            Err(JacoException::SizeMismatchError {
                port: "lcmt_jaco_command.finger_velocity".to_string(),
                expected: 3,
                actual: 2,
            })
        );
        assert!(message().check_size(3, 3).is_err());
    }

    #[test]
    fn message_serde() {
        let json = serde_json::to_string(&message()).unwrap();
        let decoded: JacoCommand = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, message());
    }
}
