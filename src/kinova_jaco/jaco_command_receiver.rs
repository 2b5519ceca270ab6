// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Contains the JacoCommandReceiver type.
use log::{debug, trace};
use serde::Deserialize;
use serde::Serialize;

use crate::exception::{JacoException, JacoResult};
use crate::kinova_jaco::commanded_state::CommandedState;
use crate::kinova_jaco::jaco_command::GroomedCommand;
use crate::kinova_jaco::jaco_constants::{
    JACO_DEFAULT_ARM_NUM_FINGERS, JACO_DEFAULT_ARM_NUM_JOINTS,
};
use crate::kinova_jaco::receiver_context::ReceiverContext;
use crate::utils::VectorN;

/// Name of the required message input port.
pub const MESSAGE_INPUT_PORT: &str = "lcmt_jaco_command";
/// Name of the optional measured position input port.
pub const POSITION_MEASURED_INPUT_PORT: &str = "position_measured";
/// Name of the output port.
pub const STATE_OUTPUT_PORT: &str = "state";

/// Dimensions of a [`JacoCommandReceiver`].
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
#[serde(default)]
pub struct ReceiverConfig {
    pub num_joints: usize,
    pub num_fingers: usize,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        ReceiverConfig {
            num_joints: JACO_DEFAULT_ARM_NUM_JOINTS,
            num_fingers: JACO_DEFAULT_ARM_NUM_FINGERS,
        }
    }
}

/// Which call site latched the initial position. Only used for logging.
#[derive(Debug, Copy, Clone, PartialEq)]
enum LatchTrigger {
    DiscreteUpdate,
    Manual,
}

/// Handles lcmt_jaco_command messages.
///
/// The receiver does not subscribe to anything. The decoded message is handed to the
/// "lcmt_jaco_command" input of a [`ReceiverContext`], e.g. by a
/// [`Simulator`](`crate::Simulator`).
///
/// The "state" output contains the commanded position and velocity for each joint and finger.
/// Finger velocities are translated from the values used by the Kinova SDK to values
/// appropriate for the finger joints of the Jaco description, see
/// [`FINGER_SDK_TO_URDF`](`crate::FINGER_SDK_TO_URDF`).
///
/// # Output prior to receiving a valid message
/// The position initially feeds through from the "position_measured" input, or is zero if that
/// input is not connected. During the first discrete update event the receiver latches the
/// "position_measured" input into the context, and from then on the position comes from the
/// latched value. [`latch_initial_position`](`Self::latch_initial_position`) achieves the same
/// without events. The velocity is zero.
///
/// # Output after receiving a valid message
/// Position and velocity come from the latest valid message. There is no timeout, the last
/// message stays in effect until a new one arrives or the input is cleared.
#[derive(Debug, Clone, PartialEq)]
pub struct JacoCommandReceiver {
    num_joints: usize,
    num_fingers: usize,
}

impl Default for JacoCommandReceiver {
    fn default() -> Self {
        JacoCommandReceiver::from_config(&ReceiverConfig::default())
    }
}

impl JacoCommandReceiver {
    /// Creates a new receiver.
    /// # Arguments
    /// * `num_joints` - Number of arm joints. Default is [`JACO_DEFAULT_ARM_NUM_JOINTS`](`crate::JACO_DEFAULT_ARM_NUM_JOINTS`).
    /// * `num_fingers` - Number of fingers. Default is [`JACO_DEFAULT_ARM_NUM_FINGERS`](`crate::JACO_DEFAULT_ARM_NUM_FINGERS`).
    pub fn new(num_joints: Option<usize>, num_fingers: Option<usize>) -> Self {
        JacoCommandReceiver {
            num_joints: num_joints.unwrap_or(JACO_DEFAULT_ARM_NUM_JOINTS),
            num_fingers: num_fingers.unwrap_or(JACO_DEFAULT_ARM_NUM_FINGERS),
        }
    }

    pub fn from_config(config: &ReceiverConfig) -> Self {
        JacoCommandReceiver::new(Some(config.num_joints), Some(config.num_fingers))
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

    pub fn message_input_port_name(&self) -> &'static str {
        MESSAGE_INPUT_PORT
    }

    pub fn position_measured_input_port_name(&self) -> &'static str {
        POSITION_MEASURED_INPUT_PORT
    }

    pub fn state_output_port_name(&self) -> &'static str {
        STATE_OUTPUT_PORT
    }

    /// Creates a context with unconnected inputs and without a latched position.
    pub fn create_default_context(&self) -> ReceiverContext {
        ReceiverContext::new(self.num_joints, self.num_fingers)
    }

    fn check_context(&self, context: &ReceiverContext) -> JacoResult<()> {
        if context.num_joints() != self.num_joints || context.num_fingers() != self.num_fingers {
            return Err(JacoException::ContextMismatchError {
                expected_joints: self.num_joints,
                expected_fingers: self.num_fingers,
                actual_joints: context.num_joints(),
                actual_fingers: context.num_fingers(),
            });
        }
        Ok(())
    }

    /// The "position_measured" input, or zero if it is not connected.
    ///
    /// The value is cached in the context until the input changes.
    /// # Errors
    /// * [`ContextMismatchError`](`crate::exception::JacoException::ContextMismatchError`) if
    /// the context was created by a receiver with a different number of joints or fingers.
    pub fn position_measured_or_zero<'c>(
        &self,
        context: &'c ReceiverContext,
    ) -> JacoResult<&'c VectorN> {
        self.check_context(context)?;
        Ok(context.position_measured_or_zero_cache().get_or_init(|| {
            trace!("recomputing {} or zero", POSITION_MEASURED_INPUT_PORT);
            match context.position_measured_input() {
                Some(position) => position.clone(),
                None => VectorN::zeros(self.num_positions()),
            }
        }))
    }

    /// The latest message after validation and unit translation.
    ///
    /// The value is cached in the context until the message input changes.
    /// # Errors
    /// * [`ContextMismatchError`](`crate::exception::JacoException::ContextMismatchError`) if
    /// the context was created by a receiver with a different number of joints or fingers.
    pub fn groom_input<'c>(&self, context: &'c ReceiverContext) -> JacoResult<&'c GroomedCommand> {
        self.check_context(context)?;
        Ok(context.groomed_input_cache().get_or_init(|| {
            trace!("grooming {} input", MESSAGE_INPUT_PORT);
            GroomedCommand::new(context.message_input(), self.num_joints, self.num_fingers)
        }))
    }

    /// Copies the current "position_measured" input (or zero if not connected) into the
    /// context. From then on the position output produces the latched value as long as no
    /// message has been received.
    ///
    /// The latching happens automatically during the first discrete update event, see
    /// [`calc_next_update_time`](`Self::calc_next_update_time`). Use this method when the
    /// receiver is not driven by a [`Simulator`](`crate::Simulator`).
    ///
    /// Calling it again is allowed and latches the current "position_measured" input anew.
    /// # Errors
    /// * [`ContextMismatchError`](`crate::exception::JacoException::ContextMismatchError`) if
    /// the context was created by a receiver with a different number of joints or fingers.
    pub fn latch_initial_position(&self, context: &mut ReceiverContext) -> JacoResult<()> {
        self.latch(context, LatchTrigger::Manual)
    }

    fn latch(&self, context: &mut ReceiverContext, trigger: LatchTrigger) -> JacoResult<()> {
        let position = self.position_measured_or_zero(context)?.clone();
        debug!(
            "latching initial position {:?} at t = {} ({:?})",
            position.as_slice(),
            context.time(),
            trigger
        );
        context.latch(position);
        Ok(())
    }

    /// Time of the next discrete update event.
    ///
    /// The latch event is due immediately as long as the position is not latched. Afterwards
    /// no further event is scheduled.
    pub fn calc_next_update_time(&self, context: &ReceiverContext) -> Option<f64> {
        if context.is_latched() {
            None
        } else {
            Some(context.time())
        }
    }

    /// Handles a discrete update event by latching the initial position.
    ///
    /// The caller has to process this event before evaluating the output for the same time.
    /// # Errors
    /// * [`ContextMismatchError`](`crate::exception::JacoException::ContextMismatchError`) if
    /// the context was created by a receiver with a different number of joints or fingers.
    pub fn calc_discrete_update(&self, context: &mut ReceiverContext) -> JacoResult<()> {
        self.latch(context, LatchTrigger::DiscreteUpdate)
    }

    /// Evaluates the "state" output.
    /// # Errors
    /// * [`ContextMismatchError`](`crate::exception::JacoException::ContextMismatchError`) if
    /// the context was created by a receiver with a different number of joints or fingers.
    pub fn calc_output(&self, context: &ReceiverContext) -> JacoResult<CommandedState> {
        let groomed = self.groom_input(context)?;
        let position = if groomed.received {
            groomed.position.clone()
        } else {
            match context.latched_position() {
                Some(latched) => latched.clone(),
                None => self.position_measured_or_zero(context)?.clone(),
            }
        };
        Ok(CommandedState::new(
            self.num_joints,
            position,
            groomed.velocity.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::exception::JacoException;
    use crate::kinova_jaco::jaco_command::JacoCommand;
    use crate::kinova_jaco::jaco_command_receiver::{JacoCommandReceiver, ReceiverConfig};
    use crate::kinova_jaco::jaco_constants::FINGER_SDK_TO_URDF;
    use crate::utils::VectorN;

    fn slice_compare(a: &[f64], b: &[f64], thresh: f64) {
        assert_eq!(a.len(), b.len());
        for i in 0..a.len() {
            assert!((a[i] - b[i]).abs() < thresh, "{:?} != {:?}", a, b);
        }
    }

    fn message(utime: i64) -> JacoCommand {
        JacoCommand {
            utime,
            joint_position: vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6],
            joint_velocity: vec![-0.1, 0.0, 0.1, 0.2, 0.3, 0.4],
            finger_position: vec![100., 200., 300.],
            finger_velocity: vec![1000., -1000., 0.],
        }
    }

    #[test]
    fn defaults() {
        let receiver = JacoCommandReceiver::default();
        assert_eq!(receiver.num_joints(), 7);
        assert_eq!(receiver.num_fingers(), 3);
        assert_eq!(receiver, JacoCommandReceiver::new(None, None));
        assert_eq!(receiver.message_input_port_name(), "lcmt_jaco_command");
        assert_eq!(
            receiver.position_measured_input_port_name(),
            "position_measured"
        );
        assert_eq!(receiver.state_output_port_name(), "state");
        let config: ReceiverConfig = serde_json::from_str(r#"{"num_fingers": 2}"#).unwrap();
        let receiver = JacoCommandReceiver::from_config(&config);
        assert_eq!(receiver.num_joints(), 7);
        assert_eq!(receiver.num_fingers(), 2);
    }

    #[test]
    fn feed_through_before_latch() {
        let receiver = JacoCommandReceiver::new(Some(6), Some(3));
        let mut context = receiver.create_default_context();

        let output = receiver.calc_output(&context).unwrap();
        assert_eq!(output.position, VectorN::zeros(9));
        assert_eq!(output.velocity, VectorN::zeros(9));

        let q0 = [0.1, -0.2, 0.3, -0.4, 0.5, -0.6, 0.7, 0.8, 0.9];
        context.fix_position_measured_input(&q0).unwrap();
        let output = receiver.calc_output(&context).unwrap();
        assert_eq!(output.position.as_slice(), &q0);
        assert_eq!(output.velocity, VectorN::zeros(9));

        let q1 = [1.; 9];
        context.fix_position_measured_input(&q1).unwrap();
        let output = receiver.calc_output(&context).unwrap();
        assert_eq!(output.position.as_slice(), &q1);
        assert!(!context.is_latched());
    }

    #[test]
    fn latch_freezes_position() {
        let receiver = JacoCommandReceiver::new(Some(6), Some(3));
        let mut context = receiver.create_default_context();
        let q0 = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9];
        context.fix_position_measured_input(&q0).unwrap();
        receiver.latch_initial_position(&mut context).unwrap();

        context.fix_position_measured_input(&[2.; 9]).unwrap();
        let output = receiver.calc_output(&context).unwrap();
        assert_eq!(output.position.as_slice(), &q0);
        assert_eq!(output.velocity, VectorN::zeros(9));

        context.clear_position_measured_input();
        let output = receiver.calc_output(&context).unwrap();
        assert_eq!(output.position.as_slice(), &q0);
    }

    #[test]
    fn latch_without_position_measured_is_zero() {
        let receiver = JacoCommandReceiver::new(Some(2), Some(1));
        let mut context = receiver.create_default_context();
        receiver.latch_initial_position(&mut context).unwrap();
        context.fix_position_measured_input(&[1., 2., 3.]).unwrap();
        let output = receiver.calc_output(&context).unwrap();
        assert_eq!(output.position, VectorN::zeros(3));
    }

    #[test]
    fn relatch_is_idempotent() {
        let receiver = JacoCommandReceiver::new(Some(6), Some(3));
        let mut once = receiver.create_default_context();
        let mut twice = receiver.create_default_context();
        let q0 = [0.9, 0.8, 0.7, 0.6, 0.5, 0.4, 0.3, 0.2, 0.1];
        once.fix_position_measured_input(&q0).unwrap();
        twice.fix_position_measured_input(&q0).unwrap();

        receiver.latch_initial_position(&mut once).unwrap();
        receiver.latch_initial_position(&mut twice).unwrap();
        receiver.latch_initial_position(&mut twice).unwrap();

        assert_eq!(once.latched_position(), twice.latched_position());
        assert_eq!(
            receiver.calc_output(&once).unwrap(),
            receiver.calc_output(&twice).unwrap()
        );
    }

    #[test]
    fn scheduled_latch_fires_once() {
        let receiver = JacoCommandReceiver::new(Some(1), Some(1));
        let mut context = receiver.create_default_context();
        context.set_time(0.25);
        assert_eq!(receiver.calc_next_update_time(&context), Some(0.25));
        context.fix_position_measured_input(&[0.5, 0.5]).unwrap();
        receiver.calc_discrete_update(&mut context).unwrap();
        assert!(context.is_latched());
        assert_eq!(receiver.calc_next_update_time(&context), None);
    }

    #[test]
    fn velocity_is_gated_on_message() {
        let receiver = JacoCommandReceiver::new(Some(6), Some(3));
        let mut context = receiver.create_default_context();
        context.fix_position_measured_input(&[0.5; 9]).unwrap();

        context
            .fix_message_input(JacoCommand::new_zeroed(6, 3))
            .unwrap();
        let output = receiver.calc_output(&context).unwrap();
        assert_eq!(output.velocity, VectorN::zeros(9));
        assert_eq!(output.position.as_slice(), &[0.5; 9]);

        context.fix_message_input(message(1)).unwrap();
        let output = receiver.calc_output(&context).unwrap();
        assert_eq!(output.position.as_slice(), &[0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 100., 200., 300.]);
        slice_compare(
            output.velocity.as_slice(),
            &[
                -0.1,
                0.0,
                0.1,
                0.2,
                0.3,
                0.4,
                1000. * FINGER_SDK_TO_URDF,
                -1000. * FINGER_SDK_TO_URDF,
                0.,
            ],
            1e-12,
        );

        // No decay: evaluating again at a later time gives the same command.
        context.set_time(10.);
        assert_eq!(receiver.calc_output(&context).unwrap(), output);

        context.clear_message_input();
        let output = receiver.calc_output(&context).unwrap();
        assert_eq!(output.velocity, VectorN::zeros(9));
        assert_eq!(output.position.as_slice(), &[0.5; 9]);
    }

    #[test]
    fn finger_velocity_conversion() {
        let receiver = JacoCommandReceiver::new(Some(0), Some(3));
        let mut context = receiver.create_default_context();
        context
            .fix_message_input(JacoCommand {
                utime: 5,
                joint_position: vec![],
                joint_velocity: vec![],
                finger_position: vec![0.; 3],
                finger_velocity: vec![3400., -6800., 0.],
            })
            .unwrap();
        let output = receiver.calc_output(&context).unwrap();
        slice_compare(output.finger_velocity(), &[0.755, -1.51, 0.], 1e-12);
        assert_eq!(output.joint_velocity().len(), 0);
    }

    #[test]
    fn groomed_input_is_cached_until_message_changes() {
        let receiver = JacoCommandReceiver::new(Some(6), Some(3));
        let mut context = receiver.create_default_context();
        context.fix_message_input(message(1)).unwrap();
        let first = receiver.groom_input(&context).unwrap() as *const _;
        let second = receiver.groom_input(&context).unwrap() as *const _;
        assert_eq!(first, second);
        let measured = receiver.position_measured_or_zero(&context).unwrap() as *const _;
        assert_eq!(
            measured,
            receiver.position_measured_or_zero(&context).unwrap() as *const _
        );

        context.fix_message_input(message(2)).unwrap();
        let groomed = receiver.groom_input(&context).unwrap();
        assert!(groomed.received);
        assert_eq!(context.message_input().map(|m| m.utime), Some(2));
    }

    #[test]
    fn dimension_contract() {
        let receiver = JacoCommandReceiver::new(Some(6), Some(3));
        let mut context = receiver.create_default_context();
        context.fix_position_measured_input(&[0.; 9]).unwrap();
        let output = receiver.calc_output(&context).unwrap();
        assert_eq!(output.position.len(), 9);
        assert_eq!(output.velocity.len(), 9);
        assert_eq!(output.to_vector().len(), 18);

        assert_eq!(
            context.fix_position_measured_input(&[0.; 10]),
            Err(JacoException::SizeMismatchError {
                port: "position_measured".to_string(),
                expected: 9,
                actual: 10,
            })
        );
        assert!(context.fix_position_measured_input(&[0.; 7]).is_err());
        assert!(context
            .fix_message_input(JacoCommand::new_zeroed(7, 3))
            .is_err());
    }

    #[test]
    fn foreign_context_is_rejected() {
        let receiver = JacoCommandReceiver::new(Some(6), Some(3));
        let mut context = JacoCommandReceiver::default().create_default_context();
        assert_eq!(
            receiver.calc_output(&context),
            Err(JacoException::ContextMismatchError {
                expected_joints: 6,
                expected_fingers: 3,
                actual_joints: 7,
                actual_fingers: 3,
            })
        );
        assert!(receiver.latch_initial_position(&mut context).is_err());
        assert!(!context.is_latched());
    }

    #[test]
    fn context_with_same_size_but_other_split_is_rejected() {
        let six_three = JacoCommandReceiver::new(Some(6), Some(3));
        let seven_two = JacoCommandReceiver::new(Some(7), Some(2));
        let mut context = six_three.create_default_context();
        let mut command = JacoCommand::new_zeroed(6, 3);
        command.utime = 1;
        command.finger_velocity = vec![6800.; 3];
        context.fix_message_input(command).unwrap();
        assert_eq!(context.num_positions(), seven_two.num_positions());

        let expected = Err(JacoException::ContextMismatchError {
            expected_joints: 7,
            expected_fingers: 2,
            actual_joints: 6,
            actual_fingers: 3,
        });
        assert_eq!(seven_two.calc_output(&context), expected);
        assert!(seven_two.groom_input(&context).is_err());
        assert!(seven_two.position_measured_or_zero(&context).is_err());
        assert!(seven_two.calc_discrete_update(&mut context).is_err());
        assert!(!context.is_latched());

        let output = six_three.calc_output(&context).unwrap();
        assert_eq!(output.num_joints(), 6);
        assert_eq!(output.finger_velocity().len(), 3);
    }

    #[test]
    fn zero_sized_receiver() {
        let receiver = JacoCommandReceiver::new(Some(0), Some(0));
        let mut context = receiver.create_default_context();
        receiver.latch_initial_position(&mut context).unwrap();
        let output = receiver.calc_output(&context).unwrap();
        assert_eq!(output.to_vector().len(), 0);
    }
}
