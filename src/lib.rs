// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! # libjaco-rs
//! libjaco-rs turns lcmt_jaco_command messages for a [Kinova Jaco](https://www.kinovarobotics.com)
//! arm into a commanded state which can be consumed by a control loop.
//!
//! The library does not receive or decode messages itself. A decoded
//! [`JacoCommand`](`crate::JacoCommand`) is handed to the receiver together with the
//! optional measured position of the arm, and the receiver produces the commanded position
//! and velocity of every joint and finger.
//!
//! ## Design
//! The library is divided into these modules:
//! * [kinova_jaco](`crate::kinova_jaco`) - the receiver, its context, the message type and the
//! simulator which drives the receiver periodically.
//! * [exception](`crate::exception`) - error and Result definitions.
//! * [utils](`crate::utils`) - vector aliases and helpers.
//!
//! A [`JacoCommandReceiver`](`crate::JacoCommandReceiver`) itself holds no state. All inputs,
//! the latched initial position and cached values live in a
//! [`ReceiverContext`](`crate::ReceiverContext`).
//!
//! # Example:
//!```no_run
//! use jaco::{JacoCommandReceiver, JacoResult};
//! fn main() -> JacoResult<()> {
//!     let receiver = JacoCommandReceiver::new(None, None);
//!     let mut context = receiver.create_default_context();
//!     context.fix_position_measured_input(&[0.1; 10])?;
//!     receiver.latch_initial_position(&mut context)?;
//!     let state = receiver.calc_output(&context)?;
//!     println!("{:?}", state.to_vector());
//!     Ok(())
//! }
//! ```
//!
//! ```no_run
//! # use jaco::JacoCommandReceiver;
//! let receiver = JacoCommandReceiver::new(None, None);
//! ```
//! creates a receiver for the default arm with 7 joints and 3 fingers. Use `Some(..)` to set a
//! different number of joints or fingers.
//!
//! ```no_run
//! # use jaco::{JacoCommandReceiver, JacoResult};
//! # fn main() -> JacoResult<()> {
//! # let receiver = JacoCommandReceiver::new(None, None);
//! # let mut context = receiver.create_default_context();
//! context.fix_position_measured_input(&[0.1; 10])?;
//! receiver.latch_initial_position(&mut context)?;
//! # Ok(())
//! # }
//! ```
//! Until a message arrives the commanded position follows the measured position. Latching
//! freezes it, so the arm holds the position it had when latching. When the receiver is driven
//! by a [`Simulator`](`crate::Simulator`) the latching happens on the first tick and does not
//! have to be done by hand. Vectors of the wrong size are rejected with a
//! [`SizeMismatchError`](`crate::exception::JacoException::SizeMismatchError`).
//!
//! ```no_run
//! # use jaco::{JacoCommand, JacoCommandReceiver, JacoResult};
//! # fn main() -> JacoResult<()> {
//! # let receiver = JacoCommandReceiver::new(None, None);
//! # let mut context = receiver.create_default_context();
//! let mut message = JacoCommand::new_zeroed(7, 3);
//! message.utime = 1;
//! context.fix_message_input(message)?;
//! let state = receiver.calc_output(&context)?;
//! # Ok(())
//! # }
//! ```
//! Once a message with a non-zero `utime` arrives, position and velocity come from the
//! message. The finger velocities are converted from Kinova SDK units with
//! [`FINGER_SDK_TO_URDF`](`crate::FINGER_SDK_TO_URDF`).
pub mod exception;
pub mod kinova_jaco;
pub mod utils;

pub use exception::{JacoException, JacoResult};
pub use kinova_jaco::commanded_state::CommandedState;
pub use kinova_jaco::jaco_command::{GroomedCommand, JacoCommand};
pub use kinova_jaco::jaco_command_receiver::{
    JacoCommandReceiver, ReceiverConfig, MESSAGE_INPUT_PORT, POSITION_MEASURED_INPUT_PORT,
    STATE_OUTPUT_PORT,
};
pub use kinova_jaco::jaco_constants::*;
pub use kinova_jaco::receiver_context::ReceiverContext;
pub use kinova_jaco::simulator::Simulator;
pub use kinova_jaco::sources::{CommandSource, PositionMeasuredSource};
pub use utils::VectorN;
