// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Contains the Simulator which drives a [`JacoCommandReceiver`] periodically.
use std::time::Duration;

use log::info;

use crate::exception::{JacoException, JacoResult};
use crate::kinova_jaco::commanded_state::CommandedState;
use crate::kinova_jaco::jaco_command::JacoCommand;
use crate::kinova_jaco::jaco_command_receiver::JacoCommandReceiver;
use crate::kinova_jaco::jaco_constants::JACO_LCM_STATUS_PERIOD;
use crate::kinova_jaco::receiver_context::ReceiverContext;
use crate::kinova_jaco::sources::{CommandSource, PositionMeasuredSource};
use crate::utils::check_size;

/// Periodically polls the input sources and evaluates the "state" output of a receiver.
///
/// Every tick runs in this order:
/// 1. both sources are polled and their values are checked against the receiver sizes,
/// 2. the context time is set to the tick time and the inputs are refreshed (only changed
///    values are written, so the cached values of the context survive ticks without new data),
/// 3. due discrete update events are processed, which latches the initial position on the
///    first tick,
/// 4. the output is evaluated.
///
/// Because the latch event is committed before the output is read, the output of the very
/// first tick already comes from the latched position.
pub struct Simulator<'a, C: CommandSource> {
    receiver: &'a JacoCommandReceiver,
    context: ReceiverContext,
    command_source: C,
    position_source: Option<Box<dyn PositionMeasuredSource + 'a>>,
    period: Duration,
    tick: u64,
    message_seen: bool,
    latest_output: Option<CommandedState>,
}

impl<'a, C: CommandSource> Simulator<'a, C> {
    /// Creates a new Simulator.
    /// # Arguments
    /// * `receiver` - The receiver to drive.
    /// * `command_source` - Producer of the "lcmt_jaco_command" input.
    /// * `position_source` - Producer of the "position_measured" input. If None the input stays
    /// unconnected.
    /// * `period` - Time between two ticks. Default is [`JACO_LCM_STATUS_PERIOD`](`crate::JACO_LCM_STATUS_PERIOD`).
    /// # Errors
    /// * [`ConfigurationException`](`crate::exception::JacoException::ConfigurationException`)
    /// if the period is zero.
    pub fn new(
        receiver: &'a JacoCommandReceiver,
        command_source: C,
        position_source: Option<Box<dyn PositionMeasuredSource + 'a>>,
        period: Option<Duration>,
    ) -> JacoResult<Self> {
        let period = period.unwrap_or(JACO_LCM_STATUS_PERIOD);
        if period == Duration::from_secs(0) {
            return Err(JacoException::ConfigurationException {
                message: "the simulator period has to be greater than zero".to_string(),
            });
        }
        Ok(Simulator {
            receiver,
            context: receiver.create_default_context(),
            command_source,
            position_source,
            period,
            tick: 0,
            message_seen: false,
            latest_output: None,
        })
    }

    pub fn receiver(&self) -> &JacoCommandReceiver {
        self.receiver
    }

    pub fn context(&self) -> &ReceiverContext {
        &self.context
    }

    /// Gives access to the context, e.g. to latch the initial position manually before the
    /// first tick.
    pub fn context_mut(&mut self) -> &mut ReceiverContext {
        &mut self.context
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Time of the next tick in \[s\].
    pub fn next_tick_time(&self) -> f64 {
        self.tick as f64 * self.period.as_secs_f64()
    }

    /// Output of the last tick, None before the first tick.
    pub fn latest_output(&self) -> Option<&CommandedState> {
        self.latest_output.as_ref()
    }

    /// Runs a single tick.
    ///
    /// Both sources are polled and their values checked before anything is written to the
    /// context. A failed tick leaves time, inputs and latch untouched and can be retried.
    /// # Errors
    /// * [`SizeMismatchError`](`crate::exception::JacoException::SizeMismatchError`) if a
    /// source produced a vector of the wrong size.
    pub fn step(&mut self) -> JacoResult<&CommandedState> {
        let time = self.next_tick_time();
        let (message, position) = self.poll_sources()?;
        self.context.set_time(time);
        self.apply_inputs(message, position)?;
        if let Some(update_time) = self.receiver.calc_next_update_time(&self.context) {
            if update_time <= time {
                self.receiver.calc_discrete_update(&mut self.context)?;
            }
        }
        let output = self.receiver.calc_output(&self.context)?;
        self.tick += 1;
        let output: &CommandedState = self.latest_output.insert(output);
        Ok(output)
    }

    /// Runs all ticks up to and including `boundary_time`.
    /// # Return
    /// The output of the last tick which was run, None if no tick has run yet.
    /// # Errors
    /// * [`ConfigurationException`](`crate::exception::JacoException::ConfigurationException`)
    /// if `boundary_time` lies before the current time.
    /// * [`SizeMismatchError`](`crate::exception::JacoException::SizeMismatchError`) if a
    /// source produced a vector of the wrong size.
    pub fn advance_to(&mut self, boundary_time: f64) -> JacoResult<Option<&CommandedState>> {
        if boundary_time < self.context.time() {
            return Err(JacoException::ConfigurationException {
                message: format!(
                    "cannot advance to {} s, the simulator is already at {} s",
                    boundary_time,
                    self.context.time()
                ),
            });
        }
        while self.next_tick_time() <= boundary_time {
            self.step()?;
        }
        Ok(self.latest_output.as_ref())
    }

    fn poll_sources(&mut self) -> JacoResult<(Option<JacoCommand>, Option<Vec<f64>>)> {
        let message = self.command_source.latest_message();
        if let Some(message) = message.as_ref() {
            message.check_size(self.receiver.num_joints(), self.receiver.num_fingers())?;
        }
        let position = match self.position_source.as_mut() {
            Some(source) => source.position_measured(),
            None => None,
        };
        if let Some(position) = position.as_ref() {
            check_size(
                self.receiver.position_measured_input_port_name(),
                self.receiver.num_positions(),
                position,
            )?;
        }
        Ok((message, position))
    }

    fn apply_inputs(
        &mut self,
        message: Option<JacoCommand>,
        position: Option<Vec<f64>>,
    ) -> JacoResult<()> {
        // A missing message keeps the last one in effect.
        if let Some(message) = message {
            if self.context.message_input() != Some(&message) {
                let valid = message.is_valid();
                self.context.fix_message_input(message)?;
                if valid && !self.message_seen {
                    info!(
                        "received first valid {} message at t = {}",
                        self.receiver.message_input_port_name(),
                        self.context.time()
                    );
                    self.message_seen = true;
                }
            }
        }
        match position {
            Some(position) => {
                let unchanged = self
                    .context
                    .position_measured_input()
                    .map_or(false, |current| current.as_slice() == position.as_slice());
                if !unchanged {
                    self.context.fix_position_measured_input(&position)?;
                }
            }
            None => {
                if self.context.position_measured_input().is_some() {
                    self.context.clear_position_measured_input();
                }
            }
        }
        Ok(())
    }
}
