// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

use clap::Parser;

use jaco::{
    CommandSource, JacoCommand, JacoCommandReceiver, JacoResult, PositionMeasuredSource,
    Simulator,
};
use std::time::Duration;

/// An example showing how the commanded state evolves before and after the first message.
///
/// The measured position drifts slowly. The commanded position follows it only until the
/// first tick latches it. After `--message-delay` ticks a message arrives and takes over.
#[derive(Parser, Debug)]
#[clap(author, version, name = "echo_commanded_state")]
struct CommandLineArguments {
    /// Number of arm joints
    #[clap(long, default_value_t = 7)]
    pub num_joints: usize,
    /// Number of fingers
    #[clap(long, default_value_t = 3)]
    pub num_fingers: usize,
    /// Number of ticks before the first message arrives
    #[clap(long, default_value_t = 5)]
    pub message_delay: u64,
    /// Number of ticks to run
    #[clap(long, default_value_t = 10)]
    pub ticks: u64,
}

struct DelayedCommand {
    ticks: u64,
    delay: u64,
    num_joints: usize,
    num_fingers: usize,
}

impl CommandSource for DelayedCommand {
    fn latest_message(&mut self) -> Option<JacoCommand> {
        self.ticks += 1;
        if self.ticks <= self.delay {
            return None;
        }
        let mut message = JacoCommand::new_zeroed(self.num_joints, self.num_fingers);
        message.utime = 1_000_000;
        message.joint_velocity = vec![0.1; self.num_joints];
        message.finger_velocity = vec![680.; self.num_fingers];
        Some(message)
    }
}

struct DriftingPosition {
    position: Vec<f64>,
}

impl PositionMeasuredSource for DriftingPosition {
    fn position_measured(&mut self) -> Option<Vec<f64>> {
        self.position.iter_mut().for_each(|q| *q += 0.01);
        Some(self.position.clone())
    }
}

fn main() -> JacoResult<()> {
    env_logger::init();
    let args = CommandLineArguments::parse();
    let receiver = JacoCommandReceiver::new(Some(args.num_joints), Some(args.num_fingers));
    let command_source = DelayedCommand {
        ticks: 0,
        delay: args.message_delay,
        num_joints: args.num_joints,
        num_fingers: args.num_fingers,
    };
    let position_source = DriftingPosition {
        position: vec![0.; receiver.num_positions()],
    };
    let mut simulator = Simulator::new(
        &receiver,
        command_source,
        Some(Box::new(position_source)),
        Some(Duration::from_millis(100)),
    )?;
    for _ in 0..args.ticks {
        let time = simulator.next_tick_time();
        let state = simulator.step()?;
        println!("t = {:.1}: {:?}", time, state.to_vector().as_slice());
    }
    Ok(())
}
