// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Contains everything which is needed to turn lcmt_jaco_command messages into commanded
//! states of a Kinova Jaco arm.
pub mod commanded_state;
pub mod jaco_command;
pub mod jaco_command_receiver;
pub mod jaco_constants;
pub mod receiver_context;
pub mod simulator;
pub mod sources;
