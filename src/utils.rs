// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! contains useful type definitions and conversion functions.
use crate::exception::{create_size_mismatch, JacoResult};
use nalgebra::DVector;

/// A Vector with one entry per joint and finger
pub type VectorN = DVector<f64>;

/// Makes sure that `values` has exactly `expected` entries.
///
/// # Errors
/// * [`SizeMismatchError`](`crate::exception::JacoException::SizeMismatchError`) naming `port`
/// if the sizes differ.
pub fn check_size(port: &str, expected: usize, values: &[f64]) -> JacoResult<()> {
    if values.len() != expected {
        return Err(create_size_mismatch(port, expected, values.len()));
    }
    Ok(())
}

/// Stacks the joint values on top of the finger values.
pub fn joints_then_fingers(joints: &[f64], fingers: &[f64]) -> VectorN {
    VectorN::from_iterator(
        joints.len() + fingers.len(),
        joints.iter().chain(fingers.iter()).copied(),
    )
}

/// Stacks two vectors of the same kind into one, e.g. positions on top of velocities.
pub fn stack(upper: &VectorN, lower: &VectorN) -> VectorN {
    VectorN::from_iterator(
        upper.len() + lower.len(),
        upper.iter().chain(lower.iter()).copied(),
    )
}
