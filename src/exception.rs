// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Contains exception and Result definitions
use thiserror::Error;

/// Represents all kind of errors which can occur at the boundaries of a
/// [`JacoCommandReceiver`](`crate::JacoCommandReceiver`).
///
/// A missing message or an unconnected measured position input is not an error. Both are
/// handled by falling back to zero.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum JacoException {
    /// SizeMismatchError is returned if a vector handed to the receiver does not have the
    /// length which was declared at construction. Values are never truncated or padded.
    #[error("{port}: expected a vector of size {expected} but got {actual}")]
    SizeMismatchError {
        /// Name of the port or message field which received the vector.
        port: String,
        /// Size declared by the receiver.
        expected: usize,
        /// Size which was provided.
        actual: usize,
    },

    /// ContextMismatchError is returned if a context created by a receiver with a different
    /// number of joints or fingers is passed to a receiver.
    #[error(
        "Context was created for {actual_joints} joints and {actual_fingers} fingers but the receiver has {expected_joints} joints and {expected_fingers} fingers"
    )]
    ContextMismatchError {
        expected_joints: usize,
        expected_fingers: usize,
        actual_joints: usize,
        actual_fingers: usize,
    },

    /// ConfigurationException is returned for invalid scheduler settings.
    #[error("{message:?}")]
    ConfigurationException { message: String },
}

/// creates a SizeMismatchError for the given port
pub(crate) fn create_size_mismatch(port: &str, expected: usize, actual: usize) -> JacoException {
    JacoException::SizeMismatchError {
        port: port.to_string(),
        expected,
        actual,
    }
}

/// Result type which can have JacoException as Error
pub type JacoResult<T> = Result<T, JacoException>;
