// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Constants describing the Kinova Jaco arm and its fingers.
use std::time::Duration;

/// Number of arm joints of a default Jaco.
pub const JACO_DEFAULT_ARM_NUM_JOINTS: usize = 7;

/// Number of fingers of the default Jaco hand.
pub const JACO_DEFAULT_ARM_NUM_FINGERS: usize = 3;

/// Period at which the Jaco driver publishes status messages.
pub const JACO_LCM_STATUS_PERIOD: Duration = Duration::from_millis(10);

/// The Kinova SDK reports finger positions from 0 (open) to 6800 (closed). The finger joints
/// of the Jaco description move from 0 to 1.51 \[rad\].
pub const FINGER_SDK_TO_URDF: f64 = 1.51 / 6800.;

/// Inverse of [`FINGER_SDK_TO_URDF`].
pub const FINGER_URDF_TO_SDK: f64 = 6800. / 1.51;

#[cfg(test)]
mod tests {
    use crate::kinova_jaco::jaco_constants::{FINGER_SDK_TO_URDF, FINGER_URDF_TO_SDK};

    #[test]
    fn finger_conversion_is_invertible() {
        assert!((FINGER_SDK_TO_URDF * FINGER_URDF_TO_SDK - 1.).abs() < 1e-12);
        assert!((6800. * FINGER_SDK_TO_URDF - 1.51).abs() < 1e-12);
    }
}
