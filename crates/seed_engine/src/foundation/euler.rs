//! # Euler angles
//!
//! An [`Euler`] is three axis angles in radians plus the [`EulerOrder`] in
//! which the axis rotations compose. Order `ABC` builds the rotation matrix
//! `R_A · R_B · R_C`, so `XYZ` is `Rx · Ry · Rz`.
//!
//! Euler values are observable: every mutation that changes a stored field
//! emits through the instance's own [`ChangeEmitter`]. Cloning detaches the
//! listeners.
//!
//! ## Decomposition
//! Each order recovers its middle angle with `asin` of one rotation-block
//! element (clamped to [-1, 1]) and the two outer angles with `atan2`. When
//! that element reaches [`GIMBAL_LOCK_THRESHOLD`] the outer axes are
//! aligned: one of them is pinned to exactly zero and the other absorbs the
//! whole remaining rotation.

use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::events::{ChangeEmitter, Observable};
use crate::foundation::math::{element::*, utils, Mat4, Mat4Ext, Quat, Vec3};

/// Magnitude of the `asin` element at and above which decomposition takes
/// the gimbal-lock branch
pub const GIMBAL_LOCK_THRESHOLD: f32 = 0.99999;

/// Errors raised when decoding Euler data from flat arrays
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum EulerError {
    /// The slice is too short to hold four values at the given offset
    #[error("array of length {len} has no Euler at offset {offset}")]
    OutOfBounds {
        /// Length of the slice that was read
        len: usize,
        /// Requested start offset
        offset: usize,
    },

    /// The order code is not one of the six defined orders
    #[error("invalid Euler order code: {0}")]
    InvalidOrder(f32),
}

/// Sequence in which the three axis rotations compose
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum EulerOrder {
    /// `Rx · Ry · Rz`
    #[default]
    XYZ = 0,
    /// `Ry · Rz · Rx`
    YZX = 1,
    /// `Rz · Rx · Ry`
    ZXY = 2,
    /// `Rx · Rz · Ry`
    XZY = 3,
    /// `Ry · Rx · Rz`
    YXZ = 4,
    /// `Rz · Ry · Rx`
    ZYX = 5,
}

impl EulerOrder {
    /// Every order, in numeric-code order
    pub const ALL: [EulerOrder; 6] = [
        EulerOrder::XYZ,
        EulerOrder::YZX,
        EulerOrder::ZXY,
        EulerOrder::XZY,
        EulerOrder::YXZ,
        EulerOrder::ZYX,
    ];

    /// Numeric code of this order
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for EulerOrder {
    type Error = EulerError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(usize::from(code))
            .copied()
            .ok_or(EulerError::InvalidOrder(f32::from(code)))
    }
}

impl TryFrom<f32> for EulerOrder {
    type Error = EulerError;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn try_from(code: f32) -> Result<Self, Self::Error> {
        if code.fract() != 0.0 || !(0.0..=5.0).contains(&code) {
            return Err(EulerError::InvalidOrder(code));
        }
        Self::try_from(code as u8)
    }
}

/// Three axis angles in radians plus their rotation order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Euler {
    x: f32,
    y: f32,
    z: f32,
    order: EulerOrder,

    #[serde(skip)]
    change_event: ChangeEmitter<Euler>,
}

impl Euler {
    /// Create an Euler from explicit angles and order
    pub fn new(x: f32, y: f32, z: f32, order: EulerOrder) -> Self {
        Self {
            x,
            y,
            z,
            order,
            change_event: ChangeEmitter::new(),
        }
    }

    /// Read `[x, y, z, order]` starting at `offset`, the layout written by
    /// [`Euler::to_array`]
    pub fn from_array(array: &[f32], offset: usize) -> Result<Self, EulerError> {
        let values = offset
            .checked_add(4)
            .and_then(|end| array.get(offset..end))
            .ok_or(EulerError::OutOfBounds { len: array.len(), offset })?;

        let order = EulerOrder::try_from(values[3])?;
        Ok(Self::new(values[0], values[1], values[2], order))
    }

    /// Angle around X in radians
    pub fn x(&self) -> f32 {
        self.x
    }

    /// Set the X angle; notifies only if the value changed
    pub fn set_x(&mut self, x: f32) {
        if self.x != x {
            self.x = x;
            self.emit_change();
        }
    }

    /// Angle around Y in radians
    pub fn y(&self) -> f32 {
        self.y
    }

    /// Set the Y angle; notifies only if the value changed
    pub fn set_y(&mut self, y: f32) {
        if self.y != y {
            self.y = y;
            self.emit_change();
        }
    }

    /// Angle around Z in radians
    pub fn z(&self) -> f32 {
        self.z
    }

    /// Set the Z angle; notifies only if the value changed
    pub fn set_z(&mut self, z: f32) {
        if self.z != z {
            self.z = z;
            self.emit_change();
        }
    }

    /// Whether a change was emitted that no consumer has taken yet
    pub fn is_dirty(&self) -> bool {
        self.change_event.is_dirty()
    }

    /// Rotation order
    pub fn order(&self) -> EulerOrder {
        self.order
    }

    /// Set the rotation order without touching the angles; notifies only
    /// if the order changed
    pub fn set_order(&mut self, order: EulerOrder) {
        if self.order != order {
            self.order = order;
            self.emit_change();
        }
    }

    /// Assign every field. Always notifies, even when nothing changed.
    pub fn set(&mut self, x: f32, y: f32, z: f32, order: EulerOrder) {
        self.x = x;
        self.y = y;
        self.z = z;
        self.order = order;
        self.emit_change();
    }

    /// Decompose the rotation block of `matrix` into angles for `order`.
    ///
    /// The matrix is assumed to hold a pure rotation in its upper-left 3x3
    /// block; anything else yields well-defined but meaningless angles.
    /// Listeners are notified only when `notify` is set.
    pub fn set_from_rotation_matrix_and_order(&mut self, matrix: &Mat4, order: EulerOrder, notify: bool) {
        let (x, y, z) = angles_from_rotation_matrix(matrix, order);
        self.x = x;
        self.y = y;
        self.z = z;
        self.order = order;

        if notify {
            self.emit_change();
        }
    }

    /// Decompose `matrix` keeping the current order, notifying listeners
    pub fn set_from_rotation_matrix(&mut self, matrix: &Mat4) {
        self.set_from_rotation_matrix_and_order(matrix, self.order, true);
    }

    /// Set from a unit quaternion, going through its rotation matrix
    pub fn set_from_quaternion(&mut self, q: &Quat, order: EulerOrder, notify: bool) {
        let matrix = Mat4::make_rotation_from_quaternion(q);
        self.set_from_rotation_matrix_and_order(&matrix, order, notify);
    }

    /// Take the angles from a vector, keeping the current order
    pub fn set_from_vector3(&mut self, v: &Vec3) {
        self.set_from_vector3_and_order(v, self.order);
    }

    /// Take the angles from a vector and the given order. Always notifies.
    pub fn set_from_vector3_and_order(&mut self, v: &Vec3, order: EulerOrder) {
        self.set(v.x, v.y, v.z, order);
    }

    /// Express the same rotation under `new_order`.
    ///
    /// The stored angles change but the rotation does not, so no listener
    /// is notified and the dirty flag stays as it was.
    pub fn reorder(&mut self, new_order: EulerOrder) {
        let q = self.to_quaternion();
        log::trace!("Reordering Euler {:?} -> {:?}", self.order, new_order);
        self.set_from_quaternion(&q, new_order, false);
    }

    /// Copy every field from `source` and notify this instance's listeners.
    /// Listeners of `source` are not copied.
    pub fn copy_from(&mut self, source: &Euler) {
        self.x = source.x;
        self.y = source.y;
        self.z = source.z;
        self.order = source.order;
        self.emit_change();
    }

    /// Exact per-field equality, order included
    pub fn equals(&self, other: &Euler) -> bool {
        self.x == other.x && self.y == other.y && self.z == other.z && self.order == other.order
    }

    /// `[x, y, z, order code]`
    pub fn to_array(&self) -> [f32; 4] {
        [self.x, self.y, self.z, f32::from(self.order.code())]
    }

    /// The angles as a vector; the order is dropped
    pub fn to_vector3(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }

    /// Compose the axis rotations in this Euler's order
    pub fn to_quaternion(&self) -> Quat {
        let qx = Quat::from_axis_angle(&Vec3::x_axis(), self.x);
        let qy = Quat::from_axis_angle(&Vec3::y_axis(), self.y);
        let qz = Quat::from_axis_angle(&Vec3::z_axis(), self.z);

        match self.order {
            EulerOrder::XYZ => qx * qy * qz,
            EulerOrder::YZX => qy * qz * qx,
            EulerOrder::ZXY => qz * qx * qy,
            EulerOrder::XZY => qx * qz * qy,
            EulerOrder::YXZ => qy * qx * qz,
            EulerOrder::ZYX => qz * qy * qx,
        }
    }

    /// Homogeneous rotation matrix for this Euler
    pub fn to_rotation_matrix(&self) -> Mat4 {
        Mat4::make_rotation_from_quaternion(&self.to_quaternion())
    }
}

impl Observable for Euler {
    fn change_emitter(&mut self) -> &mut ChangeEmitter<Self> {
        &mut self.change_event
    }
}

impl PartialEq for Euler {
    fn eq(&self, other: &Self) -> bool {
        self.equals(other)
    }
}

impl AbsDiffEq for Euler {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.order == other.order
            && self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}

impl RelativeEq for Euler {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.order == other.order
            && self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
    }
}

impl From<&Euler> for Quat {
    fn from(euler: &Euler) -> Self {
        euler.to_quaternion()
    }
}

/// Closed-form `(x, y, z)` for each order. The first line of every arm reads
/// the element whose `asin` gives the middle angle.
fn angles_from_rotation_matrix(m: &Mat4, order: EulerOrder) -> (f32, f32, f32) {
    let asin = |v: f32| utils::clamp(v, -1.0, 1.0).asin();
    let regular = |v: f32| v.abs() < GIMBAL_LOCK_THRESHOLD;

    let angles = match order {
        EulerOrder::XYZ => {
            let m13 = m[M13];
            let y = asin(m13);
            if regular(m13) {
                ((-m[M23]).atan2(m[M33]), y, (-m[M12]).atan2(m[M11]))
            } else {
                (m[M32].atan2(m[M22]), y, 0.0)
            }
        }
        EulerOrder::YXZ => {
            let m23 = m[M23];
            let x = asin(-m23);
            if regular(m23) {
                (x, m[M13].atan2(m[M33]), m[M21].atan2(m[M22]))
            } else {
                (x, (-m[M31]).atan2(m[M11]), 0.0)
            }
        }
        EulerOrder::ZXY => {
            let m32 = m[M32];
            let x = asin(m32);
            if regular(m32) {
                (x, (-m[M31]).atan2(m[M33]), (-m[M12]).atan2(m[M22]))
            } else {
                (x, 0.0, m[M21].atan2(m[M11]))
            }
        }
        EulerOrder::ZYX => {
            let m31 = m[M31];
            let y = asin(-m31);
            if regular(m31) {
                (m[M32].atan2(m[M33]), y, m[M21].atan2(m[M11]))
            } else {
                (0.0, y, (-m[M12]).atan2(m[M22]))
            }
        }
        EulerOrder::YZX => {
            let m21 = m[M21];
            let z = asin(m21);
            if regular(m21) {
                ((-m[M23]).atan2(m[M22]), (-m[M31]).atan2(m[M11]), z)
            } else {
                (0.0, m[M13].atan2(m[M33]), z)
            }
        }
        EulerOrder::XZY => {
            let m12 = m[M12];
            let z = asin(-m12);
            if regular(m12) {
                (m[M32].atan2(m[M22]), m[M13].atan2(m[M11]), z)
            } else {
                ((-m[M23]).atan2(m[M33]), 0.0, z)
            }
        }
    };

    if !regular(lock_element(m, order)) {
        log::trace!("Gimbal lock while decomposing {:?} rotation", order);
    }

    angles
}

/// Element whose magnitude decides the gimbal-lock branch for `order`
fn lock_element(m: &Mat4, order: EulerOrder) -> f32 {
    match order {
        EulerOrder::XYZ => m[M13],
        EulerOrder::YXZ => m[M23],
        EulerOrder::ZXY => m[M32],
        EulerOrder::ZYX => m[M31],
        EulerOrder::YZX => m[M21],
        EulerOrder::XZY => m[M12],
    }
}
