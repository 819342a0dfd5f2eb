//! Conversão de coordenadas do lado receptor.
//!
//! O sender amostra em espaço left-handed Y-up; a câmera receptora vive em
//! espaço right-handed Z-up e olha para -Z, daí o offset de +90° em X.

use crate::types::Pose;

/// cos(45°) == sin(45°)
const HALF_SQRT_2: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Rotação de +90° em torno de X (w, x, y, z).
pub const CAMERA_OFFSET: [f32; 4] = [HALF_SQRT_2, HALF_SQRT_2, 0.0, 0.0];

/// Pose já no espaço Z-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZUpPose {
    pub location: [f32; 3],
    /// w, x, y, z
    pub rotation: [f32; 4],
}

/// Converte uma pose recebida para o espaço Z-up.
pub fn to_z_up(pose: &Pose) -> ZUpPose {
    let [px, py, pz] = pose.position;
    let [rw, rx, ry, rz] = pose.rotation;

    let raw = [rw, rx, -rz, ry];
    ZUpPose {
        location: [px, pz, py],
        rotation: quat_mul(raw, CAMERA_OFFSET),
    }
}

/// Produto de Hamilton `a ⊗ b`, sem normalização.
pub fn quat_mul(a: [f32; 4], b: [f32; 4]) -> [f32; 4] {
    let [aw, ax, ay, az] = a;
    let [bw, bx, by, bz] = b;
    [
        aw * bw - ax * bx - ay * by - az * bz,
        aw * bx + ax * bw + ay * bz - az * by,
        aw * by - ax * bz + ay * bw + az * bx,
        aw * bz + ax * by - ay * bx + az * bw,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: [f32; 4], b: [f32; 4]) -> bool {
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-6)
    }

    #[test]
    fn swaps_y_and_z_in_location() {
        let pose = Pose {
            position: [1.0, 2.0, 3.0],
            ..Pose::IDENTITY
        };
        assert_eq!(to_z_up(&pose).location, [1.0, 3.0, 2.0]);
    }

    #[test]
    fn identity_becomes_camera_offset() {
        assert!(approx(to_z_up(&Pose::IDENTITY).rotation, CAMERA_OFFSET));
    }

    #[test]
    fn hamilton_product_basics() {
        let i = [0.0, 1.0, 0.0, 0.0];
        let j = [0.0, 0.0, 1.0, 0.0];
        let k = [0.0, 0.0, 0.0, 1.0];
        assert!(approx(quat_mul(i, j), k));
        assert!(approx(quat_mul(j, i), [0.0, 0.0, 0.0, -1.0]));
        assert!(approx(quat_mul(i, i), [-1.0, 0.0, 0.0, 0.0]));
    }

    #[test]
    fn yaw_maps_to_z_axis() {
        // 90° em torno de Y (up do sender) vira 90° em torno de Z antes do offset
        let pose = Pose {
            position: [0.0; 3],
            rotation: [HALF_SQRT_2, 0.0, HALF_SQRT_2, 0.0],
        };
        let expected = quat_mul([HALF_SQRT_2, 0.0, 0.0, HALF_SQRT_2], CAMERA_OFFSET);
        assert!(approx(to_z_up(&pose).rotation, expected));
    }
}
