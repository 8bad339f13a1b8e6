//! Math types, glam re-exports and the small numeric helpers every entity
//! shares.
//!
//! We re-export [glam](https://docs.rs/glam) types so users don't need to
//! depend on it directly. The [`Transform`] type provides position, rotation,
//! and scale for every entity handed to the renderer.

pub use glam::{EulerRot, Mat4, Quat, Vec2, Vec3, Vec4};

/// A 3D transform: position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    /// Identity transform (origin, no rotation, uniform scale of 1).
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Create a transform at the given position.
    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self::from_translation(Vec3::new(x, y, z))
    }

    /// Create a transform at the given position.
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Return a copy rotated by XYZ Euler angles (radians), the order the
    /// animation code accumulates spin in.
    pub fn with_euler(mut self, angles: Vec3) -> Self {
        self.rotation = euler_quat(angles);
        self
    }

    /// Return a copy with uniform scale applied.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// Compute the 4x4 model matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Quaternion for XYZ Euler angles in radians.
pub fn euler_quat(angles: Vec3) -> Quat {
    Quat::from_euler(EulerRot::XYZ, angles.x, angles.y, angles.z)
}

/// Normalized closeness of something at distance `distance` from the pointer,
/// given an influence radius `threshold`.
///
/// Returns `(threshold - distance) / threshold` clamped to `[0, 1]`, and
/// exactly `0.0` once `distance >= threshold`.
pub fn proximity_factor(distance: f32, threshold: f32) -> f32 {
    if threshold <= 0.0 || distance >= threshold {
        return 0.0;
    }
    ((threshold - distance) / threshold).clamp(0.0, 1.0)
}

/// Planar (XY) distance between a world position and a world-space pointer.
pub fn planar_distance(position: Vec3, pointer: Vec2) -> f32 {
    position.truncate().distance(pointer)
}

/// Convert an HSL colour (all components in `[0, 1]`) to sRGB-encoded RGB.
///
/// Hue wraps, so `h = 1.2` is the same as `h = 0.2`. Like every colour the
/// scene produces, the result is display-encoded; renderers that blend in
/// linear space decode it with [`srgb_to_linear`].
pub fn hsl_to_rgb(h: f32, s: f32, l: f32) -> [f32; 3] {
    let h = h.rem_euclid(1.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return [l, l, l];
    }

    let p = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let q = 2.0 * l - p;

    [
        hue_to_channel(q, p, h + 1.0 / 3.0),
        hue_to_channel(q, p, h),
        hue_to_channel(q, p, h - 1.0 / 3.0),
    ]
}

fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * 6.0 * (2.0 / 3.0 - t)
    } else {
        p
    }
}

/// Convert a `0xRRGGBB` colour to RGB floats in `[0, 1]`.
pub fn rgb_hex(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Decode an sRGB-encoded colour to linear light.
pub fn srgb_to_linear(rgb: [f32; 3]) -> [f32; 3] {
    rgb.map(srgb_channel_to_linear)
}

fn srgb_channel_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proximity_is_linear_inside_threshold() {
        assert_eq!(proximity_factor(0.0, 5.0), 1.0);
        assert!((proximity_factor(2.5, 5.0) - 0.5).abs() < 1e-6);
        assert!((proximity_factor(4.0, 5.0) - 0.2).abs() < 1e-6);
    }

    #[test]
    fn proximity_is_zero_at_and_beyond_threshold() {
        assert_eq!(proximity_factor(5.0, 5.0), 0.0);
        assert_eq!(proximity_factor(12.0, 5.0), 0.0);
        assert_eq!(proximity_factor(1.0, 0.0), 0.0);
    }

    #[test]
    fn hsl_primaries() {
        let red = hsl_to_rgb(0.0, 1.0, 0.5);
        assert!((red[0] - 1.0).abs() < 1e-6 && red[1].abs() < 1e-6 && red[2].abs() < 1e-6);

        let green = hsl_to_rgb(1.0 / 3.0, 1.0, 0.5);
        assert!(green[0].abs() < 1e-5 && (green[1] - 1.0).abs() < 1e-5);

        let grey = hsl_to_rgb(0.7, 0.0, 0.25);
        assert_eq!(grey, [0.25, 0.25, 0.25]);
    }

    #[test]
    fn srgb_decode_keeps_endpoints_and_darkens_midtones() {
        assert_eq!(srgb_to_linear([0.0, 1.0, 0.04]), [0.0, 1.0, 0.04 / 12.92]);
        let mid = srgb_to_linear([0.5, 0.5, 0.5]);
        assert!((mid[0] - 0.214_041).abs() < 1e-4);
        assert_eq!(mid[0], mid[2]);
    }

    #[test]
    fn hex_colour_channels() {
        let c = rgb_hex(0x0092A2);
        assert_eq!(c[0], 0.0);
        assert!((c[1] - 146.0 / 255.0).abs() < 1e-6);
        assert!((c[2] - 162.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn transform_matrix_places_translation() {
        let t = Transform::from_xyz(1.0, 2.0, 3.0).with_scale(2.0);
        let p = t.matrix().transform_point3(Vec3::ZERO);
        assert_eq!(p, Vec3::new(1.0, 2.0, 3.0));
        let q = t.matrix().transform_point3(Vec3::X);
        assert!((q - Vec3::new(3.0, 2.0, 3.0)).length() < 1e-6);
    }
}
