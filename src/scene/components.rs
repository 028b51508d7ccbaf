//! Components stored on scene nodes

use std::ops::Mul;

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// World transform of a scene node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position in world space
    pub position: Vec3,
    /// Rotation as a quaternion
    pub rotation: Quat,
    /// Scale factor
    pub scale: Vec3,
}

impl Transform {
    /// Create a transform with position and rotation
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Point the node's forward axis (negative Z) along `direction`
    pub fn set_direction(&mut self, direction: Vec3) {
        if let Some(direction) = direction.try_normalize() {
            self.rotation = Quat::from_rotation_arc(Vec3::NEG_Z, direction);
        }
    }

    /// Get the forward direction (negative Z in local space)
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

/// RGBA colour, components nominally in 0..=1
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Colour {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Colour {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);

    /// Opaque colour from red, green and blue
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Convert hue (degrees), saturation, lightness and alpha to RGBA.
    ///
    /// rapier's debug renderer hands out colours in this form.
    #[must_use]
    pub fn from_hsla([h, s, l, a]: [f32; 4]) -> Self {
        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let h = h.rem_euclid(360.0) / 60.0;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        Self {
            r: r + m,
            g: g + m,
            b: b + m,
            a,
        }
    }
}

impl Default for Colour {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Scales the colour channels, alpha is left alone
impl Mul<f32> for Colour {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self {
            r: self.r * rhs,
            g: self.g * rhs,
            b: self.b * rhs,
            a: self.a,
        }
    }
}

/// Name component, unique per generated resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Drawable geometry attached to a node
#[derive(Debug, Clone, PartialEq)]
pub struct Renderable {
    /// Mesh resource name
    pub mesh: String,
    /// Material override, `None` uses the mesh's own
    pub material: Option<String>,
    /// Whether the geometry casts shadows
    pub casts_shadows: bool,
}

/// Kind of light source
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Light emitted from a point in every direction
    Point,
    /// Parallel light along the node's forward axis
    Directional,
    /// Cone of light along the node's forward axis, angles in radians
    Spot { inner: f32, outer: f32 },
}

/// Light component
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub diffuse: Colour,
    pub specular: Colour,
}

/// Sky dome settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyDome {
    pub material: String,
    pub curvature: f32,
    pub tiling: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_colour_eq(a: Colour, b: Colour) {
        assert!((a.r - b.r).abs() < 1e-5, "{a:?} != {b:?}");
        assert!((a.g - b.g).abs() < 1e-5, "{a:?} != {b:?}");
        assert!((a.b - b.b).abs() < 1e-5, "{a:?} != {b:?}");
        assert!((a.a - b.a).abs() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn test_hsla_primaries() {
        assert_colour_eq(Colour::from_hsla([0.0, 1.0, 0.5, 1.0]), Colour::RED);
        assert_colour_eq(Colour::from_hsla([120.0, 1.0, 0.5, 1.0]), Colour::GREEN);
        assert_colour_eq(Colour::from_hsla([240.0, 1.0, 0.5, 1.0]), Colour::BLUE);
        assert_colour_eq(Colour::from_hsla([42.0, 0.0, 1.0, 0.5]), Colour { a: 0.5, ..Colour::WHITE });
    }

    #[test]
    fn test_colour_scale_keeps_alpha() {
        let dimmed = Colour::WHITE * 0.3;
        assert_colour_eq(dimmed, Colour { r: 0.3, g: 0.3, b: 0.3, a: 1.0 });
    }

    #[test]
    fn test_set_direction() {
        let mut transform = Transform::default();
        transform.set_direction(Vec3::new(0.0, -1.0, 1.0));
        let expected = Vec3::new(0.0, -1.0, 1.0).normalize();
        assert!(transform.forward().abs_diff_eq(expected, 1e-5));

        // Zero direction leaves rotation untouched
        let before = transform.rotation;
        transform.set_direction(Vec3::ZERO);
        assert_eq!(transform.rotation, before);
    }
}
