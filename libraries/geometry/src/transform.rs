use core::f32::consts::{FRAC_PI_2, PI};

use glam::{Mat4, Vec3};

/// Millimeters per meter.
pub const MILLIMETERS_PER_METER: f32 = 1000.0;

/// Quarter turn about the X axis that lays glTF's Y-up axis onto the Z axis.
///
/// On its own this maps +Y to -Z; [`flip_upside_down`] completes the change to Z-up.
#[must_use]
pub fn y_up_to_z_up() -> Mat4 {
    Mat4::from_rotation_x(-FRAC_PI_2)
}

/// Turns the model upside down around the X axis.
#[must_use]
pub fn flip_upside_down() -> Mat4 {
    Mat4::from_rotation_x(PI)
}

/// Scales glTF meters to STL millimeters.
#[must_use]
pub fn meters_to_millimeters() -> Mat4 {
    Mat4::from_scale(Vec3::splat(MILLIMETERS_PER_METER))
}

/// A sequence of affine steps, each one applied to the result of the previous one.
///
/// The [`Default`] is the fixed glTF-to-STL pipeline: [`y_up_to_z_up`], then
/// [`flip_upside_down`], then [`meters_to_millimeters`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTransform {
    steps: Vec<Mat4>,
}

impl ExportTransform {
    /// A transform without any steps.
    #[must_use]
    pub fn identity() -> Self {
        Self { steps: Vec::new() }
    }

    /// Appends `step`, to be applied after all previous steps.
    #[must_use]
    pub fn then(mut self, step: Mat4) -> Self {
        self.steps.push(step);
        self
    }

    /// The individual steps in the order they are applied.
    #[must_use]
    pub fn steps(&self) -> &[Mat4] {
        &self.steps
    }

    /// The single matrix equivalent to applying all steps in order.
    ///
    /// For steps `[A, B, C]` this is `C * B * A`.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        self.steps
            .iter()
            .fold(Mat4::IDENTITY, |composed, step| *step * composed)
    }
}

impl Default for ExportTransform {
    fn default() -> Self {
        Self::identity()
            .then(y_up_to_z_up())
            .then(flip_upside_down())
            .then(meters_to_millimeters())
    }
}
