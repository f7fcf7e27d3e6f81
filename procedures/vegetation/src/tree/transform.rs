//! Transform composition for branch and leaf instances.
//!
//! Matrices are `glam` [`Mat4`]s: column-major storage, column vectors, and
//! `a * b` applies `b` first. A child transform is always `parent * local`.
//! Flattened instances use [`Mat4::to_cols_array`] order.

use bevy::math::{EulerRot, Mat4, Quat, Vec3};

/// Places the unit cylinder (radius 0.5, height 1, centred on the origin) so
/// that it spans `[0, length]` along local Y with the given radius.
///
/// Scale first, then lift by half the length.
pub fn segment_local(length: f32, radius: f32) -> Mat4 {
	let diameter = radius * 2.0;
	Mat4::from_translation(Vec3::new(0.0, length / 2.0, 0.0))
		* Mat4::from_scale(Vec3::new(diameter, length, diameter))
}

/// The frame at the tip of a segment whose base frame is `base`.
pub fn segment_tip(base: Mat4, length: f32) -> Mat4 {
	base * Mat4::from_translation(Vec3::new(0.0, length, 0.0))
}

/// Child orientation relative to the parent tip.
///
/// The spread rotation about Y is the outer factor, so the tilt about X acts
/// in the already spread frame: children fan out around the parent axis and
/// each leans away from it.
pub fn child_orientation(spread_degrees: f32, tilt_degrees: f32) -> Quat {
	Quat::from_rotation_y(spread_degrees.to_radians())
		* Quat::from_rotation_x(tilt_degrees.to_radians())
}

/// Intrinsic X, then Y, then Z rotation.
pub fn leaf_rotation(x: f32, y: f32, z: f32) -> Quat {
	Quat::from_euler(EulerRot::XYZ, x, y, z)
}

/// `position * rotation * uniform_scale(size)`.
pub fn leaf_transform(position: Mat4, rotation: Quat, size: f32) -> Mat4 {
	position * Mat4::from_quat(rotation) * Mat4::from_scale(Vec3::splat(size))
}

/// Flattens instances into 16-float column-major arrays.
pub fn flatten(transforms: &[Mat4]) -> Vec<[f32; 16]> {
	transforms.iter().map(Mat4::to_cols_array).collect()
}

pub fn unflatten(flat: &[[f32; 16]]) -> Vec<Mat4> {
	flat.iter().map(Mat4::from_cols_array).collect()
}

#[cfg(test)]
mod tests {
	use super::*;

	const EPSILON: f32 = 1e-5;

	#[test]
	fn test_segment_local_spans_base_to_tip() {
		let local = segment_local(4.0, 0.25);
		let base = local.transform_point3(Vec3::new(0.0, -0.5, 0.0));
		let tip = local.transform_point3(Vec3::new(0.0, 0.5, 0.0));
		let rim = local.transform_point3(Vec3::new(0.5, 0.0, 0.0));

		assert!(base.abs_diff_eq(Vec3::ZERO, EPSILON));
		assert!(tip.abs_diff_eq(Vec3::new(0.0, 4.0, 0.0), EPSILON));
		assert!(rim.abs_diff_eq(Vec3::new(0.25, 2.0, 0.0), EPSILON));
	}

	#[test]
	fn test_tip_follows_base_orientation() {
		let base = Mat4::from_quat(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2));
		let tip = segment_tip(base, 2.0);
		let origin = tip.transform_point3(Vec3::ZERO);
		assert!(origin.abs_diff_eq(Vec3::new(-2.0, 0.0, 0.0), EPSILON));
	}

	#[test]
	fn test_orientation_tilts_in_spread_frame() {
		// a quarter turn of spread moves the tilt from the YZ plane into the XY plane
		let up = Vec3::Y;
		let tilted = child_orientation(0.0, 90.0) * up;
		assert!(tilted.abs_diff_eq(Vec3::Z, EPSILON));

		let spread = child_orientation(90.0, 90.0) * up;
		assert!(spread.abs_diff_eq(Vec3::X, EPSILON));
	}

	#[test]
	fn test_orientation_keeps_tilt_angle() {
		for spread in [0.0, 45.0, 120.0, 300.0] {
			let direction = child_orientation(spread, 30.0) * Vec3::Y;
			let angle = direction.angle_between(Vec3::Y).to_degrees();
			assert!((angle - 30.0).abs() < 1e-3);
		}
	}

	#[test]
	fn test_leaf_transform_scales_uniformly() {
		let leaf = leaf_transform(Mat4::IDENTITY, leaf_rotation(0.3, 1.2, 2.0), 0.5);
		let (scale, _, translation) = leaf.to_scale_rotation_translation();
		assert!(scale.abs_diff_eq(Vec3::splat(0.5), EPSILON));
		assert!(translation.abs_diff_eq(Vec3::ZERO, EPSILON));
	}

	#[test]
	fn test_flatten_is_column_major() {
		let translation = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
		let flat = flatten(&[translation]);
		assert_eq!(&flat[0][12..15], &[1.0, 2.0, 3.0]);
		assert_eq!(unflatten(&flat), vec![translation]);
	}
}
