use super::{
	sink::{InstanceSink, Segment},
	transform::{leaf_rotation, leaf_transform, segment_tip},
};
use crate::random::RandomSource;
use bevy::math::{Mat4, Quat};
use std::f32::consts::{PI, TAU};

/// A random leaf orientation, three fresh draws.
///
/// X and Z angles cover `[0, π)`, the Y angle covers `[0, 2π)`.
pub fn random_leaf_rotation<R: RandomSource + ?Sized>(random: &mut R) -> Quat {
	let x = random.next_scaled(PI);
	let y = random.next_scaled(TAU);
	let z = random.next_scaled(PI);
	leaf_rotation(x, y, z)
}

/// Hangs a leaf on the base and one on the tip of a terminal segment.
pub fn emit_leaf_pair<S, R>(sink: &mut S, random: &mut R, segment: &Segment, base: Mat4, size: f32)
where
	S: InstanceSink + ?Sized,
	R: RandomSource + ?Sized,
{
	let tip = segment_tip(base, segment.length);
	for position in [base, tip] {
		let rotation = random_leaf_rotation(random);
		sink.push_leaf(segment, leaf_transform(position, rotation, size));
	}
}
