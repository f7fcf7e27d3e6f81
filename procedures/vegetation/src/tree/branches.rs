use super::{
	config::ResolvedTreeConfig,
	leaves::emit_leaf_pair,
	sink::{InstanceSink, Segment},
	transform::{child_orientation, segment_local, segment_tip},
};
use crate::random::RandomSource;
use bevy::math::Mat4;

/// Segments at or below this length terminate.
pub const MIN_SEGMENT_LENGTH: f32 = 0.01;

/// Siblings may drift this fraction of the even spacing away from their slot.
pub const SPREAD_JITTER_FRACTION: f32 = 0.4;

/// A drawn segment whose children are still being grown.
#[derive(Debug, Clone, Copy)]
struct Fork {
	level: u32,
	children_base: Mat4,
	length: f32,
	radius: f32,
	next_child: u32,
}

/// Depth-first branch recursion over a resolved config.
///
/// Pending forks live on a heap stack rather than the call stack, so a long
/// single chain costs memory bounded by the budget instead of stack frames.
/// Children are still visited, and random draws still taken, in plain
/// depth-first order.
///
/// Every emission is bounded by `budget`: at most `budget` branches and at
/// most `budget` leaves. Whenever the budget forces geometry to be dropped the
/// builder remembers it, see [`BranchRecursion::truncated`].
pub struct BranchRecursion<'a, R: RandomSource + ?Sized> {
	config: &'a ResolvedTreeConfig,
	budget: usize,
	random: &'a mut R,
	truncated: bool,
}

impl<'a, R: RandomSource + ?Sized> BranchRecursion<'a, R> {
	pub fn new(config: &'a ResolvedTreeConfig, budget: usize, random: &'a mut R) -> Self {
		Self { config, budget, random, truncated: false }
	}

	/// Whether any segment or sibling was dropped because of the budget.
	pub fn truncated(&self) -> bool {
		self.truncated
	}

	/// Grows the whole tree from the trunk at the identity frame.
	pub fn grow<S: InstanceSink + ?Sized>(&mut self, sink: &mut S) {
		let config = self.config;
		let mut forks = Vec::new();
		self.visit(sink, &mut forks, 0, Mat4::IDENTITY, config.initial_length, config.initial_radius);

		while let Some(fork) = forks.last_mut() {
			if fork.next_child >= config.num_branches {
				forks.pop();
				continue;
			}

			if sink.branch_count() >= self.budget {
				log::debug!(
					"budget of {} reached at level {}, dropping {} sibling(s)",
					self.budget,
					fork.level,
					config.num_branches - fork.next_child
				);
				self.truncated = true;
				forks.pop();
				continue;
			}

			let index = fork.next_child;
			fork.next_child += 1;
			let parent = *fork;

			let (child_base, child_length, child_radius) = self.child(&parent, index);
			self.visit(sink, &mut forks, parent.level + 1, child_base, child_length, child_radius);
		}
	}

	fn is_terminal(&self, level: u32, length: f32, radius: f32) -> bool {
		level >= self.config.max_depth
			|| length <= MIN_SEGMENT_LENGTH
			|| radius < self.config.min_radius
	}

	fn leaf_room<S: InstanceSink + ?Sized>(&self, sink: &S) -> bool {
		sink.leaf_count() < self.budget.saturating_sub(1)
	}

	fn limit_reached<S: InstanceSink + ?Sized>(&self, sink: &S) -> bool {
		sink.branch_count() >= self.budget || !self.leaf_room(sink)
	}

	/// Handles the segment starting at `base`.
	///
	/// Terminal segments emit a pair of leaves (never on the trunk) and no
	/// branch instance. Otherwise the segment is drawn and queued as a fork.
	fn visit<S: InstanceSink + ?Sized>(
		&mut self,
		sink: &mut S,
		forks: &mut Vec<Fork>,
		level: u32,
		base: Mat4,
		length: f32,
		radius: f32,
	) {
		let segment = Segment { level, length, radius };

		if self.is_terminal(level, length, radius) {
			if level > 0 {
				if self.leaf_room(sink) {
					emit_leaf_pair(sink, &mut *self.random, &segment, base, self.config.leaf_size);
				} else {
					self.truncated = true;
				}
			}
			return;
		}

		if self.limit_reached(sink) {
			self.truncated = true;
			return;
		}

		let radius = radius.max(self.config.min_radius);
		sink.push_branch(&segment, base * segment_local(length, radius));

		forks.push(Fork {
			level,
			children_base: segment_tip(base, length),
			length,
			radius,
			next_child: 0,
		});
	}

	/// Draws the jitter for child `index` of `parent` and returns its base
	/// frame, length and radius.
	fn child(&mut self, parent: &Fork, index: u32) -> (Mat4, f32, f32) {
		let config = self.config;
		let num_branches = config.num_branches;
		let angle_step = if num_branches > 1 { 360.0 / num_branches as f32 } else { 0.0 };

		let length_jitter =
			1.0 + self.random.next_centered() * 2.0 * (config.length_variance / 100.0);
		let angle_jitter = self.random.next_centered() * 2.0 * config.angle_variance;
		let spread_jitter = self.random.next_centered() * (angle_step * SPREAD_JITTER_FRACTION);

		// radius deliberately carries no variance
		let child_length = parent.length * config.length_factor * length_jitter;
		let child_radius = parent.radius * config.radius_factor;

		let tilt = config.branch_angle + angle_jitter;
		let spread = angle_step * index as f32 + spread_jitter;
		let child_base = parent.children_base * Mat4::from_quat(child_orientation(spread, tilt));

		(child_base, child_length, child_radius)
	}
}
