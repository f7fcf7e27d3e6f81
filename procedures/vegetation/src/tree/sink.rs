use bevy::math::Mat4;

/// The recursion-call parameters of one segment at emission time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
	pub level: u32,
	pub length: f32,
	pub radius: f32,
}

/// Where the generator appends its instances.
///
/// Counts drive the budget checks, so an implementation must report exactly
/// what it has accepted.
pub trait InstanceSink {
	fn branch_count(&self) -> usize;

	fn leaf_count(&self) -> usize;

	fn push_branch(&mut self, segment: &Segment, transform: Mat4);

	fn push_leaf(&mut self, segment: &Segment, transform: Mat4);
}

/// Plain branch and leaf arrays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceBuffers {
	pub branches: Vec<Mat4>,
	pub leaves: Vec<Mat4>,
}

impl InstanceBuffers {
	pub fn with_capacity(capacity: usize) -> Self {
		Self { branches: Vec::with_capacity(capacity), leaves: Vec::with_capacity(capacity) }
	}
}

impl InstanceSink for InstanceBuffers {
	fn branch_count(&self) -> usize {
		self.branches.len()
	}

	fn leaf_count(&self) -> usize {
		self.leaves.len()
	}

	fn push_branch(&mut self, _segment: &Segment, transform: Mat4) {
		self.branches.push(transform);
	}

	fn push_leaf(&mut self, _segment: &Segment, transform: Mat4) {
		self.leaves.push(transform);
	}
}
