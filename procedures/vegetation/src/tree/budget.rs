/// Headroom over the node count for branch instances.
pub const OVERALL_BUFFER_FACTOR: f64 = 1.5;

/// Extra headroom for leaves, which come in pairs per terminal segment.
pub const LEAF_BUFFER_MULTIPLIER: f64 = 1.5;

/// Output buffers never reserve more than this up front, whatever the budget says.
pub const MAX_PREALLOCATED_INSTANCES: usize = 1 << 16;

/// Upper bound on instances a tree with this shape may emit.
///
/// The node count of a full `num_branches`-ary tree of depth `max_depth`
/// (root included) scaled by both buffer factors and rounded up. The result
/// bounds the branch array and the leaf array separately.
///
/// With `num_branches == 0` only the root counts. Arithmetic saturates.
pub fn estimate_instance_budget(max_depth: u32, num_branches: u32) -> usize {
	let count = match num_branches {
		0 => 1,
		1 => max_depth as u64 + 1,
		_ => full_tree_nodes(max_depth, num_branches as u64),
	};

	let budget = (count as f64 * OVERALL_BUFFER_FACTOR * LEAF_BUFFER_MULTIPLIER).ceil();
	if budget >= usize::MAX as f64 {
		usize::MAX
	} else {
		budget as usize
	}
}

/// Node count for a branching factor of at least two. Levels grow at least
/// geometrically, so the count saturates within 64 levels.
fn full_tree_nodes(max_depth: u32, num_branches: u64) -> u64 {
	let mut count: u64 = 0;
	let mut level_nodes: u64 = 1;
	for _ in 0..=max_depth {
		count = count.saturating_add(level_nodes);
		if count == u64::MAX {
			break;
		}
		level_nodes = level_nodes.saturating_mul(num_branches);
	}
	count
}

/// Capacity to reserve for a buffer bounded by `budget`.
pub fn preallocation(budget: usize) -> usize {
	budget.min(MAX_PREALLOCATED_INSTANCES)
}
