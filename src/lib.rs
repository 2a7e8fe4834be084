pub mod compress;
pub mod node;

pub use node::*;

use std::fmt;

/// Summary of a finished quadtree, for reporting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
	/// Number of levels; 1 for a tree that never split.
	pub depth: usize,
	/// Number of nodes, branch nodes included.
	pub nodes: usize,
	/// Number of leaves, i.e. flat blocks in the rendered image.
	pub leaves: usize,
}

impl fmt::Display for TreeStats {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "depth {}, {} nodes, {} leaves", self.depth, self.nodes, self.leaves)
	}
}

/// Depth of a (possibly absent) tree: 0 for `None`, 1 for a leaf.
pub fn depth(node: Option<&QuadtreeNode>) -> usize {
	match node {
		None => 0,
		Some(QuadtreeNode { sections: None, .. }) => 1,
		Some(QuadtreeNode { sections: Some(sects), .. }) =>
			1 + sects.iter().map(|s| depth(Some(s))).max().unwrap_or(0),
	}
}

/// Number of nodes in a (possibly absent) tree, branch nodes included.
pub fn count(node: Option<&QuadtreeNode>) -> usize {
	match node {
		None => 0,
		Some(QuadtreeNode { sections: None, .. }) => 1,
		Some(QuadtreeNode { sections: Some(sects), .. }) =>
			1 + sects.iter().map(|s| count(Some(s))).sum::<usize>(),
	}
}

impl node::QuadtreeNode {
	pub fn depth(&self) -> usize {
		depth(Some(self))
	}

	pub fn count(&self) -> usize {
		count(Some(self))
	}

	pub fn leaf_count(&self) -> usize {
		self.leaves().count()
	}

	pub fn stats(&self) -> TreeStats {
		TreeStats {
			depth: self.depth(),
			nodes: self.count(),
			leaves: self.leaf_count(),
		}
	}
}
