pub mod config;
pub mod error;
pub mod metric;

/// Color of a block; the average of its pixels once the tree is built.
pub type Color = ::image::Rgb<u8>;

/// Splits a dimension into the sizes of its two halves.
///
/// The first (north/west) half takes the larger share when `dim` is odd, so
/// the two parts always add up to `dim` exactly. Both the split guard and
/// the split itself go through this function.
pub fn halve(dim: u32) -> (u32, u32) {
	let first = dim - dim / 2;
	(first, dim - first)
}

/// Axis-aligned rectangle of an image, given by its top-left corner and size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Block {
	pub x: u32,
	pub y: u32,
	pub width: u32,
	pub height: u32,
}

impl Block {
	pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
		Block { x, y, width, height }
	}

	/// Block covering a whole image.
	pub fn of_image<I: ::image::GenericImageView>(img: &I) -> Self {
		Block::new(0, 0, img.width(), img.height())
	}

	pub fn area(&self) -> u64 {
		self.width as u64 * self.height as u64
	}

	/// Intersects the block with `[0, width) × [0, height)`.
	///
	/// Returns the column range and row range actually covered; either may
	/// be empty if the block lies (partially) outside.
	pub fn clip(&self, width: u32, height: u32) -> (std::ops::Range<u32>, std::ops::Range<u32>) {
		let x_end = self.x.saturating_add(self.width).min(width);
		let y_end = self.y.saturating_add(self.height).min(height);
		(self.x.min(x_end)..x_end, self.y.min(y_end)..y_end)
	}

	/// The four quadrants in NW, NE, SW, SE order.
	///
	/// North and west quadrants get the larger half of odd dimensions; the
	/// union of the four is exactly `self`.
	pub fn quadrants(&self) -> [Block; 4] {
		let (west, east) = halve(self.width);
		let (north, south) = halve(self.height);
		[
			Block::new(self.x, self.y, west, north),
			Block::new(self.x + west, self.y, east, north),
			Block::new(self.x, self.y + north, west, south),
			Block::new(self.x + west, self.y + north, east, south),
		]
	}

	/// Whether splitting this block keeps every quadrant at least
	/// `min_size` wide and high.
	pub fn can_split(&self, min_size: u32) -> bool {
		self.width > min_size && self.height > min_size &&
			halve(self.width).1 >= min_size && halve(self.height).1 >= min_size
	}
}

/// Node in a quadtree approximating an image.
///
/// May contain subnodes (branch node) or no subnodes and just a color
/// (leaf node). Branch nodes keep the average of their whole block too,
/// though only leaf colors end up rendered.
#[derive(Clone, Debug, PartialEq)]
pub struct QuadtreeNode {
	pub block: Block,
	pub color: Color,
	pub sections: Option<Box<[QuadtreeNode; 4]>>,
}

impl QuadtreeNode {
	/// Creates a leaf covering `block`, with the default (black) color.
	pub fn new(block: Block) -> Self {
		QuadtreeNode {
			block,
			color: ::image::Rgb([0; 3]),
			sections: None,
		}
	}

	pub fn is_leaf(&self) -> bool {
		self.sections.is_none()
	}

	/// Turns a leaf into a branch node with four fresh leaf children.
	///
	/// Does nothing if the node is already split.
	pub fn split(&mut self) {
		if self.sections.is_none() {
			let [nw, ne, sw, se] = self.block.quadrants();
			self.sections = Some(Box::new([
				QuadtreeNode::new(nw),
				QuadtreeNode::new(ne),
				QuadtreeNode::new(sw),
				QuadtreeNode::new(se),
			]));
		}
	}

	/// Iterates over the leaves below (or at) this node, in NW, NE, SW, SE
	/// depth-first order.
	pub fn leaves(&self) -> Leaves<'_> {
		Leaves { stack: vec![self] }
	}
}

/// Iterator returned by [`QuadtreeNode::leaves`].
pub struct Leaves<'a> {
	stack: Vec<&'a QuadtreeNode>,
}

impl<'a> Iterator for Leaves<'a> {
	type Item = &'a QuadtreeNode;

	fn next(&mut self) -> Option<Self::Item> {
		while let Some(node) = self.stack.pop() {
			match node.sections {
				Some(ref sects) => self.stack.extend(sects.iter().rev()),
				None => return Some(node),
			}
		}
		None
	}
}

pub mod image;
