use image::RgbImage;

use super::config::{validate_parameters, Config};
use super::error::AnalyzeError;
use super::metric::average::block_average;
use super::metric::ErrorMetric;
use super::{Block, QuadtreeNode};

impl QuadtreeNode {
	/// Analyzes an image into a quadtree using the method, threshold and
	/// minimum block size in `config`.
	///
	/// Fails if `config` doesn't validate or the image has no pixels; no
	/// other error can occur.
	pub fn from_image(img: &RgbImage, config: &Config) -> Result<Self, AnalyzeError> {
		Self::from_image_with(img, &config.method, config.threshold, config.min_block_size)
	}

	/// Like `from_image`, but with any implementor of `ErrorMetric`.
	pub fn from_image_with<M: ErrorMetric + ?Sized>(
		img: &RgbImage,
		metric: &M,
		threshold: f64,
		min_block_size: u32
	) -> Result<Self, AnalyzeError> {
		validate_parameters(threshold, min_block_size)?;
		if img.width() == 0 || img.height() == 0 {
			return Err(AnalyzeError::EmptyImage);
		}
		let mut root = QuadtreeNode::new(Block::of_image(img));
		root.build(img, metric, threshold, min_block_size);
		log::debug!(
			"built quadtree for {}x{} image: depth {}, {} nodes, {} leaves",
			img.width(),
			img.height(),
			root.depth(),
			root.count(),
			root.leaf_count()
		);
		Ok(root)
	}

	/// Computes this node's color and, if the block is not uniform enough
	/// and large enough, splits it and recurses into the four quadrants
	/// (NW, NE, SW, SE).
	///
	/// A block splits only if its error is strictly greater than
	/// `threshold` and every quadrant would still be at least
	/// `min_block_size` in both dimensions. Parameters are assumed valid.
	pub fn build<M: ErrorMetric + ?Sized>(
		&mut self,
		img: &RgbImage,
		metric: &M,
		threshold: f64,
		min_block_size: u32
	) {
		self.color = block_average(img, &self.block);
		let error = metric.calculate_error(img, &self.block);
		if error > threshold && self.block.can_split(min_block_size) {
			self.split();
			if let Some(ref mut sects) = self.sections {
				for section in sects.iter_mut() {
					section.build(img, metric, threshold, min_block_size);
				}
			}
		}
	}

	/// Paints every leaf's block, clipped to the buffer, with the leaf's
	/// color.
	///
	/// Pixels not covered by any leaf are left untouched.
	pub fn paint(&self, img: &mut RgbImage) {
		match self.sections {
			Some(ref sects) => {
				for section in sects.iter() {
					section.paint(img);
				}
			},
			None => {
				let (cols, rows) = self.block.clip(img.width(), img.height());
				for row in rows {
					for col in cols.clone() {
						img.put_pixel(col, row, self.color);
					}
				}
			}
		}
	}

	/// Renders the tree over a copy of `source`, so pixels outside every
	/// leaf keep their original color.
	pub fn to_image(&self, source: &RgbImage) -> RgbImage {
		let mut output = source.clone();
		self.paint(&mut output);
		output
	}
}
