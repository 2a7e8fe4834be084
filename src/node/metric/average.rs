use image::RgbImage;

use super::super::{Block, Color};

/// Iterates over the raw `[r, g, b]` channel triples of every pixel in
/// `block`, clipped to the image bounds, row by row.
pub fn block_pixels<'a>(img: &'a RgbImage, block: &Block) -> impl Iterator<Item = &'a [u8]> + 'a {
	let (cols, rows) = block.clip(img.width(), img.height());
	let (col_start, col_end) = (cols.start as usize * 3, cols.end as usize * 3);
	let stride = img.width() as usize * 3;
	let raw: &'a [u8] = img.as_raw();
	rows.flat_map(move |row| {
		let row_start = row as usize * stride;
		raw[row_start + col_start..row_start + col_end].chunks_exact(3)
	})
}

/// Per-channel sums and the number of pixels summed.
pub fn channel_sums(img: &RgbImage, block: &Block) -> ([u64; 3], u64) {
	block_pixels(img, block).fold(([0; 3], 0), |(mut sums, count), px| {
		for (sum, &v) in sums.iter_mut().zip(px) {
			*sum += v as u64;
		}
		(sums, count + 1)
	})
}

/// Exact per-channel mean of the block, or `None` if the clipped block is
/// empty.
pub fn channel_means(img: &RgbImage, block: &Block) -> Option<[f64; 3]> {
	let (sums, count) = channel_sums(img, block);
	if count == 0 {
		return None;
	}
	let n = count as f64;
	Some([sums[0] as f64 / n, sums[1] as f64 / n, sums[2] as f64 / n])
}

/// Average color of the block, each channel rounded to the nearest integer
/// (halves round up).
///
/// An empty clipped block gives black, the default node color.
pub fn block_average(img: &RgbImage, block: &Block) -> Color {
	let (sums, count) = channel_sums(img, block);
	if count == 0 {
		return image::Rgb([0; 3]);
	}
	let mean = |sum: u64| ((sum + count / 2) / count).min(255) as u8;
	image::Rgb([mean(sums[0]), mean(sums[1]), mean(sums[2])])
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn average_rounds_to_nearest() {
		// Channel values 0 and 1 average to 0.5, which rounds up
		let mut img = RgbImage::new(2, 1);
		img.put_pixel(0, 0, image::Rgb([0, 10, 200]));
		img.put_pixel(1, 0, image::Rgb([1, 13, 201]));
		assert_eq!(block_average(&img, &Block::new(0, 0, 2, 1)), image::Rgb([1, 12, 201]));
	}

	#[test]
	fn average_of_clipped_block() {
		let mut img = RgbImage::from_pixel(3, 3, image::Rgb([90, 90, 90]));
		img.put_pixel(2, 2, image::Rgb([0, 0, 0]));
		// Only (2, 2) lies inside the image
		assert_eq!(block_average(&img, &Block::new(2, 2, 4, 4)), image::Rgb([0, 0, 0]));
		assert_eq!(block_pixels(&img, &Block::new(2, 2, 4, 4)).count(), 1);
		assert_eq!(block_pixels(&img, &Block::new(1, 0, 9, 9)).count(), 6);
	}

	#[test]
	fn empty_block_keeps_default() {
		let img = RgbImage::from_pixel(2, 2, image::Rgb([50, 60, 70]));
		assert_eq!(block_average(&img, &Block::new(5, 5, 2, 2)), image::Rgb([0, 0, 0]));
		assert_eq!(channel_means(&img, &Block::new(5, 5, 2, 2)), None);
	}

	#[test]
	fn pixels_come_in_row_order() {
		let img = RgbImage::from_fn(3, 2, |x, y| image::Rgb([x as u8, y as u8, 0]));
		let seen = block_pixels(&img, &Block::new(1, 0, 2, 2))
			.map(|px| (px[0], px[1]))
			.collect::<Vec<_>>();
		assert_eq!(seen, vec![(1, 0), (2, 0), (1, 1), (2, 1)]);
	}
}
