//! Tests for loading, compressing and saving image files

use image::{Rgb, RgbImage, RgbaImage};

use quadtree_compress::compress::Compressor;
use quadtree_compress::config::Config;
use quadtree_compress::error::{AnalyzeError, CompressError};
use quadtree_compress::metric::ErrorMethod;

fn checker(size: u32, cell: u32) -> RgbImage {
	RgbImage::from_fn(size, size, |x, y| {
		if (x / cell + y / cell) % 2 == 0 { Rgb([250, 250, 250]) } else { Rgb([10, 20, 30]) }
	})
}

#[test]
fn png_round_trip() {
	let dir = tempfile::tempdir().unwrap();
	let input = dir.path().join("checker.png");
	let output = dir.path().join("checker_out.png");
	let img = checker(16, 4);
	img.save(&input).unwrap();

	let config = Config::new(ErrorMethod::Variance, 0., 1).unwrap();
	let compressor = Compressor::open(&input, config).unwrap();
	assert_eq!(compressor.source(), &img);
	assert!(compressor.file_size().unwrap() > 0);

	let result = compressor.compress().unwrap();
	// 4x4 cells align with the quadrants, so every cell ends up a leaf
	assert_eq!(result.stats.leaves, 16);
	assert_eq!(result.stats.depth, 3);
	assert_eq!(result.output, img);
	result.save(&output).unwrap();

	let saved = image::open(&output).unwrap().into_rgb8();
	assert_eq!(saved, img);

	let report = result.report(compressor.file_size()).unwrap();
	assert_eq!(report.stats, result.stats);
	assert!(report.compression_percentage().is_some());
	assert!(report.to_string().contains("Node count: 21"));
}

#[test]
fn alpha_is_dropped_on_load() {
	let dir = tempfile::tempdir().unwrap();
	let input = dir.path().join("alpha.png");
	RgbaImage::from_pixel(3, 2, image::Rgba([5, 6, 7, 100])).save(&input).unwrap();
	let compressor = Compressor::open(&input, Config::default()).unwrap();
	assert_eq!(*compressor.source().get_pixel(2, 1), Rgb([5, 6, 7]));
	let result = compressor.compress().unwrap();
	assert!(result.tree.is_leaf());
}

#[test]
fn save_formats() {
	let dir = tempfile::tempdir().unwrap();
	let config = Config::new(ErrorMethod::MaxPixelDifference, 30., 2).unwrap();
	let result = Compressor::new(checker(12, 3), config).compress().unwrap();
	for name in &["out.bmp", "out.jpg", "out.JPEG"] {
		let path = dir.path().join(name);
		result.save(&path).unwrap();
		assert!(path.exists(), "{} not written", name);
	}
	match result.save(dir.path().join("out.webp")) {
		Err(CompressError::UnsupportedOutputFormat(_)) => (),
		other => panic!("expected unsupported format, got {:?}", other.err()),
	}
}

#[test]
fn missing_input_is_an_io_error() {
	let dir = tempfile::tempdir().unwrap();
	let res = Compressor::open(dir.path().join("nope.png"), Config::default());
	assert!(matches!(res, Err(CompressError::Io { .. })));
}

#[test]
fn garbage_input_fails_to_load() {
	let dir = tempfile::tempdir().unwrap();
	let input = dir.path().join("garbage.png");
	std::fs::write(&input, b"definitely not a png").unwrap();
	let res = Compressor::open(&input, Config::default());
	assert!(matches!(res, Err(CompressError::Load { .. })));
}

#[test]
fn invalid_config_fails_fast() {
	let config = Config { method: ErrorMethod::Entropy, threshold: -3., min_block_size: 2 };
	match Compressor::new(checker(8, 2), config).compress() {
		Err(CompressError::Analyze(AnalyzeError::InvalidConfiguration(_))) => (),
		other => panic!("expected invalid configuration, got {:?}", other.err()),
	}
}
