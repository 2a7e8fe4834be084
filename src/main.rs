use clap::{arg, Arg, ArgMatches, Command};
use image::error::ImageError;

use quadtree_compress::compress::{default_output_path, output_dir_exists, output_format, Compressor};
use quadtree_compress::config::{Config, DEFAULT_MIN_BLOCK_SIZE, DEFAULT_THRESHOLD};
use quadtree_compress::error::{AnalyzeError, CompressError};
use quadtree_compress::metric::ErrorMethod;

use std::path::PathBuf;

/// Helper function for `main`.
fn error_exit(msg: &str, code: i32) -> ! {
	eprintln!("{}", msg);
	std::process::exit(code)
}

/// Maps a pipeline failure to an exit status.
fn exit_code(e: &CompressError) -> i32 {
	match e {
		CompressError::Load { source, .. } => match source {
			ImageError::Decoding(_) | ImageError::Unsupported(_) => 4,
			ImageError::Limits(_) => 5,
			ImageError::IoError(_) => 3,
			_ => 10,
		},
		CompressError::Io { .. } | CompressError::Save { .. } => 3,
		CompressError::UnsupportedOutputFormat(_) |
		CompressError::Analyze(AnalyzeError::InvalidConfiguration(_)) => 2,
		CompressError::Analyze(AnalyzeError::EmptyImage) => 4,
		CompressError::Encode(_) => 10,
	}
}

/// Parses a threshold, accepting a decimal comma.
fn parse_threshold(s: &str) -> Result<f64, String> {
	let n = s.trim().replace(',', ".").parse::<f64>().map_err(|e| e.to_string())?;
	if !n.is_finite() || n < 0. {
		return Err("threshold must be a non-negative number".to_string());
	}
	Ok(n)
}

fn cli() -> Command {
	Command::new("quadtree_compress")
		.version(env!("CARGO_PKG_VERSION"))
		.author("vkcz")
		.about("Compresses an image by flattening the blocks of an error-driven quadtree.")
		.arg(arg!(-m --method <METHOD> "Error method: 1/variance, 2/mad, 3/max-diff or 4/entropy")
			.default_value("variance")
			.value_parser(|s: &str| s.parse::<ErrorMethod>()))
		.arg(arg!(-t --threshold <N> "Blocks with an error above this are split; defaults to 10")
			.value_parser(parse_threshold))
		.arg(Arg::new("min_block_size")
			.short('b')
			.long("min-block-size")
			.value_name("N")
			.help("Smallest width/height of a block; defaults to 4")
			.value_parser(clap::value_parser!(u32).range(1..)))
		.arg(arg!(-q --quiet "Don't print parameters and statistics"))
		.arg(arg!(<INPUT> "Path to input image"))
		.arg(arg!([OUTPUT] "Path to output image (.jpg, .jpeg, .png, .gif or .bmp); defaults to INPUT_compressed.png"))
}

fn config_from(matches: &ArgMatches) -> Config {
	let method = matches.get_one::<ErrorMethod>("method").copied().unwrap_or(ErrorMethod::Variance);
	let threshold = matches.get_one::<f64>("threshold").copied().unwrap_or(DEFAULT_THRESHOLD);
	let min_block_size = matches.get_one::<u32>("min_block_size").copied()
		.unwrap_or(DEFAULT_MIN_BLOCK_SIZE);
	match Config::new(method, threshold, min_block_size) {
		Ok(c) => c,
		Err(e) => error_exit(&e.to_string(), 2)
	}
}

/// `clap`-based CLI for quadtree image compression.
///
/// May exit process with status code if there are errors:
///
/// 1: `clap` error
///
/// 2: invalid arguments
///
/// 3: file I/O issues
///
/// 4: invalid image data
///
/// 5: computation limits exceeded
///
/// 10: other, potentially unknown error
fn main() {
	env_logger::init();

	let clap_matches = match cli().try_get_matches() {
		Ok(m) => m,
		Err(e) if !e.use_stderr() => e.exit(),
		Err(e) => {
			if let Err(io) = e.print() {
				log::error!("could not print usage error: {}", io);
			}
			std::process::exit(1)
		}
	};
	let quiet = clap_matches.get_flag("quiet");
	let config = config_from(&clap_matches);
	let input_path = match clap_matches.get_one::<String>("INPUT") {
		Some(p) => PathBuf::from(p),
		None => error_exit("Missing input path", 2)
	};
	let output_path = clap_matches.get_one::<String>("OUTPUT")
		.map(PathBuf::from)
		.unwrap_or_else(|| default_output_path(&input_path));
	// Reject a bad output path before doing any work
	if let Err(e) = output_format(&output_path) {
		error_exit(&e.to_string(), 2)
	}
	if !output_dir_exists(&output_path) {
		error_exit(&format!("Output directory for '{}' does not exist", output_path.display()), 2)
	}

	if !quiet {
		println!("Input image: {}", input_path.display());
		println!("Error method: {} ({})", config.method, config.method.selector());
		println!("Threshold: {}", config.threshold);
		println!("Minimum block size: {}", config.min_block_size);
		println!("Output image: {}", output_path.display());
	}

	let run = || -> Result<_, CompressError> {
		let compressor = Compressor::open(&input_path, config)?;
		let result = compressor.compress()?;
		result.save(&output_path)?;
		if quiet {
			Ok(None)
		} else {
			result.report(compressor.file_size()).map(Some)
		}
	};
	match run() {
		Ok(Some(report)) => println!("{}", report),
		Ok(None) => (),
		Err(e) => error_exit(&e.to_string(), exit_code(&e))
	}
}
