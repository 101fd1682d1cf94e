/*!
# `Ripo` - Library

Streaming decoders for JPEG, PNG, GIF, and `WebP` images, producing a single
canonical [`PixelBuffer`] whatever the source format, plus a PNG encoder to
write one back out.

Image data is pulled from a [`ByteSource`] through a [`RefillBuffer`], so
sources of unknown length (pipes, decompression streams) work as well as
files and in-memory data.

## Examples

```no_run
use ripo_core::ImageSource;

let mut src = ImageSource::open("/path/to/image.gif").unwrap();
let img = ripo_core::load(&mut src).unwrap();
assert!(0 < img.width());

// Or the short way.
let img = ripo_core::open("/path/to/image.jpg").unwrap();
```

## Features

Each format can be disabled via crate features: `gif`, `jpeg`, `png`, and
`webp`. All are enabled by default (`images`). Sniffing works regardless;
only the decoders (and the PNG encoder) are gated.
*/

#![warn(clippy::filetype_is_file)]
#![warn(clippy::integer_division)]
#![warn(clippy::needless_borrow)]
#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::suboptimal_flops)]
#![warn(clippy::unneeded_field_pattern)]
#![warn(macro_use_extern_crate)]
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(non_ascii_idents)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused_crate_dependencies)]
#![warn(unused_extern_crates)]
#![warn(unused_import_braces)]

#![allow(clippy::module_name_repetitions)]



mod codec;
#[cfg(feature = "png")] mod enc;
mod error;
mod image;
mod kind;
mod refill;
mod registry;
mod source;
mod traits;

pub use codec::{
	Codec,
	DecodeFn,
};
#[cfg(feature = "png")]
pub use enc::png::{
	save,
	write_png,
};
pub use error::RipoError;
pub use image::{
	color::ColorSpace,
	layout::{
		PixelLayout,
		row_stride,
	},
	PixelBuffer,
};
pub use kind::image::{
	ImageKind,
	read_prefix,
};
pub use refill::{
	ByteSupplier,
	RefillBuffer,
};
pub use registry::Registry;
pub use source::{
	ByteSource,
	ImageSource,
};

#[cfg(feature = "gif")]  pub(crate) use kind::gif::ImageGif;
#[cfg(feature = "jpeg")] pub(crate) use kind::jpeg::ImageJpeg;
#[cfg(feature = "png")]  pub(crate) use kind::png::ImagePng;
#[cfg(feature = "webp")] pub(crate) use kind::webp::ImageWebp;

use std::{
	num::NonZeroUsize,
	path::Path,
};



/// # Default Refill Capacity.
///
/// Used by the JPEG, PNG, and GIF decoders.
pub const DEFAULT_BUFFER_SIZE: NonZeroUsize = match NonZeroUsize::new(8 * 1024) {
	Some(n) => n,
	None => panic!(),
};

/// # Bulk Refill Capacity.
///
/// Used by the `WebP` decoder, which copies each chunk it is given.
pub const BULK_BUFFER_SIZE: NonZeroUsize = match NonZeroUsize::new(64 * 1024) {
	Some(n) => n,
	None => panic!(),
};

/// # Row Alignment.
///
/// Each [`PixelBuffer`] row stride is a multiple of this many bytes.
pub const ROW_ALIGNMENT: usize = 16;

/// # Sniffing Prefix Size.
///
/// The number of leading bytes examined to detect a format.
pub const PREFIX_SIZE: usize = 16;



/// # Detect Format.
///
/// Sniff the source using the default [`Registry`]. See
/// [`Registry::detect_format`].
///
/// ## Errors
///
/// This will bubble up any read errors.
pub fn detect_format(source: &mut dyn ByteSource) -> Result<Option<ImageKind>, RipoError> {
	Registry::default().detect_format(source)
}

/// # Load.
///
/// Decode the source using the default [`Registry`]. See [`Registry::load`].
///
/// ## Errors
///
/// This will bubble up any read or decoding errors.
pub fn load(source: &mut dyn ByteSource) -> Result<PixelBuffer, RipoError> {
	Registry::default().load(source)
}

/// # Open.
///
/// Open and decode an image file using the default [`Registry`]. The file's
/// extension is used as a hint.
///
/// ## Errors
///
/// This will bubble up any read or decoding errors.
pub fn open<P: AsRef<Path>>(path: P) -> Result<PixelBuffer, RipoError> {
	let mut src = ImageSource::open(path)?;
	load(&mut src)
}
