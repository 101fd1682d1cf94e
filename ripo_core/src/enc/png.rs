/*!
# `Ripo` - PNG Encoding.
*/

use crate::{
	ColorSpace,
	PixelBuffer,
	RipoError,
};
use png::{
	BitDepth,
	ColorType,
	Encoder,
};
use std::{
	io::Write,
	path::Path,
};



/// # Save PNG.
///
/// Encode the buffer as a PNG and write it to `path`. The file is written
/// atomically, so a failed save never leaves a partial file behind. Missing
/// parent directories are created.
///
/// Only 8-bit RGB buffers without alpha can be saved at the moment.
///
/// ## Errors
///
/// Returns [`RipoError::Unsupported`] for other layouts,
/// [`RipoError::Encode`] if encoding fails, or [`RipoError::Write`] if the
/// file cannot be written.
pub fn save<P: AsRef<Path>>(buffer: &PixelBuffer, path: P) -> Result<(), RipoError> {
	let mut out = Vec::new();
	write_png(buffer, &mut out)?;
	write_atomic::write_file(path.as_ref(), &out).map_err(|_| RipoError::Write)
}

/// # Write PNG.
///
/// Stream the buffer's rows, minus padding, into a PNG written to `writer`.
///
/// ## Errors
///
/// Returns [`RipoError::Unsupported`] for anything other than 8-bit RGB
/// without alpha, or [`RipoError::Encode`] if the encoder or writer fails.
pub fn write_png<W: Write>(buffer: &PixelBuffer, writer: W) -> Result<(), RipoError> {
	if buffer.component_size() != 1 {
		return Err(RipoError::Unsupported("16-bit samples"));
	}
	if buffer.color_space() != ColorSpace::Rgb || buffer.has_alpha() {
		return Err(RipoError::Unsupported("saving non-RGB images"));
	}

	let mut encoder = Encoder::new(writer, buffer.width(), buffer.height());
	encoder.set_color(ColorType::Rgb);
	encoder.set_depth(BitDepth::Eight);

	let mut writer = encoder.write_header().map_err(encode_error)?;
	{
		let mut stream = writer.stream_writer().map_err(encode_error)?;
		for row in buffer.rows() {
			stream.write_all(row).map_err(encode_error)?;
		}
		stream.finish().map_err(encode_error)?;
	}
	writer.finish().map_err(encode_error)
}

/// # Encode Error.
fn encode_error<E: std::fmt::Display>(err: E) -> RipoError {
	RipoError::Encode(err.to_string())
}
