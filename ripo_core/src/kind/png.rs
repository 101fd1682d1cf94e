/*!
# `Ripo` - PNG Images.
*/

use crate::{
	ColorSpace,
	ImageKind,
	PixelBuffer,
	RefillBuffer,
	RipoError,
	traits::Decoder,
};
use png::{
	BitDepth,
	ColorType,
	Transformations,
};



/// # PNG Image.
pub(crate) struct ImagePng;

impl Decoder for ImagePng {
	const KIND: ImageKind = ImageKind::Png;

	/// # An Empty `IEND` Chunk.
	const TRAILER: &'static [u8] = &[
		0x00, 0x00, 0x00, 0x00,
		b'I', b'E', b'N', b'D',
		0xAE, 0x42, 0x60, 0x82,
	];

	/// # Decode.
	fn decode(src: &mut RefillBuffer<'_>) -> Result<PixelBuffer, RipoError> {
		let mut decoder = png::Decoder::new(&mut *src);

		// Palettes and low bit depths are expanded, and 16-bit samples are
		// narrowed.
		decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
		let mut reader = decoder.read_info().map_err(|e| RipoError::decode(Self::KIND, e))?;

		let (color, alpha) = match reader.output_color_type() {
			(ColorType::Grayscale, BitDepth::Eight) => (ColorSpace::Gray, false),
			(ColorType::GrayscaleAlpha, BitDepth::Eight) => (ColorSpace::Gray, true),
			(ColorType::Rgb, BitDepth::Eight) => (ColorSpace::Rgb, false),
			(ColorType::Rgba, BitDepth::Eight) => (ColorSpace::Rgb, true),
			(ColorType::Indexed, _) => return Err(RipoError::Unsupported("PNG palette output")),
			_ => return Err(RipoError::Unsupported("16-bit samples")),
		};

		let (width, height, interlaced) = {
			let info = reader.info();
			(info.width, info.height, info.interlaced)
		};
		let layout = Self::layout(width, height, color, alpha)?;

		let out =
			// Interlaced rows arrive a pass at a time, so it's easier to take
			// the whole frame.
			if interlaced {
				let mut frame = Vec::new();
				frame.try_reserve_exact(reader.output_buffer_size())
					.map_err(|_| RipoError::Overflow)?;
				frame.resize(reader.output_buffer_size(), 0);

				let info = reader.next_frame(&mut frame)
					.map_err(|e| RipoError::decode(Self::KIND, e))?;
				if info.line_size != layout.row_size() {
					return Err(RipoError::decode(Self::KIND, "unexpected row size"));
				}
				frame.truncate(layout.row_size() * height as usize);
				PixelBuffer::from_packed(layout, frame)?
			}
			else {
				let mut out = PixelBuffer::allocate(layout)?;
				for y in 0..height as usize {
					let row = reader.next_row()
						.map_err(|e| RipoError::decode(Self::KIND, e))?
						.ok_or_else(|| RipoError::decode(Self::KIND, "missing image rows"))?;

					let dst = out.row_mut(y);
					if row.data().len() != dst.len() {
						return Err(RipoError::decode(Self::KIND, "unexpected row size"));
					}
					dst.copy_from_slice(row.data());
				}
				out
			};

		// Read through to the end so truncation past the image data is
		// noticed.
		reader.finish().map_err(|e| RipoError::decode(Self::KIND, e))?;
		Ok(out)
	}
}
