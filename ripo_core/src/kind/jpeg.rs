/*!
# `Ripo` - JPEG Images.
*/

use crate::{
	ColorSpace,
	ImageKind,
	PixelBuffer,
	RefillBuffer,
	RipoError,
	traits::Decoder,
};
use jpeg_decoder::PixelFormat;



/// # JPEG Image.
pub(crate) struct ImageJpeg;

impl Decoder for ImageJpeg {
	const KIND: ImageKind = ImageKind::Jpeg;

	/// # End of Image.
	const TRAILER: &'static [u8] = &[0xFF, 0xD9];

	/// # Decode.
	fn decode(src: &mut RefillBuffer<'_>) -> Result<PixelBuffer, RipoError> {
		let mut jecoder = jpeg_decoder::Decoder::new(&mut *src);
		jecoder.read_info().map_err(|e| RipoError::decode(Self::KIND, e))?;
		let info = jecoder.info()
			.ok_or_else(|| RipoError::decode(Self::KIND, "missing image header"))?;

		// So many ways to be a JPEG...
		let color = match info.pixel_format {
			PixelFormat::L8 => ColorSpace::Gray,
			PixelFormat::RGB24 => ColorSpace::Rgb,
			PixelFormat::CMYK32 => return Err(RipoError::Unsupported("CMYK JPEG")),
			PixelFormat::L16 => return Err(RipoError::Unsupported("16-bit samples")),
		};

		// JPEGs don't have alpha.
		let layout = Self::layout(info.width, info.height, color, false)?;

		// The decoder hands back the whole frame, tightly packed.
		let pixels = jecoder.decode().map_err(|e| RipoError::decode(Self::KIND, e))?;
		PixelBuffer::from_packed(layout, pixels)
			.map_err(|_| RipoError::decode(Self::KIND, "unexpected pixel count"))
	}
}
