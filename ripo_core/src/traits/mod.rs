/*!
# `Ripo` - Traits.
*/

use crate::{
	ColorSpace,
	DEFAULT_BUFFER_SIZE,
	ImageKind,
	PixelBuffer,
	PixelLayout,
	RefillBuffer,
	RipoError,
};
use std::num::NonZeroUsize;



/// # Decoder.
///
/// This is implemented for each image format capable of decoding from a
/// [`RefillBuffer`] into a [`PixelBuffer`].
pub(super) trait Decoder {
	/// # Image Kind.
	const KIND: ImageKind;

	/// # End-of-Stream Marker.
	///
	/// Bytes handed to the decoder if the source ends early, giving it a
	/// chance to finish gracefully.
	const TRAILER: &'static [u8];

	/// # Refill Capacity.
	const BUFFER_SIZE: NonZeroUsize = DEFAULT_BUFFER_SIZE;

	/// # Decode.
	///
	/// Pull the raw image from the buffer, returning the pixels in canonical
	/// form.
	///
	/// Implementations need not worry about parked source errors; the caller
	/// passes the result through [`RefillBuffer::resolve`].
	///
	/// ## Errors
	///
	/// Return any errors encountered during decoding.
	fn decode(src: &mut RefillBuffer<'_>) -> Result<PixelBuffer, RipoError>;

	/// # Layout.
	///
	/// Build the layout for the dimensions a header declares. Dimensions of
	/// zero, or too big for a `u32`, mean the file is broken.
	///
	/// ## Errors
	///
	/// Returns a [`RipoError::Decode`] for bad dimensions.
	fn layout<W, H>(width: W, height: H, color: ColorSpace, alpha: bool)
	-> Result<PixelLayout, RipoError>
	where W: TryInto<u32>, H: TryInto<u32> {
		PixelLayout::new(width, height, color, alpha)
			.map_err(|_| RipoError::decode(Self::KIND, "invalid image dimensions"))
	}
}
