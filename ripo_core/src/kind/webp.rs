/*!
# `Ripo`: `WebP` Handling

This uses [`libwebp-sys2`](https://crates.io/crates/libwebp-sys2) bindings to Google's
`libwebp`. Data is pushed into its incremental decoder one refill at a time.
*/

use crate::{
	BULK_BUFFER_SIZE,
	ByteSupplier,
	ColorSpace,
	ImageKind,
	PixelBuffer,
	PixelLayout,
	RefillBuffer,
	RipoError,
	traits::Decoder,
};
use libwebp_sys::{
	MODE_RGB,
	MODE_RGBA,
	VP8_STATUS_BITSTREAM_ERROR,
	VP8_STATUS_INVALID_PARAM,
	VP8_STATUS_NOT_ENOUGH_DATA,
	VP8_STATUS_OK,
	VP8_STATUS_OUT_OF_MEMORY,
	VP8_STATUS_SUSPENDED,
	VP8_STATUS_UNSUPPORTED_FEATURE,
	VP8_STATUS_USER_ABORT,
	VP8StatusCode,
	WebPBitstreamFeatures,
	WebPGetFeatures,
	WebPIAppend,
	WebPIDecGetRGB,
	WebPIDecoder,
	WebPIDelete,
	WebPINewRGB,
};
use std::{
	num::NonZeroUsize,
	os::raw::c_int,
};



/// # `WebP` Image.
pub(crate) struct ImageWebp;

impl Decoder for ImageWebp {
	const KIND: ImageKind = ImageKind::Webp;

	/// # No Trailer.
	///
	/// A `WebP` cut short cannot be finished off.
	const TRAILER: &'static [u8] = &[];

	const BUFFER_SIZE: NonZeroUsize = BULK_BUFFER_SIZE;

	/// # Decode.
	fn decode(src: &mut RefillBuffer<'_>) -> Result<PixelBuffer, RipoError> {
		let (features, header) = read_features(src)?;
		if features.has_animation != 0 {
			return Err(RipoError::Unsupported("animated WebP"));
		}

		let alpha = features.has_alpha != 0;
		let layout = Self::layout(features.width, features.height, ColorSpace::Rgb, alpha)?;

		// Feed the decoder everything we have.
		let mut d = LibWebpIDecoder::new(alpha)?;
		let mut done = d.append(&header)?;
		drop(header);

		while ! done {
			let chunk = src.fill().map_err(|e| truncated(e, "truncated image data"))?;
			done = d.append(chunk)?;
			let len = chunk.len();
			src.skip(len)?;
		}

		d.copy_into(layout)
	}
}



/// # Read Features.
///
/// Pull just enough of the stream to parse the bitstream features. The bytes
/// read are returned too, as they still need to be passed to the decoder.
fn read_features(src: &mut RefillBuffer<'_>)
-> Result<(WebPBitstreamFeatures, Vec<u8>), RipoError> {
	let mut header = Vec::new();
	loop {
		let chunk = src.fill().map_err(|e| truncated(e, "truncated header"))?;
		header.extend_from_slice(chunk);
		let len = chunk.len();
		src.skip(len)?;

		let mut features: WebPBitstreamFeatures = unsafe { std::mem::zeroed() };
		let status = unsafe {
			WebPGetFeatures(header.as_ptr(), header.len(), &mut features)
		};
		match status {
			VP8_STATUS_OK => return Ok((features, header)),
			VP8_STATUS_NOT_ENOUGH_DATA => {},
			e => return Err(status_error(e)),
		}
	}
}

/// # Status Error.
fn status_error(status: VP8StatusCode) -> RipoError {
	let name = match status {
		VP8_STATUS_OK => "OK",
		VP8_STATUS_OUT_OF_MEMORY => "out of memory",
		VP8_STATUS_INVALID_PARAM => "invalid parameter",
		VP8_STATUS_BITSTREAM_ERROR => "bitstream error",
		VP8_STATUS_UNSUPPORTED_FEATURE => "unsupported feature",
		VP8_STATUS_SUSPENDED => "suspended",
		VP8_STATUS_USER_ABORT => "user abort",
		VP8_STATUS_NOT_ENOUGH_DATA => "not enough data",
		_ => return RipoError::decode(ImageKind::Webp, format!("unknown status {status}")),
	};
	RipoError::decode(ImageKind::Webp, name)
}

/// # Truncation Error.
///
/// With no trailer, running out of data is a decoding failure.
fn truncated(err: RipoError, detail: &'static str) -> RipoError {
	if matches!(err, RipoError::Truncated) { RipoError::decode(ImageKind::Webp, detail) }
	else { err }
}



/// # Incremental Decoder Wrapper.
///
/// This exists solely to help with garbage cleanup. The decoder owns its
/// output buffer, so pixels must be copied out before it is dropped.
struct LibWebpIDecoder(*mut WebPIDecoder);

impl LibWebpIDecoder {
	/// # New.
	fn new(alpha: bool) -> Result<Self, RipoError> {
		let mode =
			if alpha { MODE_RGBA }
			else { MODE_RGB };

		let ptr = unsafe { WebPINewRGB(mode, std::ptr::null_mut(), 0, 0) };
		if ptr.is_null() { Err(RipoError::Overflow) }
		else { Ok(Self(ptr)) }
	}

	/// # Append.
	///
	/// Push more data into the decoder, returning `true` once the image is
	/// complete.
	fn append(&mut self, data: &[u8]) -> Result<bool, RipoError> {
		match unsafe { WebPIAppend(self.0, data.as_ptr(), data.len()) } {
			VP8_STATUS_OK => Ok(true),
			VP8_STATUS_SUSPENDED => Ok(false),
			e => Err(status_error(e)),
		}
	}

	/// # Copy Into Buffer.
	fn copy_into(&self, layout: PixelLayout) -> Result<PixelBuffer, RipoError> {
		let mut last_y: c_int = 0;
		let mut width: c_int = 0;
		let mut height: c_int = 0;
		let mut stride: c_int = 0;
		let ptr = unsafe {
			WebPIDecGetRGB(self.0, &mut last_y, &mut width, &mut height, &mut stride)
		};

		if
			ptr.is_null() ||
			last_y != height ||
			u32::try_from(width).ok() != Some(layout.width()) ||
			u32::try_from(height).ok() != Some(layout.height())
		{
			return Err(RipoError::decode(ImageKind::Webp, "incomplete image"));
		}

		let stride = usize::try_from(stride).map_err(|_| RipoError::Overflow)?;
		let row_size = layout.row_size();
		if stride < row_size { return Err(RipoError::Overflow); }

		let mut out = PixelBuffer::allocate(layout)?;
		for y in 0..layout.height() as usize {
			let row = unsafe { std::slice::from_raw_parts(ptr.add(y * stride), row_size) };
			out.row_mut(y).copy_from_slice(row);
		}

		Ok(out)
	}
}

impl Drop for LibWebpIDecoder {
	#[inline]
	fn drop(&mut self) { unsafe { WebPIDelete(self.0); } }
}



#[cfg(test)]
mod tests {
	use super::*;
	use crate::source::Trickle;
	use libwebp_sys::{
		WebPEncodeLosslessRGB,
		WebPEncodeLosslessRGBA,
		WebPFree,
	};
	use std::io::Cursor;

	/// # Encode Lossless.
	fn encode(width: usize, height: usize, pixels: &[u8], alpha: bool) -> Vec<u8> {
		let channels = if alpha { 4 } else { 3 };
		assert_eq!(pixels.len(), width * height * channels);

		let w = c_int::try_from(width).unwrap();
		let h = c_int::try_from(height).unwrap();
		let stride = c_int::try_from(width * channels).unwrap();
		let mut out: *mut u8 = std::ptr::null_mut();
		let len = unsafe {
			if alpha { WebPEncodeLosslessRGBA(pixels.as_ptr(), w, h, stride, &mut out) }
			else { WebPEncodeLosslessRGB(pixels.as_ptr(), w, h, stride, &mut out) }
		};
		assert!(len > 0 && ! out.is_null());

		let raw = unsafe { std::slice::from_raw_parts(out, len) }.to_vec();
		unsafe { WebPFree(out.cast()); }
		raw
	}

	fn pattern(len: usize) -> Vec<u8> {
		(0..len).map(|i| (i * 7 % 256) as u8).collect()
	}

	#[test]
	fn t_rgb() {
		let pixels = pattern(17 * 5 * 3);
		let raw = encode(17, 5, &pixels, false);
		assert_eq!(ImageKind::try_from(raw.as_slice()), Ok(ImageKind::Webp));

		// Tiny reads exercise the incremental path.
		let img = crate::load(&mut Trickle::new(raw, 13)).unwrap();
		assert_eq!(img.width(), 17);
		assert_eq!(img.height(), 5);
		assert!(! img.has_alpha());
		assert_eq!(img.row_stride(), 64);
		for (y, row) in img.rows().enumerate() {
			assert_eq!(row, &pixels[y * 51..(y + 1) * 51]);
		}
	}

	#[test]
	fn t_rgba() {
		let mut pixels = pattern(4 * 4 * 4);
		for px in pixels.chunks_exact_mut(4).step_by(2) { px[3] = 0; }
		let raw = encode(4, 4, &pixels, true);

		let img = crate::load(&mut Cursor::new(raw)).unwrap();
		assert!(img.has_alpha());
		assert_eq!(img.pixel_channels(), 4);
		assert_eq!(img.pixel(0, 0).map(|px| px[3]), Some(0));
		assert_eq!(img.pixel(0, 1), Some(&pixels[4..8]));
	}

	#[test]
	fn t_status_error() {
		for (status, name) in [
			(VP8_STATUS_OUT_OF_MEMORY, "out of memory"),
			(VP8_STATUS_BITSTREAM_ERROR, "bitstream error"),
			(VP8_STATUS_UNSUPPORTED_FEATURE, "unsupported feature"),
			(VP8_STATUS_NOT_ENOUGH_DATA, "not enough data"),
		] {
			assert_eq!(
				status_error(status),
				RipoError::Decode { kind: ImageKind::Webp, detail: name.to_owned() },
			);
		}
		assert_eq!(
			status_error(99),
			RipoError::Decode { kind: ImageKind::Webp, detail: "unknown status 99".to_owned() },
		);

		// Running dry is reworded; other errors pass through.
		assert_eq!(
			truncated(RipoError::Truncated, "truncated header"),
			RipoError::Decode { kind: ImageKind::Webp, detail: "truncated header".to_owned() },
		);
		assert_eq!(truncated(RipoError::Overflow, "truncated header"), RipoError::Overflow);
	}

	#[test]
	fn t_truncated() {
		let raw = encode(17, 5, &pattern(17 * 5 * 3), false);

		// Cut in the header.
		let mut src = Cursor::new(raw[..14].to_vec());
		assert!(matches!(
			crate::load(&mut src),
			Err(RipoError::Decode { kind: ImageKind::Webp, .. } | RipoError::UnknownFormat),
		));

		// Cut in the image data.
		let cut = raw[..raw.len() / 2].to_vec();
		assert!(matches!(
			crate::load(&mut Trickle::new(cut, 5)),
			Err(RipoError::Decode { kind: ImageKind::Webp, .. }),
		));
	}
}
