/*!
# `Ripo` - Refill Buffer

This is the bridge between a [`ByteSource`], which hands out however many
bytes it happens to have, and the external decoders, which pull fixed-size
chunks and expect every refill to make progress.
*/

use crate::{
	ByteSource,
	RipoError,
};
use std::{
	io::{
		self,
		BufRead,
		Read,
	},
	num::NonZeroUsize,
};



/// # Byte Supplier.
///
/// The two operations a pull-based decoder needs from its input.
pub trait ByteSupplier {
	/// # Fill.
	///
	/// Return the unread window, refilling it from the source first if it is
	/// empty. The window is never empty: once the source is exhausted, every
	/// fill returns the format's synthetic trailer.
	///
	/// ## Errors
	///
	/// Returns [`RipoError::EmptySource`] if the very first read comes back
	/// empty, [`RipoError::Truncated`] if the source is exhausted and there
	/// is no trailer to give, or any error raised by the source.
	fn fill(&mut self) -> Result<&[u8], RipoError>;

	/// # Skip.
	///
	/// Discard `n` unread bytes, refilling as many times as needed.
	///
	/// ## Errors
	///
	/// Returns [`RipoError::SkipExhausted`] if the source ends first.
	fn skip(&mut self, n: usize) -> Result<(), RipoError>;
}



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Fill State.
enum FillState {
	/// # Nothing Read Yet.
	Start,

	/// # Data Flowing.
	Streaming,

	/// # Source Exhausted.
	Drained,
}



/// # Refill Buffer.
///
/// A fixed-capacity scratch buffer drained by a decoder and refilled from a
/// [`ByteSource`] on demand.
///
/// Construction performs no I/O. The first refill that comes back empty is
/// fatal ([`RipoError::EmptySource`]); any later empty refill is the normal
/// end of the stream and installs the codec's trailer, e.g. a JPEG `EOI`
/// marker, so the decoder can wind down on its own.
///
/// [`ByteSupplier::fill`] never succeeds with zero bytes; it repeats the
/// trailer for as long as it is asked. Rust decoders consume the buffer
/// through [`Read`] and [`BufRead`] instead, which see the trailer once and
/// then a regular end-of-file. Errors raised by the source during those
/// calls are parked and re-surfaced by [`RefillBuffer::resolve`] so they
/// aren't mistaken for decoding errors.
pub struct RefillBuffer<'a> {
	/// # Source.
	source: &'a mut dyn ByteSource,

	/// # Scratch Buffer.
	buf: Box<[u8]>,

	/// # Read Position.
	pos: usize,

	/// # Window End.
	len: usize,

	/// # State.
	state: FillState,

	/// # End-of-Stream Marker.
	trailer: &'static [u8],

	/// # Parked Source Error.
	fault: Option<RipoError>,
}

impl std::fmt::Debug for RefillBuffer<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RefillBuffer")
			.field("capacity", &self.buf.len())
			.field("pos", &self.pos)
			.field("len", &self.len)
			.field("state", &self.state)
			.finish_non_exhaustive()
	}
}

impl<'a> RefillBuffer<'a> {
	#[must_use]
	/// # New.
	///
	/// The trailer must fit within the capacity; longer trailers are cut
	/// short.
	pub fn new(
		source: &'a mut dyn ByteSource,
		capacity: NonZeroUsize,
		trailer: &'static [u8],
	) -> Self {
		Self {
			source,
			buf: vec![0_u8; capacity.get()].into_boxed_slice(),
			pos: 0,
			len: 0,
			state: FillState::Start,
			trailer,
			fault: None,
		}
	}

	#[inline]
	#[must_use]
	/// # Capacity.
	pub fn capacity(&self) -> usize { self.buf.len() }

	#[inline]
	#[must_use]
	/// # Unread Bytes in the Window.
	pub const fn available(&self) -> usize { self.len - self.pos }

	#[inline]
	#[must_use]
	/// # Is Drained?
	///
	/// Returns `true` once the source has reported the end of the stream.
	pub fn is_drained(&self) -> bool { self.state == FillState::Drained }

	/// # Resolve.
	///
	/// Decoders only see [`io::Error`]s when the source fails underneath
	/// them. Pass their result through here to swap the resulting decode
	/// error for the original source error, if there was one.
	///
	/// ## Errors
	///
	/// Returns the parked source error or the original error.
	pub fn resolve<T>(&mut self, res: Result<T, RipoError>) -> Result<T, RipoError> {
		match (res, self.fault.take()) {
			(Err(_), Some(fault)) => Err(fault),
			(res, _) => res,
		}
	}

	/// # Refill.
	///
	/// Replace the (exhausted) window with fresh bytes from the source.
	fn refill(&mut self) -> Result<(), RipoError> {
		if self.state == FillState::Drained {
			self.pos = 0;
			self.len = 0;
			return Ok(());
		}

		let len = self.source.read_into(&mut self.buf)?;
		if len == 0 {
			if self.state == FillState::Start { return Err(RipoError::EmptySource); }

			if self.trailer.is_empty() {
				log::warn!("premature end of image data");
			}
			else {
				log::warn!("premature end of image data; inserting a synthetic end marker");
			}
			self.state = FillState::Drained;
			self.install_trailer();
		}
		else {
			self.pos = 0;
			self.len = len;
			self.state = FillState::Streaming;
		}

		Ok(())
	}

	/// # Install Trailer.
	///
	/// Replace the window with the end-of-stream marker.
	fn install_trailer(&mut self) {
		let len = self.trailer.len().min(self.buf.len());
		self.buf[..len].copy_from_slice(&self.trailer[..len]);
		self.pos = 0;
		self.len = len;
	}

	/// # Ensure Window.
	///
	/// Refill if nothing is left unread.
	fn ensure(&mut self) -> Result<(), RipoError> {
		if self.pos == self.len { self.refill() }
		else { Ok(()) }
	}
}

impl ByteSupplier for RefillBuffer<'_> {
	fn fill(&mut self) -> Result<&[u8], RipoError> {
		self.ensure()?;

		// Only a drained buffer can come up empty; repeat the trailer.
		if self.pos == self.len {
			if self.trailer.is_empty() { return Err(RipoError::Truncated); }
			self.install_trailer();
		}

		Ok(&self.buf[self.pos..self.len])
	}

	fn skip(&mut self, mut n: usize) -> Result<(), RipoError> {
		loop {
			let available = self.available();
			if n <= available {
				self.pos += n;
				return Ok(());
			}

			n -= available;
			self.pos = self.len;

			// The trailer isn't real data, so a skip can't land in it.
			if self.state != FillState::Drained { self.refill()?; }
			if self.state == FillState::Drained {
				self.pos = self.len;
				return Err(RipoError::SkipExhausted { remaining: n });
			}
		}
	}
}

impl Read for RefillBuffer<'_> {
	fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
		if out.is_empty() { return Ok(0); }

		let len = {
			let window = self.fill_buf()?;
			let len = window.len().min(out.len());
			out[..len].copy_from_slice(&window[..len]);
			len
		};
		self.consume(len);
		Ok(len)
	}
}

impl BufRead for RefillBuffer<'_> {
	fn fill_buf(&mut self) -> io::Result<&[u8]> {
		if let Err(e) = self.ensure() {
			let out = io::Error::other(e.to_string());
			self.fault = Some(e);
			return Err(out);
		}

		Ok(&self.buf[self.pos..self.len])
	}

	#[inline]
	fn consume(&mut self, amt: usize) {
		self.pos = self.len.min(self.pos + amt);
	}
}



#[cfg(test)]
mod tests {
	use super::*;
	use crate::source::Trickle;
	use std::io::Cursor;

	const NZ_8: NonZeroUsize = match NonZeroUsize::new(8) {
		Some(n) => n,
		None => panic!(),
	};

	fn twenty() -> Vec<u8> { (1..=20).collect() }

	#[test]
	fn t_lazy() {
		let mut src = Cursor::new(twenty());
		let buf = RefillBuffer::new(&mut src, NZ_8, &[]);
		assert_eq!(buf.available(), 0);
		assert_eq!(buf.capacity(), 8);
		assert!(! buf.is_drained());
		drop(buf);

		// Nothing should have been read yet.
		assert_eq!(src.position(), 0);
	}

	#[test]
	fn t_fill() {
		let mut src = Cursor::new(twenty());
		let mut buf = RefillBuffer::new(&mut src, NZ_8, &[0xFF, 0xD9]);

		assert_eq!(buf.fill().unwrap(), &[1, 2, 3, 4, 5, 6, 7, 8]);

		// Filling again without consuming returns the same window.
		assert_eq!(buf.fill().unwrap().len(), 8);
		buf.skip(8).unwrap();
		assert_eq!(buf.fill().unwrap(), &[9, 10, 11, 12, 13, 14, 15, 16]);
		buf.skip(8).unwrap();
		assert_eq!(buf.fill().unwrap(), &[17, 18, 19, 20]);
		buf.skip(4).unwrap();

		// The end of the stream yields the trailer, as often as asked.
		assert!(! buf.is_drained());
		assert_eq!(buf.fill().unwrap(), &[0xFF, 0xD9]);
		assert!(buf.is_drained());
		buf.skip(2).unwrap();
		assert_eq!(buf.fill().unwrap(), &[0xFF, 0xD9]);
		buf.skip(1).unwrap();
		assert_eq!(buf.fill().unwrap(), &[0xD9]);
		buf.skip(1).unwrap();
		assert_eq!(buf.fill().unwrap(), &[0xFF, 0xD9]);
	}

	#[test]
	fn t_fill_never_empty() {
		// Three bytes, then the trailer forever.
		let mut src = Cursor::new(vec![1_u8, 2, 3]);
		let mut buf = RefillBuffer::new(&mut src, NZ_8, &[0xFF, 0xD9]);
		buf.skip(3).unwrap();
		for _ in 0..3 {
			assert_eq!(buf.fill().unwrap(), &[0xFF, 0xD9]);
			buf.skip(2).unwrap();
		}

		// Without a trailer, the end of the stream is an error.
		let mut src = Cursor::new(vec![1_u8, 2, 3]);
		let mut buf = RefillBuffer::new(&mut src, NZ_8, &[]);
		assert_eq!(buf.fill().unwrap(), &[1, 2, 3]);
		buf.skip(3).unwrap();
		assert_eq!(buf.fill(), Err(RipoError::Truncated));
		assert_eq!(buf.fill(), Err(RipoError::Truncated));
		assert!(buf.is_drained());

		// Readers still get a plain end-of-file.
		let mut out = Vec::new();
		assert_eq!(buf.read_to_end(&mut out).unwrap(), 0);
	}

	#[test]
	fn t_empty() {
		let mut src = Cursor::new(Vec::<u8>::new());
		let mut buf = RefillBuffer::new(&mut src, NZ_8, &[0xFF, 0xD9]);
		assert_eq!(buf.fill(), Err(RipoError::EmptySource));

		// The same goes for Read, with the real error parked for later.
		let mut out = [0_u8; 4];
		assert!(buf.read(&mut out).is_err());
		assert_eq!(
			buf.resolve::<()>(Err(RipoError::UnknownFormat)),
			Err(RipoError::EmptySource),
		);

		// Nothing more parked.
		assert_eq!(
			buf.resolve::<()>(Err(RipoError::UnknownFormat)),
			Err(RipoError::UnknownFormat),
		);
	}

	#[test]
	fn t_skip_boundary() {
		let mut src = Cursor::new(twenty());
		let mut buf = RefillBuffer::new(&mut src, NZ_8, &[]);
		buf.skip(15).unwrap();

		let mut rest = Vec::new();
		buf.read_to_end(&mut rest).unwrap();
		assert_eq!(rest, [16, 17, 18, 19, 20]);
	}

	#[test]
	fn t_skip_short_reads() {
		// Short reads shouldn't change anything but the number of refills.
		let mut src = Trickle::new(twenty(), 3);
		let mut buf = RefillBuffer::new(&mut src, NZ_8, &[]);
		buf.skip(1).unwrap();
		assert_eq!(buf.fill().unwrap(), &[2, 3]);
		buf.skip(13).unwrap();

		let mut rest = Vec::new();
		buf.read_to_end(&mut rest).unwrap();
		assert_eq!(rest, [15, 16, 17, 18, 19, 20]);
	}

	#[test]
	fn t_skip_exhausted() {
		let mut src = Cursor::new(twenty());
		let mut buf = RefillBuffer::new(&mut src, NZ_8, &[0xFF, 0xD9]);
		assert_eq!(buf.skip(25), Err(RipoError::SkipExhausted { remaining: 5 }));
		assert!(buf.is_drained());

		// Once drained, nothing more to skip.
		assert_eq!(buf.skip(1), Err(RipoError::SkipExhausted { remaining: 1 }));
		assert_eq!(buf.skip(0), Ok(()));
	}

	#[test]
	fn t_read() {
		let mut src = Trickle::new(twenty(), 5);
		let mut buf = RefillBuffer::new(&mut src, NZ_8, &[0xFF, 0xD9]);

		let mut out = Vec::new();
		buf.read_to_end(&mut out).unwrap();

		let mut expected = twenty();
		expected.extend_from_slice(&[0xFF, 0xD9]);
		assert_eq!(out, expected);
	}
}
