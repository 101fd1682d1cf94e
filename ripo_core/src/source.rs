/*!
# `Ripo` - Byte Sources
*/

use crate::RipoError;
use std::{
	fs::File,
	io::{
		self,
		Cursor,
		Read,
	},
	path::{
		Path,
		PathBuf,
	},
};



/// # Byte Source.
///
/// A sequential, rewindable supplier of encoded image bytes.
///
/// Reads may be short; returning `0` means the end of the stream has been
/// reached and must not happen spuriously, otherwise skips past the end of a
/// buffer will fail with [`RipoError::SkipExhausted`].
pub trait ByteSource {
	/// # Read.
	///
	/// Copy up to `buf.len()` bytes into `buf`, returning the number of bytes
	/// written.
	///
	/// ## Errors
	///
	/// Implementations should return [`RipoError::Read`] for I/O failures.
	fn read_into(&mut self, buf: &mut [u8]) -> Result<usize, RipoError>;

	/// # Rewind.
	///
	/// Reset the logical read position to zero.
	///
	/// ## Errors
	///
	/// Implementations should return [`RipoError::Read`] if the position
	/// cannot be restored.
	fn rewind(&mut self) -> Result<(), RipoError>;

	/// # Path Hint.
	///
	/// The file path backing the source, if any. Its extension is used to
	/// pick a likely codec before falling back to sniffing.
	fn path_hint(&self) -> Option<&Path> { None }
}

impl<T: AsRef<[u8]>> ByteSource for Cursor<T> {
	fn read_into(&mut self, buf: &mut [u8]) -> Result<usize, RipoError> {
		Read::read(self, buf).map_err(|e| RipoError::Read(e.to_string()))
	}

	#[inline]
	fn rewind(&mut self) -> Result<(), RipoError> {
		self.set_position(0);
		Ok(())
	}
}



#[derive(Debug)]
/// # Image Source.
///
/// This wraps any [`Read`] implementation (files, pipes, decompression
/// streams) as a [`ByteSource`].
///
/// Every byte pulled from the inner reader is kept in a replay cache, so
/// [`ByteSource::rewind`] works even when the reader itself cannot seek.
/// After a rewind, reads are served from the cache until it runs out, then
/// continue from the inner reader.
///
/// ## Examples
///
/// ```no_run
/// use ripo_core::ImageSource;
///
/// let mut src = ImageSource::open("/path/to/image.png").unwrap();
/// let img = ripo_core::load(&mut src).unwrap();
/// ```
pub struct ImageSource<R> {
	/// # Inner Reader.
	inner: R,

	/// # Everything Read So Far.
	cache: Vec<u8>,

	/// # Logical Position.
	pos: usize,

	/// # Path Hint.
	path: Option<PathBuf>,
}

impl ImageSource<File> {
	/// # Open File.
	///
	/// The path is kept as the source's [`ByteSource::path_hint`].
	///
	/// ## Errors
	///
	/// This will return an error if the path is not an existing, readable,
	/// regular file.
	pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, RipoError> {
		let path = path.as_ref();
		let meta = std::fs::metadata(path)
			.map_err(|e| RipoError::Read(e.to_string()))?;
		if ! meta.is_file() {
			return Err(RipoError::Read(format!("{} is not a file", path.display())));
		}

		let file = File::open(path).map_err(|e| RipoError::Read(e.to_string()))?;
		Ok(Self::new(file).with_path_hint(path))
	}
}

impl<R: Read> ImageSource<R> {
	#[must_use]
	/// # New.
	pub const fn new(inner: R) -> Self {
		Self {
			inner,
			cache: Vec::new(),
			pos: 0,
			path: None,
		}
	}

	#[must_use]
	/// # With Path Hint.
	///
	/// Attach a file name to a source that is not backed by one directly,
	/// e.g. an upload or an archive entry.
	pub fn with_path_hint<P: AsRef<Path>>(mut self, path: P) -> Self {
		self.path = Some(path.as_ref().to_path_buf());
		self
	}

	#[must_use]
	/// # Into Inner.
	///
	/// Drop the replay cache and return the wrapped reader.
	pub fn into_inner(self) -> R { self.inner }
}

impl<R: Read> ByteSource for ImageSource<R> {
	fn read_into(&mut self, buf: &mut [u8]) -> Result<usize, RipoError> {
		if buf.is_empty() { return Ok(0); }

		// Replay cached bytes first.
		if self.pos < self.cache.len() {
			let len = buf.len().min(self.cache.len() - self.pos);
			buf[..len].copy_from_slice(&self.cache[self.pos..self.pos + len]);
			self.pos += len;
			return Ok(len);
		}

		let len = loop {
			match self.inner.read(buf) {
				Ok(len) => break len,
				Err(e) if e.kind() == io::ErrorKind::Interrupted => {},
				Err(e) => return Err(RipoError::Read(e.to_string())),
			}
		};

		self.cache.extend_from_slice(&buf[..len]);
		self.pos += len;
		Ok(len)
	}

	#[inline]
	fn rewind(&mut self) -> Result<(), RipoError> {
		self.pos = 0;
		Ok(())
	}

	#[inline]
	fn path_hint(&self) -> Option<&Path> { self.path.as_deref() }
}



#[cfg(test)]
/// # Trickle Source.
///
/// An in-memory source handing out at most `step` bytes per read.
pub(crate) struct Trickle {
	data: Vec<u8>,
	pos: usize,
	step: usize,
	path: Option<PathBuf>,
}

#[cfg(test)]
impl Trickle {
	pub(crate) fn new(data: Vec<u8>, step: usize) -> Self {
		Self { data, pos: 0, step, path: None }
	}

	pub(crate) fn with_path_hint(mut self, path: &str) -> Self {
		self.path = Some(PathBuf::from(path));
		self
	}
}

#[cfg(test)]
impl ByteSource for Trickle {
	fn read_into(&mut self, buf: &mut [u8]) -> Result<usize, RipoError> {
		let len = buf.len().min(self.step).min(self.data.len() - self.pos);
		buf[..len].copy_from_slice(&self.data[self.pos..self.pos + len]);
		self.pos += len;
		Ok(len)
	}

	fn rewind(&mut self) -> Result<(), RipoError> {
		self.pos = 0;
		Ok(())
	}

	fn path_hint(&self) -> Option<&Path> { self.path.as_deref() }
}
