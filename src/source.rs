//! Sources of LDIF lines.
use std::{
	fs::File,
	io::{self, BufRead, BufReader, Cursor, Seek},
	path::{Path, PathBuf},
};

/// A sequential supplier of text lines.
///
/// Lines are handed out without their line terminator (`\n` or `\r\n`). A
/// source has to be opened before the first line is read and should be closed
/// once it is no longer needed, releasing any underlying handle.
pub trait LineSource {
	/// Acquire the underlying resource
	fn open(&mut self) -> io::Result<()> {
		Ok(())
	}

	/// Read the next line, or `None` at the end of input
	fn read_line(&mut self) -> io::Result<Option<String>>;

	/// Whether more input can be read
	fn has_more(&mut self) -> io::Result<bool>;

	/// Start over from the first line
	fn reset(&mut self) -> io::Result<()> {
		Err(io::Error::new(io::ErrorKind::Unsupported, "line source cannot be reset"))
	}

	/// Release the underlying resource
	fn close(&mut self) -> io::Result<()> {
		Ok(())
	}
}

/// Read one line from `reader`, stripping the terminator
fn read_line_from(reader: &mut impl BufRead) -> io::Result<Option<String>> {
	let mut line = String::new();
	if reader.read_line(&mut line)? == 0 {
		return Ok(None);
	}
	if line.ends_with('\n') {
		line.pop();
		if line.ends_with('\r') {
			line.pop();
		}
	}
	Ok(Some(line))
}

/// Lines from any buffered reader, such as standard input or an in-memory
/// buffer. Cannot be reset.
#[derive(Debug)]
pub struct ReaderSource<R> {
	/// The wrapped reader
	reader: R,
}

impl<R: BufRead> ReaderSource<R> {
	/// Wrap a buffered reader
	pub fn new(reader: R) -> Self {
		Self { reader }
	}

	/// Unwrap the reader
	pub fn into_inner(self) -> R {
		self.reader
	}
}

impl ReaderSource<Cursor<String>> {
	/// Lines of an in-memory text
	pub fn from_text(text: impl Into<String>) -> Self {
		Self::new(Cursor::new(text.into()))
	}
}

impl<R: BufRead> LineSource for ReaderSource<R> {
	fn read_line(&mut self) -> io::Result<Option<String>> {
		read_line_from(&mut self.reader)
	}

	fn has_more(&mut self) -> io::Result<bool> {
		Ok(!self.reader.fill_buf()?.is_empty())
	}
}

/// Lines of a file. The file is opened by [`LineSource::open`] and closed by
/// [`LineSource::close`] or when the source is dropped.
#[derive(Debug)]
pub struct FileSource {
	/// Location of the file
	path: PathBuf,
	/// The open file, if any
	reader: Option<BufReader<File>>,
}

impl FileSource {
	/// A source for the file at `path`. Nothing is opened yet.
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into(), reader: None }
	}

	/// Location of the file
	#[must_use]
	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Whether the file is currently open
	#[must_use]
	pub fn is_open(&self) -> bool {
		self.reader.is_some()
	}

	/// The open reader
	fn reader(&mut self) -> io::Result<&mut BufReader<File>> {
		let path = &self.path;
		self.reader.as_mut().ok_or_else(|| {
			io::Error::new(
				io::ErrorKind::NotConnected,
				format!("{} has not been opened", path.display()),
			)
		})
	}
}

impl LineSource for FileSource {
	fn open(&mut self) -> io::Result<()> {
		if !self.path.is_file() {
			return Err(io::Error::new(
				io::ErrorKind::NotFound,
				format!("{}: resource does not exist or is not a file", self.path.display()),
			));
		}
		self.reader = Some(BufReader::new(File::open(&self.path)?));
		Ok(())
	}

	fn read_line(&mut self) -> io::Result<Option<String>> {
		read_line_from(self.reader()?)
	}

	fn has_more(&mut self) -> io::Result<bool> {
		Ok(!self.reader()?.fill_buf()?.is_empty())
	}

	fn reset(&mut self) -> io::Result<()> {
		self.reader()?.rewind()
	}

	fn close(&mut self) -> io::Result<()> {
		self.reader = None;
		Ok(())
	}
}
