//! Error codes

/// Errors that can occur when using this library
#[derive(thiserror::Error, Debug)]
pub enum Error {
	/// Reading from or closing the line source failed.
	#[error(transparent)]
	Io(#[from] std::io::Error),
	/// The parser was used before its line source was opened.
	#[error("Parser not open: a line source must be opened before reading records")]
	NotOpen,
	/// A fully assembled record was rejected by the record specification.
	#[error("Record [dn: {dn}] does not conform to specification")]
	Conformance {
		/// Distinguished name of the rejected record
		dn: String,
	},
	/// The contents of an attribute did not conform to the expected syntax.
	#[error("Malformed data: {0}")]
	Invalid(String),
	/// A time value was malformed and failed to parse.
	#[error("Malformed time")]
	Time(#[from] time::error::Parse),
}

/// A single attribute buffer was not a valid RFC 2849 attribute.
#[derive(thiserror::Error, Debug)]
pub enum GrammarError {
	/// The buffer matched none of the admissible attribute forms.
	#[error("Not a valid attribute: [{0}]")]
	Format(String),
	/// The buffer looked like a Base64 attribute but its value did not decode.
	#[error("Invalid Base64 value in attribute: [{buffer}]")]
	Base64 {
		/// The offending attribute buffer
		buffer: String,
		/// The underlying decoding failure
		#[source]
		source: base64::DecodeError,
	},
	/// The buffer looked like a URL attribute but its value is not a URI.
	#[error("Invalid URL value in attribute: [{buffer}]")]
	Url {
		/// The offending attribute buffer
		buffer: String,
		/// The underlying URI parsing failure
		#[source]
		source: url::ParseError,
	},
}
