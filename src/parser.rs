//! Assembly of LDIF lines into records.
//!
//! The parser reads lines from a [`LineSource`] and classifies each with a
//! [`SeparatorPolicy`]. Lines are collected into an attribute buffer until the
//! next attribute or the end of the record begins, at which point the buffer
//! is validated by the [attribute grammar](crate::grammar) and merged into
//! the record. Once the record ends it is checked against the configured
//! [`RecordSpecification`] and returned.
//!
//! Change records (`changetype:` or `control:`) have no implementation and
//! are discarded, as are records holding a malformed attribute. Neither
//! aborts the scan: [`LdifParser::next_outcome`] reports them as
//! [`Outcome::Skipped`], while [`LdifParser::next_record`] passes over them.
use std::{fmt, path::PathBuf};

use tracing::{debug, error, trace, warn};

use crate::{
	attribute::{Attribute, KindMismatch, Value, ValueKind},
	config::ParserConfig,
	error::{Error, GrammarError},
	grammar::{AttributePolicy, DefaultAttributePolicy},
	line::{LineKind, SeparatorPolicy},
	record::{Attributes, Record},
	schema::{DefaultSchemaSpecification, RecordSpecification},
	source::{FileSource, LineSource},
};

/// The result of reading one logical record.
#[derive(Debug)]
pub enum Outcome {
	/// A complete record satisfying the specification
	Record(Record),
	/// A record which was read but discarded
	Skipped(Skipped),
}

/// A discarded record.
#[derive(Debug)]
pub struct Skipped {
	/// The distinguished name of the record, if it was read before the record
	/// was discarded
	pub dn: Option<String>,
	/// Why the record was discarded
	pub reason: SkipReason,
}

/// Reasons for discarding a record.
#[derive(thiserror::Error, Debug)]
pub enum SkipReason {
	/// The record is an LDIF change record.
	#[error("LDIF change records have no implementation")]
	ChangeRecord,
	/// An attribute of the record is malformed.
	#[error(transparent)]
	Grammar(#[from] GrammarError),
	/// A value does not match the kind of the earlier values of its attribute.
	#[error("Attribute {id} holds {existing} values and cannot take a {incoming} value")]
	ValueKind {
		/// Identifier of the attribute
		id: String,
		/// Kind of the values already held
		existing: ValueKind,
		/// Kind of the rejected value
		incoming: ValueKind,
	},
	/// The distinguished name is not text.
	#[error("The distinguished name must be UTF-8 text, found a {0} value")]
	InvalidDn(ValueKind),
	/// The record has no distinguished name.
	#[error("Record has no distinguished name")]
	MissingDn,
}

/// A record which is still being assembled.
#[derive(Debug)]
struct PartialRecord {
	/// The distinguished name, once its line was flushed
	dn: Option<String>,
	/// Attributes other than the distinguished name
	attributes: Attributes,
	/// Set once an attribute fails, after which further lines are ignored
	failure: Option<SkipReason>,
}

impl PartialRecord {
	/// Start an empty record
	fn new(case_insensitive: bool) -> Self {
		Self { dn: None, attributes: Attributes::new(case_insensitive), failure: None }
	}

	/// Add a parsed attribute. A `dn` attribute sets the distinguished name,
	/// anything else is merged with earlier declarations of the same id.
	fn add(&mut self, attribute: Attribute, ordered: bool) -> Result<(), SkipReason> {
		if attribute.id().eq_ignore_ascii_case("dn") {
			trace!("...adding DN to record.");
			let kind = attribute.value_kind();
			let (_, values) = attribute.into_parts();
			let dn = match values.into_vec().into_iter().next() {
				Some(Value::Text(text)) => text,
				Some(Value::Binary(bytes)) => {
					String::from_utf8(bytes).map_err(|_| SkipReason::InvalidDn(kind))?
				}
				_ => return Err(SkipReason::InvalidDn(kind)),
			};
			self.dn = Some(dn);
			return Ok(());
		}

		trace!("...adding attribute to record.");
		let id = attribute.id().to_owned();
		self.attributes.merge(attribute, ordered).map_err(
			|KindMismatch { existing, incoming }| SkipReason::ValueKind { id, existing, incoming },
		)
	}
}

/// Reads records from an LDIF line source.
///
/// The source has to be [opened](Self::open) before records can be read. It
/// is closed by [`close`](Self::close), or when the parser is dropped. One
/// parser reads one stream sequentially and carries state between lines, so
/// it must not be shared between concurrent readers.
pub struct LdifParser<S: LineSource> {
	/// Where lines are read from
	source: S,
	/// Whether the source has been opened
	open: bool,
	/// Parser settings
	config: ParserConfig,
	/// Classifies lines, carrying state across the lines of one record
	separator: SeparatorPolicy,
	/// Validates and decodes attribute buffers
	policy: Box<dyn AttributePolicy + Send>,
	/// Checked against every assembled record
	specification: Box<dyn RecordSpecification + Send>,
}

impl<S: LineSource> fmt::Debug for LdifParser<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LdifParser")
			.field("open", &self.open)
			.field("config", &self.config)
			.field("separator", &self.separator)
			.finish_non_exhaustive()
	}
}

impl LdifParser<FileSource> {
	/// Create a parser for the LDIF file at `path`
	pub fn from_path(path: impl Into<PathBuf>) -> Self {
		Self::new(FileSource::new(path))
	}
}

impl<S: LineSource> LdifParser<S> {
	/// Create a parser with the default configuration, accepting every record
	pub fn new(source: S) -> Self {
		Self::with_config(source, ParserConfig::default())
	}

	/// Create a parser with the given configuration
	pub fn with_config(source: S, config: ParserConfig) -> Self {
		Self {
			source,
			open: false,
			config,
			separator: SeparatorPolicy::new(),
			policy: Box::new(DefaultAttributePolicy),
			specification: Box::new(DefaultSchemaSpecification),
		}
	}

	/// Check every record against `specification` before returning it
	#[must_use]
	pub fn with_specification(
		mut self,
		specification: impl RecordSpecification + Send + 'static,
	) -> Self {
		self.specification = Box::new(specification);
		self
	}

	/// Validate and decode attributes with `policy` instead of the RFC 2849
	/// grammar
	#[must_use]
	pub fn with_attribute_policy(mut self, policy: impl AttributePolicy + Send + 'static) -> Self {
		self.policy = Box::new(policy);
		self
	}

	/// The parser configuration
	#[must_use]
	pub fn config(&self) -> &ParserConfig {
		&self.config
	}

	/// The line source
	#[must_use]
	pub fn source(&self) -> &S {
		&self.source
	}

	/// Whether the source is open
	#[must_use]
	pub fn is_open(&self) -> bool {
		self.open
	}

	/// Open the line source
	pub fn open(&mut self) -> Result<(), Error> {
		self.source.open()?;
		self.open = true;
		self.separator.reset();
		Ok(())
	}

	/// Close the line source. Closing a parser which is not open does nothing.
	pub fn close(&mut self) -> Result<(), Error> {
		if self.open {
			self.open = false;
			self.source.close()?;
		}
		Ok(())
	}

	/// Start reading from the beginning of the source again
	pub fn reset(&mut self) -> Result<(), Error> {
		self.ensure_open()?;
		self.source.reset()?;
		self.separator.reset();
		Ok(())
	}

	/// Whether the source has more input to read
	pub fn has_more_records(&mut self) -> Result<bool, Error> {
		self.ensure_open()?;
		Ok(self.source.has_more()?)
	}

	/// Whether the source can be read from. Equivalent to
	/// [`has_more_records`](Self::has_more_records).
	pub fn is_ready(&mut self) -> Result<bool, Error> {
		self.has_more_records()
	}

	/// Read the next record satisfying the specification, passing over
	/// discarded records. Returns `None` once the input is exhausted.
	///
	/// A record rejected by the specification is returned as
	/// [`Error::Conformance`]; reading can continue with the next call.
	pub fn next_record(&mut self) -> Result<Option<Record>, Error> {
		while let Some(outcome) = self.next_outcome()? {
			match outcome {
				Outcome::Record(record) => return Ok(Some(record)),
				Outcome::Skipped(Skipped { dn, reason }) => {
					warn!(dn = dn.as_deref().unwrap_or_default(), "Skipping record: {reason}");
				}
			}
		}
		Ok(None)
	}

	/// Read the next logical record, reporting discarded records instead of
	/// passing over them. Returns `None` once the input is exhausted or if it
	/// holds no further record.
	pub fn next_outcome(&mut self) -> Result<Option<Outcome>, Error> {
		self.ensure_open()?;
		if !self.source.has_more()? {
			debug!("Line source exhausted");
			return Ok(None);
		}
		self.separator.reset();

		let mut record: Option<PartialRecord> = None;
		let mut change: Option<Skipped> = None;
		let mut buffer = String::new();
		let mut in_comment = false;

		loop {
			let line = self.source.read_line()?;
			let text = line.as_deref().unwrap_or_default();
			let kind = self.separator.assess(line.as_deref());

			match kind {
				LineKind::NewRecord => {
					trace!("Starting new record.");
					record = Some(PartialRecord::new(self.config.case_insensitive));
					text.clone_into(&mut buffer);
				}
				LineKind::Control | LineKind::ChangeType => {
					trace!("'{text}' encountered.");
					warn!("LDIF change records have no implementation: record will be ignored.");
					let dn = record.take().and_then(|mut partial| {
						self.flush(&buffer, &mut partial);
						partial.dn
					});
					buffer.clear();
					change = Some(Skipped { dn, reason: SkipReason::ChangeRecord });
				}
				LineKind::Attribute => {
					if let Some(partial) = record.as_mut() {
						self.flush(&buffer, partial);
					}
					trace!("Starting new attribute.");
					text.clone_into(&mut buffer);
				}
				LineKind::Continuation => {
					// Folded comment lines belong to the comment
					if let Some(folded) = text.strip_prefix(' ').filter(|_| !in_comment) {
						trace!("...appending line to buffer.");
						buffer.push_str(folded);
					}
				}
				LineKind::EndOfRecord => {
					trace!("...done parsing record. (EndOfRecord)");
					if let Some(skipped) = change {
						return Ok(Some(Outcome::Skipped(skipped)));
					}
					let Some(mut partial) = record else {
						return Ok(None);
					};
					self.flush(&buffer, &mut partial);
					return self.complete(partial).map(Some);
				}
				LineKind::VersionIdentifier | LineKind::Comment | LineKind::Void => {}
			}

			in_comment =
				kind == LineKind::Comment || (in_comment && kind == LineKind::Continuation);

			if line.is_none() {
				// Never encountered a valid record.
				return Ok(None);
			}
		}
	}

	/// Validate the buffered attribute and add it to the record
	fn flush(&self, buffer: &str, partial: &mut PartialRecord) {
		if buffer.is_empty() || partial.failure.is_some() {
			return;
		}
		let result = self
			.policy
			.parse(buffer)
			.map_err(SkipReason::from)
			.and_then(|attribute| partial.add(attribute, self.config.ordered_values));
		if let Err(reason) = result {
			error!("Error adding attribute to record: {reason}");
			partial.failure = Some(reason);
		}
	}

	/// Finish a record, checking it against the specification
	fn complete(&self, partial: PartialRecord) -> Result<Outcome, Error> {
		let PartialRecord { dn, attributes, failure } = partial;
		if let Some(reason) = failure {
			return Ok(Outcome::Skipped(Skipped { dn, reason }));
		}
		let Some(dn) = dn else {
			return Ok(Outcome::Skipped(Skipped { dn: None, reason: SkipReason::MissingDn }));
		};

		let record = Record::new(dn, attributes);
		if self.specification.is_satisfied(&record) {
			debug!("record parsed:\n{record}");
			Ok(Outcome::Record(record))
		} else {
			Err(Error::Conformance { dn: record.dn().to_owned() })
		}
	}

	/// Fail unless the source was opened
	fn ensure_open(&self) -> Result<(), Error> {
		if self.open {
			Ok(())
		} else {
			Err(Error::NotOpen)
		}
	}
}

impl<S: LineSource> Drop for LdifParser<S> {
	fn drop(&mut self) {
		if let Err(err) = self.close() {
			warn!("Closing the LDIF source failed: {err}");
		}
	}
}

/// Iterates over the records satisfying the specification, as returned by
/// [`LdifParser::next_record`].
impl<S: LineSource> Iterator for LdifParser<S> {
	type Item = Result<Record, Error>;

	fn next(&mut self) -> Option<Self::Item> {
		self.next_record().transpose()
	}
}
