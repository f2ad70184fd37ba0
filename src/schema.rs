//! Conformance checks applied to assembled records.
use crate::record::Record;

/// Decides whether a fully assembled record is acceptable.
///
/// The parser hands every record to its specification before returning it. A
/// rejected record is reported as [`Error::Conformance`](crate::Error).
///
/// Any `Fn(&Record) -> bool` closure is a specification:
/// ```
/// use ldif_parser::{Record, RecordSpecification};
///
/// let has_mail = |record: &Record| record.contains("mail");
/// # let _: &dyn RecordSpecification = &has_mail;
/// ```
pub trait RecordSpecification {
	/// Whether the record satisfies this specification
	fn is_satisfied(&self, record: &Record) -> bool;
}

impl<F> RecordSpecification for F
where
	F: Fn(&Record) -> bool,
{
	fn is_satisfied(&self, record: &Record) -> bool {
		self(record)
	}
}

/// Accepts every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSchemaSpecification;

impl RecordSpecification for DefaultSchemaSpecification {
	fn is_satisfied(&self, _record: &Record) -> bool {
		true
	}
}

/// Accepts records carrying every one of a set of attributes, e.g.
/// `objectClass`. Identifiers compare case-insensitively regardless of the
/// record's own setting.
#[derive(Debug, Clone, Default)]
pub struct RequiredAttributes {
	/// Identifiers which must be present
	ids: Vec<String>,
}

impl RequiredAttributes {
	/// Require each of `ids`
	pub fn new<I, S>(ids: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self { ids: ids.into_iter().map(Into::into).collect() }
	}

	/// The required identifiers
	#[must_use]
	pub fn ids(&self) -> &[String] {
		&self.ids
	}
}

impl RecordSpecification for RequiredAttributes {
	fn is_satisfied(&self, record: &Record) -> bool {
		self.ids.iter().all(|id| {
			record.attributes().iter().any(|attribute| attribute.id().eq_ignore_ascii_case(id))
		})
	}
}
