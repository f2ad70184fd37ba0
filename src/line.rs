//! Classification of LDIF lines.
use std::sync::LazyLock;

use regex::Regex;

/// The syntactic role of one LDIF line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
	/// `version: 1`, outside of a record
	VersionIdentifier,
	/// A `dn:` line starting a record
	NewRecord,
	/// A `control:` line. The rest of the record is discarded.
	Control,
	/// A `changetype:` line. The rest of the record is discarded.
	ChangeType,
	/// The start of an attribute declaration
	Attribute,
	/// A folded line, continuing the previous line after its leading space
	Continuation,
	/// A `#` comment
	Comment,
	/// The blank line (or end of input) terminating a record
	EndOfRecord,
	/// A line to ignore
	Void,
}

/// Matches the version marker of an LDIF file
#[allow(clippy::expect_used)]
static VERSION: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"^version:\s*\d+(\.\d*)?$").expect("version expression is valid")
});

/// Classifies lines one at a time.
///
/// The policy remembers whether it is inside a record and whether the rest of
/// the current record is being skipped, so one instance must only ever see the
/// lines of one stream, in order.
#[derive(Debug, Clone, Default)]
pub struct SeparatorPolicy {
	/// A `dn:` line was seen and the record has not ended yet
	record: bool,
	/// A change record was found and the rest of it is discarded
	skip: bool,
}

impl SeparatorPolicy {
	/// Create a policy expecting the start of a record
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Whether the policy is inside a record
	#[must_use]
	pub fn in_record(&self) -> bool {
		self.record
	}

	/// Whether the rest of the current record is skipped
	#[must_use]
	pub fn is_skipping(&self) -> bool {
		self.skip
	}

	/// Forget any record in progress
	pub fn reset(&mut self) {
		self.record = false;
		self.skip = false;
	}

	/// Classify the next line. `None` signals the end of input, which ends any
	/// record in progress.
	pub fn assess(&mut self, line: Option<&str>) -> LineKind {
		if !self.record {
			return match line {
				Some(line) if VERSION.is_match(line) => LineKind::VersionIdentifier,
				Some(line) if line.starts_with("dn:") => {
					self.record = true;
					self.skip = false;
					LineKind::NewRecord
				}
				_ => LineKind::Void,
			};
		}

		let Some(line) = line.filter(|line| !line.is_empty()) else {
			self.reset();
			return LineKind::EndOfRecord;
		};

		if self.skip {
			LineKind::Void
		} else if line.starts_with("control:") {
			self.skip = true;
			LineKind::Control
		} else if line.starts_with("changetype:") {
			self.skip = true;
			LineKind::ChangeType
		} else if line.starts_with('#') {
			LineKind::Comment
		} else if line.starts_with(' ') {
			LineKind::Continuation
		} else {
			LineKind::Attribute
		}
	}
}

#[cfg(test)]
mod tests {
	use super::{LineKind, SeparatorPolicy};

	fn assess_all(lines: &[Option<&str>]) -> Vec<LineKind> {
		let mut policy = SeparatorPolicy::new();
		lines.iter().map(|line| policy.assess(*line)).collect()
	}

	#[test]
	fn outside_a_record() {
		assert_eq!(
			assess_all(&[
				Some("version: 1"),
				Some("version:2.1"),
				Some("version: one"),
				Some(""),
				Some("# leading comment"),
				Some("cn: no record yet"),
				None,
			]),
			[
				LineKind::VersionIdentifier,
				LineKind::VersionIdentifier,
				LineKind::Void,
				LineKind::Void,
				LineKind::Void,
				LineKind::Void,
				LineKind::Void,
			]
		);
	}

	#[test]
	fn inside_a_record() {
		assert_eq!(
			assess_all(&[
				Some("dn: cn=Keith Barlow"),
				Some("# comment"),
				Some("cn: Keith"),
				Some(" Barlow"),
				Some("  two spaces"),
				Some("dn: cn=again"),
				Some("version: 1"),
				Some(""),
				Some(""),
			]),
			[
				LineKind::NewRecord,
				LineKind::Comment,
				LineKind::Attribute,
				LineKind::Continuation,
				LineKind::Continuation,
				LineKind::Attribute,
				LineKind::Attribute,
				LineKind::EndOfRecord,
				LineKind::Void,
			]
		);
	}

	#[test]
	fn change_records_are_skipped() {
		let mut policy = SeparatorPolicy::new();
		assert_eq!(policy.assess(Some("dn: cn=Keith Barlow")), LineKind::NewRecord);
		assert_eq!(policy.assess(Some("changetype: modify")), LineKind::ChangeType);
		assert!(policy.is_skipping());
		assert_eq!(policy.assess(Some("replace: cn")), LineKind::Void);
		assert_eq!(policy.assess(Some("control: 1.2.3")), LineKind::Void);
		assert_eq!(policy.assess(Some("-")), LineKind::Void);
		assert_eq!(policy.assess(Some("")), LineKind::EndOfRecord);
		assert!(!policy.in_record() && !policy.is_skipping());

		assert_eq!(policy.assess(Some("dn: cn=next")), LineKind::NewRecord);
		assert_eq!(policy.assess(Some("control: 1.2.840.113556.1.4.805 true")), LineKind::Control);
		assert_eq!(policy.assess(None), LineKind::EndOfRecord);
	}

	#[test]
	fn classification_depends_only_on_carried_state() {
		for line in ["dn: cn=a", "version: 1", "cn: a", " folded", "#", ""] {
			assert_eq!(
				SeparatorPolicy::new().assess(Some(line)),
				SeparatorPolicy::new().assess(Some(line)),
			);
		}
	}
}
