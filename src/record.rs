//! Directory records assembled from LDIF.
use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::{
	attribute::{Attribute, KindMismatch, ValueRef},
	grammar,
};

/// An ordered collection of attributes keyed by identifier.
///
/// Identifiers compare case-insensitively unless the collection was created
/// case-sensitive. Declaring an identifier twice folds the second
/// declaration into the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attributes {
	/// Whether identifiers compare case-insensitively
	case_insensitive: bool,
	/// Attributes in order of first declaration
	entries: Vec<Attribute>,
}

impl Attributes {
	/// Create an empty collection with the given case sensitivity setting
	#[must_use]
	pub fn new(case_insensitive: bool) -> Self {
		Self { case_insensitive, entries: Vec::new() }
	}

	/// Whether identifiers compare case-insensitively
	#[must_use]
	pub fn is_case_insensitive(&self) -> bool {
		self.case_insensitive
	}

	/// Look up an attribute by identifier
	#[must_use]
	pub fn get(&self, id: &str) -> Option<&Attribute> {
		self.position(id).and_then(|index| self.entries.get(index))
	}

	/// Whether an attribute with this identifier is present
	#[must_use]
	pub fn contains(&self, id: &str) -> bool {
		self.position(id).is_some()
	}

	/// Iterate over the attributes in order of first declaration
	pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
		self.entries.iter()
	}

	/// The number of distinct attributes
	#[must_use]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the collection holds no attributes
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Insert an attribute, replacing any attribute with the same identifier.
	/// Returns the replaced attribute.
	pub fn put(&mut self, attribute: Attribute) -> Option<Attribute> {
		match self.position(attribute.id()) {
			Some(index) => {
				self.entries.get_mut(index).map(|slot| std::mem::replace(slot, attribute))
			}
			None => {
				self.entries.push(attribute);
				None
			}
		}
	}

	/// Remove the attribute with the given identifier
	pub fn remove(&mut self, id: &str) -> Option<Attribute> {
		self.position(id).map(|index| self.entries.remove(index))
	}

	/// Add the values of `attribute` to an existing attribute of the same
	/// identifier, or insert it if there is none.
	pub(crate) fn merge(
		&mut self,
		attribute: Attribute,
		ordered: bool,
	) -> Result<(), KindMismatch> {
		match self.position(attribute.id()).and_then(|index| self.entries.get_mut(index)) {
			Some(existing) => existing.merge(attribute, ordered),
			None => {
				self.entries.push(attribute);
				Ok(())
			}
		}
	}

	/// Index of the attribute with the given identifier
	fn position(&self, id: &str) -> Option<usize> {
		self.entries.iter().position(|attribute| {
			if self.case_insensitive {
				attribute.id().eq_ignore_ascii_case(id)
			} else {
				attribute.id() == id
			}
		})
	}
}

impl<'a> IntoIterator for &'a Attributes {
	type Item = &'a Attribute;
	type IntoIter = std::slice::Iter<'a, Attribute>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

/// A directory entry: a distinguished name and its attributes.
///
/// The `dn` is kept apart from the other attributes. A record always has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
	/// The distinguished name the entry is bound to
	dn: String,
	/// All attributes other than the distinguished name
	attributes: Attributes,
}

impl Record {
	/// Create a record from a distinguished name and its attributes
	pub fn new(dn: impl Into<String>, attributes: Attributes) -> Self {
		Self { dn: dn.into(), attributes }
	}

	/// The distinguished name of the record
	#[must_use]
	pub fn dn(&self) -> &str {
		&self.dn
	}

	/// The attributes of the record, not including the distinguished name
	#[must_use]
	pub fn attributes(&self) -> &Attributes {
		&self.attributes
	}

	/// Mutable access to the attributes of the record
	pub fn attributes_mut(&mut self) -> &mut Attributes {
		&mut self.attributes
	}

	/// Look up an attribute by identifier
	#[must_use]
	pub fn get(&self, id: &str) -> Option<&Attribute> {
		self.attributes.get(id)
	}

	/// Whether the record has an attribute with this identifier
	#[must_use]
	pub fn contains(&self, id: &str) -> bool {
		self.attributes.contains(id)
	}

	/// Split the record into its distinguished name and attributes
	#[must_use]
	pub fn into_parts(self) -> (String, Attributes) {
		(self.dn, self.attributes)
	}
}

/// Renders the record as an LDIF entry, without the separating blank line.
impl fmt::Display for Record {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if grammar::is_safe_string(&self.dn) {
			writeln!(f, "dn: {}", self.dn)?;
		} else {
			writeln!(f, "dn:: {}", STANDARD.encode(self.dn.as_bytes()))?;
		}

		for attribute in &self.attributes {
			let description = attribute.description();
			for value in attribute.values().iter() {
				match value {
					ValueRef::Text(text)
						if grammar::is_safe_string(text) || grammar::is_utf8_string(text) =>
					{
						writeln!(f, "{description}: {text}")?;
					}
					ValueRef::Text(text) => {
						writeln!(f, "{description}:: {}", STANDARD.encode(text.as_bytes()))?;
					}
					ValueRef::Binary(bytes) => {
						writeln!(f, "{description}:: {}", STANDARD.encode(bytes))?;
					}
					ValueRef::Url(url) => writeln!(f, "{description}:< {url}")?,
				}
			}
		}
		Ok(())
	}
}
