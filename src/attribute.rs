//! Typed attributes as produced by the attribute grammar.
use std::fmt;

use url::Url;

/// The kind of value held by an [`Attribute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
	/// UTF-8 text, from the plain (`:`) or international text forms
	Text,
	/// Raw bytes, decoded from the Base64 (`::`) form
	Binary,
	/// A URI reference, from the URL (`:<`) form
	Url,
}

impl fmt::Display for ValueKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			ValueKind::Text => "text",
			ValueKind::Binary => "binary",
			ValueKind::Url => "URL",
		})
	}
}

/// A single decoded attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
	/// UTF-8 text
	Text(String),
	/// Raw bytes
	Binary(Vec<u8>),
	/// A URI reference. The referenced resource is never fetched.
	Url(Url),
}

impl Value {
	/// The kind of this value
	#[must_use]
	pub fn kind(&self) -> ValueKind {
		self.borrowed().kind()
	}

	/// Borrow this value
	#[must_use]
	pub fn borrowed(&self) -> ValueRef<'_> {
		match self {
			Value::Text(text) => ValueRef::Text(text),
			Value::Binary(bytes) => ValueRef::Binary(bytes),
			Value::Url(url) => ValueRef::Url(url),
		}
	}
}

/// A borrowed attribute value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueRef<'a> {
	/// UTF-8 text
	Text(&'a str),
	/// Raw bytes
	Binary(&'a [u8]),
	/// A URI reference
	Url(&'a Url),
}

impl<'a> ValueRef<'a> {
	/// The kind of this value
	#[must_use]
	pub fn kind(&self) -> ValueKind {
		match self {
			ValueRef::Text(_) => ValueKind::Text,
			ValueRef::Binary(_) => ValueKind::Binary,
			ValueRef::Url(_) => ValueKind::Url,
		}
	}

	/// The value as text. URLs are returned in their serialized form, bytes
	/// only if they are valid UTF-8.
	#[must_use]
	pub fn as_text(&self) -> Option<&'a str> {
		match *self {
			ValueRef::Text(text) => Some(text),
			ValueRef::Binary(bytes) => std::str::from_utf8(bytes).ok(),
			ValueRef::Url(url) => Some(url.as_str()),
		}
	}

	/// The value in binary form
	#[must_use]
	pub fn as_bytes(&self) -> &'a [u8] {
		match *self {
			ValueRef::Text(text) => text.as_bytes(),
			ValueRef::Binary(bytes) => bytes,
			ValueRef::Url(url) => url.as_str().as_bytes(),
		}
	}

	/// Copy the borrowed value into an owned [`Value`]
	#[must_use]
	pub fn to_owned_value(&self) -> Value {
		match *self {
			ValueRef::Text(text) => Value::Text(text.to_owned()),
			ValueRef::Binary(bytes) => Value::Binary(bytes.to_vec()),
			ValueRef::Url(url) => Value::Url(url.clone()),
		}
	}
}

/// The values of one attribute. Every value of an attribute shares the kind
/// of the first value parsed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Values {
	/// Text values
	Text(Vec<String>),
	/// Binary values
	Binary(Vec<Vec<u8>>),
	/// URL values
	Url(Vec<Url>),
}

/// A value could not be added to an attribute holding values of another kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct KindMismatch {
	/// Kind of the values already held
	pub(crate) existing: ValueKind,
	/// Kind of the rejected value
	pub(crate) incoming: ValueKind,
}

impl Values {
	/// The kind shared by all values
	#[must_use]
	pub fn kind(&self) -> ValueKind {
		match self {
			Values::Text(_) => ValueKind::Text,
			Values::Binary(_) => ValueKind::Binary,
			Values::Url(_) => ValueKind::Url,
		}
	}

	/// The number of values
	#[must_use]
	pub fn len(&self) -> usize {
		match self {
			Values::Text(values) => values.len(),
			Values::Binary(values) => values.len(),
			Values::Url(values) => values.len(),
		}
	}

	/// Whether there are no values. Attributes produced by this crate always
	/// hold at least one.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Get the value at `index`
	#[must_use]
	pub fn get(&self, index: usize) -> Option<ValueRef<'_>> {
		match self {
			Values::Text(values) => values.get(index).map(|v| ValueRef::Text(v)),
			Values::Binary(values) => values.get(index).map(|v| ValueRef::Binary(v)),
			Values::Url(values) => values.get(index).map(ValueRef::Url),
		}
	}

	/// Iterate over the values in declaration order
	pub fn iter(&self) -> impl Iterator<Item = ValueRef<'_>> {
		(0..self.len()).filter_map(|index| self.get(index))
	}

	/// Take ownership of every value
	pub(crate) fn into_vec(self) -> Vec<Value> {
		match self {
			Values::Text(values) => values.into_iter().map(Value::Text).collect(),
			Values::Binary(values) => values.into_iter().map(Value::Binary).collect(),
			Values::Url(values) => values.into_iter().map(Value::Url).collect(),
		}
	}

	/// Add a value. With `ordered` unset the values behave as a set and an
	/// already present value is dropped. Text and binary values are converted
	/// into each other when no information is lost.
	pub(crate) fn push(&mut self, value: Value, ordered: bool) -> Result<(), KindMismatch> {
		let existing = self.kind();
		let incoming = value.kind();
		match (self, value) {
			(Values::Text(values), Value::Text(text)) => push_value(values, text, ordered),
			(Values::Text(values), Value::Binary(bytes)) => {
				let text =
					String::from_utf8(bytes).map_err(|_| KindMismatch { existing, incoming })?;
				push_value(values, text, ordered);
			}
			(Values::Binary(values), Value::Binary(bytes)) => push_value(values, bytes, ordered),
			(Values::Binary(values), Value::Text(text)) => {
				push_value(values, text.into_bytes(), ordered);
			}
			(Values::Url(values), Value::Url(url)) => push_value(values, url, ordered),
			_ => return Err(KindMismatch { existing, incoming }),
		}
		Ok(())
	}
}

impl From<Value> for Values {
	fn from(value: Value) -> Self {
		match value {
			Value::Text(text) => Values::Text(vec![text]),
			Value::Binary(bytes) => Values::Binary(vec![bytes]),
			Value::Url(url) => Values::Url(vec![url]),
		}
	}
}

/// Append `value`, skipping it if unordered and already present
fn push_value<T: PartialEq>(values: &mut Vec<T>, value: T, ordered: bool) {
	if ordered || !values.contains(&value) {
		values.push(value);
	}
}

/// An attribute: an identifier, its options and one or more values.
///
/// The identifier keeps the case it was first declared with. Options keep
/// their declaration order so a record can be written back out unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
	/// The attribute type, e.g. `cn` or `2.5.4.3`
	id: String,
	/// Options such as `lang-en`, without the `;` separator
	options: Vec<String>,
	/// At least one value
	values: Values,
}

impl Attribute {
	/// Create an attribute holding a single value
	pub fn new(id: impl Into<String>, value: Value) -> Self {
		Self { id: id.into(), options: Vec::new(), values: value.into() }
	}

	/// Replace the options of this attribute
	#[must_use]
	pub fn with_options<I, S>(mut self, options: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.options = options.into_iter().map(Into::into).collect();
		self
	}

	/// The attribute identifier in its original case
	#[must_use]
	pub fn id(&self) -> &str {
		&self.id
	}

	/// The options in declaration order
	#[must_use]
	pub fn options(&self) -> &[String] {
		&self.options
	}

	/// Whether the attribute carries `option`. Options compare
	/// case-insensitively.
	#[must_use]
	pub fn has_option(&self, option: &str) -> bool {
		self.options.iter().any(|o| o.eq_ignore_ascii_case(option))
	}

	/// The attribute description: the identifier followed by its options,
	/// e.g. `cn;lang-ja`
	#[must_use]
	pub fn description(&self) -> String {
		let mut description = self.id.clone();
		for option in &self.options {
			description.push(';');
			description.push_str(option);
		}
		description
	}

	/// The values of this attribute
	#[must_use]
	pub fn values(&self) -> &Values {
		&self.values
	}

	/// The kind shared by all values
	#[must_use]
	pub fn value_kind(&self) -> ValueKind {
		self.values.kind()
	}

	/// The first value
	#[must_use]
	pub fn first(&self) -> Option<ValueRef<'_>> {
		self.values.get(0)
	}

	/// Split the attribute into its identifier and values
	pub(crate) fn into_parts(self) -> (String, Values) {
		(self.id, self.values)
	}

	/// Fold another declaration of the same attribute into this one. New
	/// options are appended, values are added per [`Values::push`].
	pub(crate) fn merge(&mut self, other: Attribute, ordered: bool) -> Result<(), KindMismatch> {
		let Attribute { options, values, .. } = other;
		for value in values.into_vec() {
			self.values.push(value, ordered)?;
		}
		for option in options {
			if !self.has_option(&option) {
				self.options.push(option);
			}
		}
		Ok(())
	}
}
