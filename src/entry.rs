//! Helper methods for extracting data from records.
use std::collections::HashMap;

use ldap3::SearchEntry;
use time::{OffsetDateTime, PrimitiveDateTime};

use crate::{attribute::ValueRef, config::TIME_FORMAT, error::Error, record::Record};

/// An extension trait for directory entries that provides convenience methods
/// for extracting data. Implemented for parsed [`Record`]s as well as
/// [`SearchEntry`] results of the `ldap3` client.
pub trait EntryExt {
	/// Get the first value of an attribute. Will return `None` if attribute
	/// value is not valid UTF-8.
	fn attr_first(&self, attr: &str) -> Option<&str>;

	/// Get the first value of an attribute, in binary form
	fn bin_attr_first(&self, attr: &str) -> Option<&[u8]>;

	/// Get the first value of an attribute, interpreted as a boolean.
	fn bool_first(&self, attr: &str) -> Option<Result<bool, Error>> {
		match self.attr_first(attr) {
			Some("TRUE") => Some(Ok(true)),
			Some("FALSE") => Some(Ok(false)),
			Some(_) => Some(Err(Error::Invalid(attr.to_owned()))),
			None => None,
		}
	}

	/// Get the first value of an attribute, interpreted as a generalized time
	/// such as `modifyTimestamp`.
	fn time_first(&self, attr: &str) -> Option<Result<OffsetDateTime, Error>> {
		let time = self.attr_first(attr)?;
		Some(
			PrimitiveDateTime::parse(time, &TIME_FORMAT)
				.map(PrimitiveDateTime::assume_utc)
				.map_err(Error::from),
		)
	}
}

impl EntryExt for Record {
	fn attr_first(&self, attr: &str) -> Option<&str> {
		self.get(attr)?.first()?.as_text()
	}

	fn bin_attr_first(&self, attr: &str) -> Option<&[u8]> {
		self.get(attr)?.first().map(|value| value.as_bytes())
	}
}

impl EntryExt for SearchEntry {
	fn attr_first(&self, attr: &str) -> Option<&str> {
		let attr = self.attrs.get(attr)?;
		attr.first().map(String::as_str)
	}

	fn bin_attr_first(&self, attr: &str) -> Option<&[u8]> {
		if let Some(attr) = self.attrs.get(attr) {
			return attr.first().map(String::as_bytes);
		}

		if let Some(attr) = self.bin_attrs.get(attr) {
			return attr.first().map(Vec::as_slice);
		}
		None
	}
}

/// Converts a record into the shape of an `ldap3` search result. Text and URL
/// values end up in `attrs`, binary values in `bin_attrs`, keyed by attribute
/// description (`id;options`).
impl From<Record> for SearchEntry {
	fn from(record: Record) -> Self {
		let (dn, attributes) = record.into_parts();
		let mut attrs: HashMap<String, Vec<String>> = HashMap::new();
		let mut bin_attrs: HashMap<String, Vec<Vec<u8>>> = HashMap::new();

		for attribute in &attributes {
			let description = attribute.description();
			for value in attribute.values().iter() {
				match value {
					ValueRef::Text(text) => {
						attrs.entry(description.clone()).or_default().push(text.to_owned());
					}
					ValueRef::Url(url) => {
						attrs.entry(description.clone()).or_default().push(url.to_string());
					}
					ValueRef::Binary(bytes) => {
						bin_attrs.entry(description.clone()).or_default().push(bytes.to_vec());
					}
				}
			}
		}

		SearchEntry { dn, attrs, bin_attrs }
	}
}
