//! Config for the LDIF parser.
use serde::{Deserialize, Serialize};

/// Configuration for which variant of ISO8601 to use for parsing time values
/// held in records. Configured according the syntax definition
/// `( 1.3.6.1.4.1.1466.115.121.1.24 DESC 'Generalized Time' )` described in
/// RFC4517 section 3.1.13
pub const TIME_FORMAT: &[time::format_description::FormatItem] =
	time::macros::format_description!("[year][month][day][hour][minute][second]Z");

/// Parser configuration.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ParserConfig {
	/// Whether attribute identifiers of produced records compare
	/// case-insensitively
	pub case_insensitive: bool,
	/// Keep repeated values of an attribute, in declaration order. When unset
	/// the values of an attribute form a set and repeats are dropped.
	pub ordered_values: bool,
}

impl Default for ParserConfig {
	fn default() -> Self {
		Self { case_insensitive: true, ordered_values: false }
	}
}
