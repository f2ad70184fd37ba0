//! Validation and decoding of single LDIF attribute declarations.
//!
//! An attribute buffer is the unfolded, single line form of one attribute:
//! `AttributeDescription ":" value-spec`, where the description is an
//! attribute type followed by any number of `;option`s. Four forms are
//! admitted, tried in this order with the first match winning:
//!
//! 1. plain: `id[;options]: SAFE-STRING`, decoded to text. The value may be
//!    empty.
//! 2. Base64: `id[;options]:: BASE64-STRING`, decoded to bytes.
//! 3. URL: `id[;options]:< URL`, decoded to a [`Url`]. The resource it points
//!    to is never fetched.
//! 4. UTF-8: `id[;options]: UTF8-STRING`, decoded to text. This admits
//!    letters, digits and whitespace of any script, which SAFE-STRING
//!    rejects.
//!
//! The character classes follow RFC 2849, URLs follow RFC 1738 (see
//! [`scheme`]). All expressions are compiled once, on first use.
use std::sync::LazyLock;

use base64::{engine::general_purpose::STANDARD, Engine};
use regex::{Captures, Regex, RegexBuilder};
use tracing::trace;
use url::Url;

use crate::{
	attribute::{Attribute, Value},
	error::GrammarError,
};

mod scheme;

/// A dotted numeric object identifier, e.g. `2.5.4.3`
const LDAP_OID: &str = r"(?:0|[1-9][0-9]*)(?:\.(?:0|[1-9][0-9]*))+";
/// A named attribute type or option
const KEY_STRING: &str = r"[A-Za-z0-9][A-Za-z0-9\-]*";
/// Any ASCII character except NUL, LF and CR
const SAFE_CHAR: &str = r"[\x01-\x09\x0B\x0C\x0E-\x7F]";
/// Any SAFE-CHAR except space, colon and less-than
const SAFE_INIT_CHAR: &str = r"[\x01-\x09\x0B\x0C\x0E-\x1F\x21-\x39\x3B\x3D-\x7F]";
/// The Base64 alphabet including padding
const BASE64_CHAR: &str = r"[A-Za-z0-9\+/=]";
/// A letter, digit or whitespace character of any script, except line breaks
const UTF8_CHAR: &str = r"[\p{L}\p{Nd}\s&&[^\r\n]]";
/// Separator spaces between the value indicator and the value
const FILL: &str = " *";

/// The compiled attribute expressions.
struct Patterns {
	/// `id[;options]: SAFE-STRING`
	plain: Regex,
	/// `id[;options]:: BASE64-STRING`
	base64: Regex,
	/// `id[;options]:< URL`
	url: Regex,
	/// `id[;options]: UTF8-STRING`
	utf8: Regex,
	/// A complete SAFE-STRING, possibly empty
	safe_string: Regex,
	/// UTF-8 text which can be written after a `: ` separator
	utf8_string: Regex,
}

impl Patterns {
	/// Compile all expressions. The expressions are fixed, so failing to
	/// compile them is a programming error.
	#[allow(clippy::expect_used)]
	fn compile() -> Self {
		let description =
			format!("(?P<type>{LDAP_OID}|{KEY_STRING})(?P<options>(?:;{KEY_STRING})*)");
		let safe_string = format!("{SAFE_INIT_CHAR}{SAFE_CHAR}*");
		let url = scheme::expression();

		let compile = |expression: String| {
			RegexBuilder::new(&expression)
				.size_limit(1 << 24)
				.build()
				.expect("attribute grammar expressions are valid")
		};

		Self {
			// A value may only start with a colon when set off by a space,
			// otherwise it would be the Base64 indicator.
			plain: compile(format!(
				"^{description}:(?:{FILL}(?P<value>{safe_string})?| +(?P<colon_value>:{SAFE_CHAR}*))$"
			)),
			base64: compile(format!("^{description}::{FILL}(?P<value>{BASE64_CHAR}*)$")),
			url: compile(format!("^{description}:<{FILL}(?P<value>{url})$")),
			utf8: compile(format!("^{description}:{FILL}(?P<value>{UTF8_CHAR}+)$")),
			safe_string: compile(format!("^(?:{safe_string})?$")),
			utf8_string: compile(format!(r"^[\p{{L}}\p{{Nd}}]{UTF8_CHAR}*$")),
		}
	}
}

/// Validates and decodes attribute buffers for the parser.
///
/// [`DefaultAttributePolicy`] applies the RFC 2849 grammar of [`parse`]. Any
/// `Fn(&str) -> Result<Attribute, GrammarError>` closure is a policy as well,
/// so a more lenient grammar can be used for LDIF written by tools which do
/// not follow the RFC closely.
pub trait AttributePolicy {
	/// Validate `buffer` and decode it into an attribute holding one value
	fn parse(&self, buffer: &str) -> Result<Attribute, GrammarError>;
}

impl<F> AttributePolicy for F
where
	F: Fn(&str) -> Result<Attribute, GrammarError>,
{
	fn parse(&self, buffer: &str) -> Result<Attribute, GrammarError> {
		self(buffer)
	}
}

/// The RFC 2849 attribute grammar, see [`parse`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAttributePolicy;

impl AttributePolicy for DefaultAttributePolicy {
	fn parse(&self, buffer: &str) -> Result<Attribute, GrammarError> {
		parse(buffer)
	}
}

/// Expressions shared by every parse
static PATTERNS: LazyLock<Patterns> = LazyLock::new(Patterns::compile);

/// Validate an attribute buffer and decode it into an [`Attribute`].
///
/// The returned attribute always holds exactly one value. A buffer matching
/// none of the forms yields [`GrammarError::Format`]; a Base64 value with an
/// invalid alphabet or padding, or a URL which is not a valid URI, yields
/// [`GrammarError::Base64`] or [`GrammarError::Url`].
pub fn parse(buffer: &str) -> Result<Attribute, GrammarError> {
	trace!("Parsing --> [{buffer}]");
	let patterns = &*PATTERNS;

	if let Some(captures) = patterns.plain.captures(buffer) {
		let value = captures
			.name("value")
			.or_else(|| captures.name("colon_value"))
			.map_or("", |value| value.as_str());
		return Ok(attribute(&captures, Value::Text(value.to_owned())));
	}

	if let Some(captures) = patterns.base64.captures(buffer) {
		let bytes = STANDARD
			.decode(value(&captures))
			.map_err(|source| GrammarError::Base64 { buffer: buffer.to_owned(), source })?;
		return Ok(attribute(&captures, Value::Binary(bytes)));
	}

	if let Some(captures) = patterns.url.captures(buffer) {
		let url = Url::parse(value(&captures))
			.map_err(|source| GrammarError::Url { buffer: buffer.to_owned(), source })?;
		return Ok(attribute(&captures, Value::Url(url)));
	}

	if let Some(captures) = patterns.utf8.captures(buffer) {
		return Ok(attribute(&captures, Value::Text(value(&captures).to_owned())));
	}

	Err(GrammarError::Format(buffer.to_owned()))
}

/// Whether `value` is an RFC 2849 SAFE-STRING and can be written verbatim
/// after a `: ` separator.
pub(crate) fn is_safe_string(value: &str) -> bool {
	PATTERNS.safe_string.is_match(value)
}

/// Whether `value` is international text which can be written verbatim after
/// a `: ` separator.
pub(crate) fn is_utf8_string(value: &str) -> bool {
	PATTERNS.utf8_string.is_match(value)
}

/// The captured value, empty if absent
fn value<'h>(captures: &Captures<'h>) -> &'h str {
	captures.name("value").map_or("", |value| value.as_str())
}

/// Build the attribute from the captured description and a decoded value
fn attribute(captures: &Captures<'_>, value: Value) -> Attribute {
	let id = captures.name("type").map_or("", |id| id.as_str());
	let options = captures
		.name("options")
		.map_or("", |options| options.as_str())
		.split(';')
		.filter(|option| !option.is_empty());
	Attribute::new(id, value).with_options(options)
}
