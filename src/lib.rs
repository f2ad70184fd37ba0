//! Read directory entries from LDIF files.
//!
//! The library turns text in the LDAP Data Interchange Format ([RFC 2849])
//! into typed [`Record`]s: a distinguished name plus attributes whose values
//! are text, binary data or URLs. Folded lines are joined, Base64 values are
//! decoded, and every attribute is validated against the RFC 2849 grammar
//! before it is added to its record.
//!
//! Parsing is pull based. An [`LdifParser`] reads one line at a time from a
//! [`LineSource`] and assembles one record per call to
//! [`next_record`](LdifParser::next_record).
//!
//! [RFC 2849]: https://www.rfc-editor.org/rfc/rfc2849.html
//!
//! # Getting started
//! A minimal example of reading records might look like so:
//! ```
//! # fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use ldif_parser::{EntryExt, LdifParser, ReaderSource, RequiredAttributes};
//!
//! let ldif = "\
//! version: 1
//! dn: cn=Barbara Jensen,ou=Product Development,dc=airius,dc=com
//! objectclass: person
//! cn: Barbara Jensen
//! description: A big sailing fan,
//!  and a keen reader.
//!
//! ";
//!
//! // Files can be read with `LdifParser::from_path`. Records lacking an
//! // objectclass are rejected here.
//! let mut parser = LdifParser::new(ReaderSource::from_text(ldif))
//! 	.with_specification(RequiredAttributes::new(["objectclass"]));
//! parser.open()?;
//! while let Some(record) = parser.next_record()? {
//! 	assert_eq!(record.attr_first("cn"), Some("Barbara Jensen"));
//! 	assert_eq!(record.attr_first("description"), Some("A big sailing fan,and a keen reader."));
//! 	println!("{record}");
//! }
//! parser.close()?;
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```
//!
//! # Limitations
//! * LDIF change records (`changetype:` and `control:`) are recognized and
//!   skipped, never applied.
//! * URL values are validated and kept as [`url::Url`]s. The resources they
//!   point to are not fetched.
//! * Records are not checked against a directory schema. A
//!   [`RecordSpecification`] can be supplied to reject records.

pub mod attribute;
pub mod config;
pub mod entry;
pub mod error;
pub mod grammar;
pub mod line;
pub mod parser;
pub mod record;
pub mod schema;
pub mod source;

pub use ldap3::{self, SearchEntry};
pub use url::{self, Url};

pub use crate::{
	attribute::{Attribute, Value, ValueKind, ValueRef, Values},
	config::ParserConfig,
	entry::EntryExt,
	error::{Error, GrammarError},
	grammar::{AttributePolicy, DefaultAttributePolicy},
	line::{LineKind, SeparatorPolicy},
	parser::{LdifParser, Outcome, SkipReason, Skipped},
	record::{Attributes, Record},
	schema::{DefaultSchemaSpecification, RecordSpecification, RequiredAttributes},
	source::{FileSource, LineSource, ReaderSource},
};
