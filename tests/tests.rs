#![allow(
	clippy::dbg_macro,
	clippy::expect_used,
	clippy::missing_docs_in_private_items,
	clippy::print_stderr,
	clippy::print_stdout,
	clippy::unwrap_used
)]
use std::{error::Error, fs};

use ldif_parser::{
	EntryExt, LdifParser, Outcome, ParserConfig, ReaderSource, RequiredAttributes, SearchEntry,
	SkipReason, ValueKind, ValueRef,
};

mod common;

use common::{fixture, init_tracing, open_text};

#[test]
fn test_single_record() -> Result<(), Box<dyn Error>> {
	let mut parser = open_text("dn: cn=Keith Barlow\nobjectclass: person\ncn: Keith Barlow\n\n")?;

	let record = parser.next_record()?.expect("One record should be read");
	assert_eq!(record.dn(), "cn=Keith Barlow");
	assert_eq!(record.attributes().len(), 2);
	for id in ["objectclass", "cn"] {
		let attribute = record.get(id).expect("Attribute should be present");
		assert_eq!(attribute.values().len(), 1);
		assert_eq!(attribute.value_kind(), ValueKind::Text);
	}
	assert_eq!(record.attr_first("objectclass"), Some("person"));
	assert_eq!(record.attr_first("cn"), Some("Keith Barlow"));

	assert!(parser.next_record()?.is_none());
	assert!(!parser.has_more_records()?);

	Ok(())
}

#[test]
fn test_change_records_are_skipped() -> Result<(), Box<dyn Error>> {
	let mut parser = open_text(
		"dn: cn=Keith Barlow\nchangetype: modify\nreplace: cn\ncn: Keith\n-\n\ndn: cn=Next\ncn: Next\n\n",
	)?;
	assert_eq!(parser.next_record()?.unwrap().dn(), "cn=Next");
	assert!(parser.next_record()?.is_none());

	let mut parser = open_text("dn: cn=Keith Barlow\nchangetype: delete\n\n")?;
	assert!(parser.next_record()?.is_none(), "A lone change record yields no record");

	Ok(())
}

#[test]
fn test_folded_value() -> Result<(), Box<dyn Error>> {
	let mut parser = open_text("dn: cn=Keith Barlow\ncn: Keith\n Barlow\n\n")?;
	let record = parser.next_record()?.unwrap();
	assert_eq!(record.attr_first("cn"), Some("KeithBarlow"));

	let mut parser = open_text("dn: cn=Keith Barlow\ncn: Keith \n Barlow\n\n")?;
	let record = parser.next_record()?.unwrap();
	assert_eq!(record.attr_first("cn"), Some("Keith Barlow"));

	let mut parser = open_text("dn: cn=a\ncn: Keith\n  Barlow\n\n")?;
	let record = parser.next_record()?.unwrap();
	assert_eq!(
		record.attr_first("cn"),
		Some("Keith Barlow"),
		"Only the first space is a fold marker"
	);

	Ok(())
}

#[test]
fn test_text_without_records() -> Result<(), Box<dyn Error>> {
	init_tracing();
	let mut parser = LdifParser::from_path(fixture("notes.txt"));
	parser.open()?;
	assert!(parser.next_record()?.is_none());

	Ok(())
}

#[test]
fn test_conformance_failure() -> Result<(), Box<dyn Error>> {
	init_tracing();
	let mut parser = LdifParser::new(ReaderSource::from_text(
		"dn: cn=Keith Barlow\ncn: Keith Barlow\n\ndn: cn=Fiona\nobjectclass: person\ncn: Fiona\n\n",
	))
	.with_specification(RequiredAttributes::new(["objectClass"]));
	parser.open()?;

	let err = parser.next_record().expect_err("Record without objectclass should be rejected");
	assert!(matches!(&err, ldif_parser::Error::Conformance { dn } if dn == "cn=Keith Barlow"));
	assert!(err.to_string().contains("cn=Keith Barlow"));

	assert_eq!(parser.next_record()?.unwrap().dn(), "cn=Fiona", "Parser should stay usable");
	assert!(parser.next_record()?.is_none());

	Ok(())
}

#[test]
fn test_read_file() -> Result<(), Box<dyn Error>> {
	init_tracing();
	let mut parser = LdifParser::from_path(fixture("people.ldif"));
	parser.open()?;

	let babs = parser.next_record()?.unwrap();
	assert_eq!(babs.dn(), "cn=Barbara Jensen, ou=Product Development, dc=airius, dc=com");
	assert_eq!(babs.get("objectClass").unwrap().values().len(), 3);
	assert_eq!(babs.get("cn").unwrap().values().len(), 3);
	assert_eq!(
		babs.attr_first("description"),
		Some("Babs is a big sailing fan, and travels extensively in search of perfect sailing conditions.")
	);

	let fiona = parser.next_record()?.unwrap();
	let photo = fiona.get("jpegphoto").unwrap();
	assert_eq!(photo.value_kind(), ValueKind::Url);
	let Some(ValueRef::Url(url)) = photo.first() else {
		panic!("Photo should be a URL");
	};
	assert_eq!(url.scheme(), "file");
	assert_eq!(url.path(), "/usr/local/directory/photos/fiona.jpg");

	let office = parser.next_record()?.unwrap();
	assert_eq!(office.dn(), "ou=営業部,o=Airius");
	let ou = office.get("ou").unwrap();
	assert_eq!(ou.value_kind(), ValueKind::Binary);
	assert_eq!(ou.values().len(), 3, "Repeated values are dropped");
	assert!(ou.has_option("lang-ja"));
	assert!(ou.has_option("LANG-EN"));
	assert_eq!(office.bin_attr_first("ou"), Some("営業部".as_bytes()));
	assert_eq!(office.attr_first("description"), Some("Japanese office"));

	let rogasawara = parser.next_record()?.unwrap();
	assert_eq!(rogasawara.dn(), "uid=rogasawara, ou=Sales, o=Airius");
	assert_eq!(rogasawara.bin_attr_first("givenname"), Some("ロドニー".as_bytes()));
	assert_eq!(rogasawara.get("title").unwrap().options(), ["lang-en"]);
	assert_eq!(rogasawara.attr_first("title"), Some("Sales, Director"));

	assert!(parser.next_record()?.is_none());

	parser.reset()?;
	assert_eq!(parser.next_record()?.unwrap(), babs, "Reset should start over");
	parser.close()?;
	assert!(!parser.is_open());

	Ok(())
}

#[test]
fn test_outcomes() -> Result<(), Box<dyn Error>> {
	init_tracing();
	let mut parser = LdifParser::from_path(fixture("changes.ldif"));
	parser.open()?;

	let Some(Outcome::Record(alice)) = parser.next_outcome()? else {
		panic!("First record should be read");
	};
	assert_eq!(alice.dn(), "cn=Alice, dc=example, dc=com");

	let Some(Outcome::Skipped(modify)) = parser.next_outcome()? else {
		panic!("Change record should be skipped");
	};
	assert!(matches!(modify.reason, SkipReason::ChangeRecord));
	assert_eq!(modify.dn.as_deref(), Some("cn=Fiona Jensen, ou=Marketing, dc=airius, dc=com"));

	let Some(Outcome::Skipped(broken)) = parser.next_outcome()? else {
		panic!("Malformed record should be skipped");
	};
	assert!(matches!(broken.reason, SkipReason::Grammar(_)));
	assert_eq!(broken.dn.as_deref(), Some("cn=Broken, dc=example, dc=com"));

	let Some(Outcome::Skipped(delete)) = parser.next_outcome()? else {
		panic!("Controlled change record should be skipped");
	};
	assert!(matches!(delete.reason, SkipReason::ChangeRecord));
	assert_eq!(delete.dn.as_deref(), Some("ou=Product Development, dc=airius, dc=com"));

	let Some(Outcome::Record(bob)) = parser.next_outcome()? else {
		panic!("Last record should be read");
	};
	assert_eq!(bob.attr_first("sn"), Some("Builder"));

	assert!(parser.next_outcome()?.is_none());

	Ok(())
}

#[test]
fn test_iterator() -> Result<(), Box<dyn Error>> {
	init_tracing();
	let mut parser = LdifParser::from_path(fixture("changes.ldif"));
	parser.open()?;

	let dns = parser
		.map(|record| record.map(|record| record.dn().to_owned()))
		.collect::<Result<Vec<_>, _>>()?;
	assert_eq!(dns, ["cn=Alice, dc=example, dc=com", "cn=Bob, dc=example, dc=com"]);

	Ok(())
}

#[test]
fn test_case_sensitive_ids() -> Result<(), Box<dyn Error>> {
	init_tracing();
	let config: ParserConfig = serde_json::from_str(r#"{"case_insensitive": false}"#)?;
	let mut parser = LdifParser::with_config(
		ReaderSource::from_text("dn: cn=a\nobjectClass: top\nobjectclass: person\n\n"),
		config,
	);
	parser.open()?;

	let record = parser.next_record()?.unwrap();
	assert!(!record.attributes().is_case_insensitive());
	assert_eq!(record.attributes().len(), 2);
	assert_eq!(record.attr_first("objectClass"), Some("top"));
	assert_eq!(record.attr_first("objectclass"), Some("person"));
	assert!(record.get("OBJECTCLASS").is_none());

	Ok(())
}

#[test]
fn test_rendered_record_parses() -> Result<(), Box<dyn Error>> {
	let text = fs::read_to_string(fixture("people.ldif"))?;
	let mut parser = open_text(&text)?;
	let babs = parser.next_record()?.unwrap();

	let rendered = babs.to_string();
	assert!(
		rendered.starts_with("dn: cn=Barbara Jensen, ou=Product Development, dc=airius, dc=com\n")
	);
	let mut parser = open_text(&rendered)?;
	assert_eq!(parser.next_record()?.unwrap(), babs);

	Ok(())
}

#[test]
fn test_search_entry_conversion() -> Result<(), Box<dyn Error>> {
	init_tracing();
	let mut parser = LdifParser::from_path(fixture("people.ldif"));
	parser.open()?;
	let _ = parser.next_record()?;
	let _ = parser.next_record()?;
	let office = parser.next_record()?.unwrap();

	let entry = SearchEntry::from(office);
	assert_eq!(entry.dn, "ou=営業部,o=Airius");
	assert_eq!(entry.attrs["description"], ["Japanese office"]);
	assert_eq!(entry.bin_attrs["ou;lang-ja;phonetic;lang-en"].len(), 3);
	assert_eq!(entry.attr_first("description"), Some("Japanese office"));

	Ok(())
}
