use std::{error::Error, io::Cursor, path::PathBuf};

use ldif_parser::{LdifParser, ReaderSource};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

/// Install a subscriber printing parser diagnostics, once per test binary.
pub fn init_tracing() {
	let tracing_filter = EnvFilter::default().add_directive(LevelFilter::DEBUG.into());
	let _ = tracing_subscriber::fmt().with_env_filter(tracing_filter).with_test_writer().try_init();
}

/// Location of a file under `tests/data`
pub fn fixture(name: &str) -> PathBuf {
	PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join("data").join(name)
}

/// An opened parser over in-memory LDIF text
pub fn open_text(text: &str) -> Result<LdifParser<ReaderSource<Cursor<String>>>, Box<dyn Error>> {
	init_tracing();
	let mut parser = LdifParser::new(ReaderSource::from_text(text));
	parser.open()?;
	Ok(parser)
}
