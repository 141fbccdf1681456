//! Error types for course harvesting.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for harvesting operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while driving the portal or post-processing downloads.
#[derive(Debug, Error)]
pub enum Error {
	/// A required page element could not be located.
	#[error("element not found: {locator}")]
	ElementNotFound { locator: String },

	/// A bounded wait expired.
	#[error("timeout after {ms}ms waiting for: {condition}")]
	Timeout { ms: u64, condition: String },

	/// A data-file field was absent or had no value.
	#[error("missing field `{0}` in data file")]
	MissingField(String),

	/// The data file could not be read.
	#[error("failed to read data file {path}")]
	DataFile {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// The browser tab set did not have the expected shape.
	#[error("expected exactly one new tab, found {found}")]
	UnexpectedTabs { found: usize },

	/// A tab handle was rejected by the browser.
	#[error("invalid tab handle: {0}")]
	InvalidTab(String),

	/// Organizing would overwrite or replace an existing entry.
	#[error("destination already exists: {}", path.display())]
	DestinationConflict { path: PathBuf },

	/// Archive could not be read or contained an unsafe entry.
	#[error("archive {}: {message}", path.display())]
	Archive { path: PathBuf, message: String },

	/// Launching or connecting to the browser failed.
	#[error("browser launch failed: {0}")]
	BrowserLaunch(String),

	#[error(transparent)]
	WebDriver(#[from] thirtyfour::error::WebDriverError),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

impl Error {
	/// Returns true when this error is an expired bounded wait.
	pub fn is_timeout(&self) -> bool {
		matches!(self, Error::Timeout { .. })
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn timeout_message_includes_bound_and_condition() {
		let err = Error::Timeout {
			ms: 1000,
			condition: "tab count to be 1".into(),
		};
		assert!(err.is_timeout());
		assert_eq!(err.to_string(), "timeout after 1000ms waiting for: tab count to be 1");
	}

	#[test]
	fn element_not_found_is_not_timeout() {
		let err = Error::ElementNotFound { locator: "id=loginbtn".into() };
		assert!(!err.is_timeout());
		assert!(err.to_string().contains("id=loginbtn"));
	}
}
