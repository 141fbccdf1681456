//! Data-file loading and run configuration.
//!
//! The data file is a whitespace-delimited text file with one record per line.
//! The first token names the field, the remaining tokens are its value:
//!
//! ```text
//! username alice
//! password secret
//! course CS101-01
//! term 2024F
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::browser::Locator;
use crate::error::{Error, Result};

/// Field key holding the portal username.
pub const USERNAME_KEY: &str = "username";
/// Field key holding the portal password.
pub const PASSWORD_KEY: &str = "password";
/// Field key holding the course section, e.g. `CS101-01`.
pub const COURSE_KEY: &str = "course";
/// Field key holding the term, e.g. `2024F`.
pub const TERM_KEY: &str = "term";

/// Parsed data file: field name to value tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataFile {
	fields: HashMap<String, Vec<String>>,
}

impl DataFile {
	/// Reads and parses the data file at `path`.
	pub fn load(path: &Path) -> Result<Self> {
		let text = std::fs::read_to_string(path).map_err(|source| Error::DataFile {
			path: path.to_path_buf(),
			source,
		})?;
		Ok(Self::parse(&text))
	}

	/// Parses data-file text. Later records for the same field replace earlier ones.
	pub fn parse(text: &str) -> Self {
		let mut fields = HashMap::new();
		for line in text.lines() {
			let mut tokens = line.split_whitespace();
			let Some(key) = tokens.next() else {
				continue;
			};
			fields.insert(key.to_string(), tokens.map(str::to_string).collect());
		}
		Self { fields }
	}

	/// Returns all value tokens for `key`.
	pub fn get(&self, key: &str) -> Option<&[String]> {
		self.fields.get(key).map(Vec::as_slice)
	}

	/// Returns the first value token for `key`, failing when absent or empty.
	pub fn first(&self, key: &str) -> Result<&str> {
		self.get(key)
			.and_then(|values| values.first())
			.map(String::as_str)
			.ok_or_else(|| Error::MissingField(key.to_string()))
	}

	/// Username and password for the login form.
	pub fn credentials(&self) -> Result<Credentials> {
		Ok(Credentials {
			username: self.first(USERNAME_KEY)?.to_string(),
			password: self.first(PASSWORD_KEY)?.to_string(),
		})
	}

	/// Course link text as shown on the dashboard: `"<term> <course>"`.
	pub fn course_identifier(&self) -> Result<String> {
		Ok(format!("{} {}", self.first(TERM_KEY)?, self.first(COURSE_KEY)?))
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}
}

/// Portal login credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	pub username: String,
	pub password: String,
}

impl std::fmt::Debug for Credentials {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Credentials")
			.field("username", &self.username)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Bounded waits used across the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
	/// Visibility and clickability waits on page elements.
	pub element: Duration,
	/// Wait for a scripted `window.open` to produce the second tab.
	pub tab_open: Duration,
	/// Wait for the browser to close a tab after a direct download starts.
	pub download_close: Duration,
	/// Wait for partially written downloads to finish before unpacking.
	pub downloads_settle: Duration,
	/// Sleep between polls of any bounded wait.
	pub poll_interval: Duration,
}

impl Default for Timeouts {
	fn default() -> Self {
		Self {
			element: Duration::from_secs(10),
			tab_open: Duration::from_secs(10),
			download_close: Duration::from_secs(1),
			downloads_settle: Duration::from_secs(60),
			poll_interval: Duration::from_millis(100),
		}
	}
}

/// Login form element names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginForm {
	pub username_field: String,
	pub password_field: String,
	pub submit_button_id: String,
}

impl Default for LoginForm {
	fn default() -> Self {
		Self {
			username_field: "username".to_string(),
			password_field: "password".to_string(),
			submit_button_id: "loginbtn".to_string(),
		}
	}
}

/// Locators for the course page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoursePage {
	/// Every anchor inside the topic list.
	pub topic_links: Locator,
	/// Primary action button of a folder page ("Download folder").
	pub folder_button: Locator,
}

impl Default for CoursePage {
	fn default() -> Self {
		Self {
			topic_links: Locator::XPath("//ul[@class='topics']//child::a".to_string()),
			folder_button: Locator::XPath("//section[@id='region-main']//child::button[1]".to_string()),
		}
	}
}

/// Everything a run needs besides credentials and the browser itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
	pub login_url: String,
	/// Directory the browser saves into and post-processing works on.
	pub download_dir: PathBuf,
	/// Archive extension, without the leading period.
	pub archive_extension: String,
	pub login_form: LoginForm,
	pub course_page: CoursePage,
	pub timeouts: Timeouts,
}

impl Default for RunConfig {
	fn default() -> Self {
		Self {
			login_url: "https://moodle.rose-hulman.edu/login/index.php".to_string(),
			download_dir: PathBuf::from("downloads"),
			archive_extension: "zip".to_string(),
			login_form: LoginForm::default(),
			course_page: CoursePage::default(),
			timeouts: Timeouts::default(),
		}
	}
}
