//! Browser abstraction used by the login, navigation and harvesting flows.
//!
//! [`Browser`] mirrors the subset of WebDriver operations the run needs. The
//! production implementation is [`crate::webdriver::WebDriverSession`]; tests
//! use [`crate::testing::MockBrowser`].

use std::path::Path;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;
use crate::tabs::{TabHandle, TabSet};

/// Browser backend selected on the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserKind {
	/// Google Chrome through chromedriver.
	Chrome,
	/// Mozilla Firefox through geckodriver.
	Firefox,
	/// Headless backend, closed automatically at the end of a run.
	#[default]
	Phantom,
}

impl BrowserKind {
	/// Resolves a backend name, falling back to [`BrowserKind::Phantom`] with a warning.
	pub fn from_selector(name: &str) -> Self {
		match name.trim().to_ascii_lowercase().as_str() {
			"chrome" => BrowserKind::Chrome,
			"firefox" => BrowserKind::Firefox,
			"phantom" => BrowserKind::Phantom,
			other => {
				warn!(target = "coursegrab", browser = %other, "unsupported browser, using phantom");
				BrowserKind::Phantom
			}
		}
	}

	/// Whether the backend runs without a visible window.
	pub fn is_headless(self) -> bool {
		matches!(self, BrowserKind::Phantom)
	}
}

impl std::fmt::Display for BrowserKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			BrowserKind::Chrome => write!(f, "chrome"),
			BrowserKind::Firefox => write!(f, "firefox"),
			BrowserKind::Phantom => write!(f, "phantom"),
		}
	}
}

/// Element locator strategy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
	Id(String),
	Name(String),
	XPath(String),
	Css(String),
}

impl std::fmt::Display for Locator {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Locator::Id(id) => write!(f, "id={id}"),
			Locator::Name(name) => write!(f, "name={name}"),
			Locator::XPath(xpath) => write!(f, "xpath={xpath}"),
			Locator::Css(css) => write!(f, "css={css}"),
		}
	}
}

/// Remote browser driven one request at a time.
///
/// Element lookups that find nothing return
/// [`Error::ElementNotFound`](crate::Error::ElementNotFound). Predicates such
/// as [`all_visible`](Browser::all_visible) return `false` instead so they can
/// be polled.
#[async_trait]
pub trait Browser: Send + Sync {
	/// Navigates the focused tab to `url`.
	async fn goto(&self, url: &str) -> Result<()>;

	/// Types `text` into the first element matching `locator`.
	async fn fill(&self, locator: &Locator, text: &str) -> Result<()>;

	/// Clicks the first element matching `locator`.
	async fn click(&self, locator: &Locator) -> Result<()>;

	/// Number of elements currently matching `locator`.
	async fn count(&self, locator: &Locator) -> Result<usize>;

	/// True when at least one element matches and every match is displayed.
	async fn all_visible(&self, locator: &Locator) -> Result<bool>;

	/// True when the first match is displayed and enabled.
	async fn is_clickable(&self, locator: &Locator) -> Result<bool>;

	/// DOM property `name` of the `index`-th match, re-queried on every call.
	///
	/// For `href` this is the resolved absolute URL.
	async fn property_at(&self, locator: &Locator, index: usize, name: &str) -> Result<Option<String>>;

	/// Handle of the focused tab.
	async fn current_tab(&self) -> Result<TabHandle>;

	/// Handles of every open tab.
	async fn tabs(&self) -> Result<TabSet>;

	/// Opens `url` in a new tab with a scripted `window.open`. Focus does not move.
	async fn open_tab(&self, url: &str) -> Result<()>;

	/// Moves focus to `tab`.
	async fn switch_to(&self, tab: &TabHandle) -> Result<()>;

	/// Closes the focused tab.
	async fn close_tab(&self) -> Result<()>;

	/// Saves a PNG screenshot of the focused tab to `path`.
	async fn screenshot(&self, path: &Path) -> Result<()>;

	/// Ends the browser session.
	async fn quit(&self) -> Result<()>;
}
