//! WebDriver-backed [`Browser`] implementation.
//!
//! Each backend is configured so that PDFs and archives are saved straight to
//! the download directory without prompting. Chrome closes a tab whose
//! navigation turned into a download, which is the signal the harvester waits
//! for.

use std::path::Path;

use async_trait::async_trait;
use serde_json::{Value, json};
use thirtyfour::common::capabilities::firefox::FirefoxPreferences;
use thirtyfour::error::{WebDriverError, WebDriverErrorInner};
use thirtyfour::prelude::*;
use thirtyfour::{ChromeCapabilities, FirefoxCapabilities};
use tracing::debug;

use crate::browser::{Browser, BrowserKind, Locator};
use crate::error::{Error, Result};
use crate::tabs::{TabHandle, TabSet};

/// Chrome profile preferences for silent downloads into `download_dir`.
pub fn chrome_prefs(download_dir: &Path) -> Value {
	json!({
		"download.default_directory": download_dir.to_string_lossy(),
		"download.prompt_for_download": false,
		"download.directory_upgrade": true,
		"download.extensions_to_open": "applications/pdf",
		"plugins.plugins_list": [{ "enabled": false, "name": "Chrome PDF Viewer" }],
		"plugins.always_open_pdf_externally": true,
		"profile.default_content_settings.popups": 0,
	})
}

/// Firefox `about:config` preferences for silent downloads into `download_dir`.
pub fn firefox_prefs(download_dir: &Path) -> Vec<(&'static str, Value)> {
	vec![
		("browser.download.folderList", json!(2)),
		("browser.download.dir", json!(download_dir.to_string_lossy())),
		("browser.download.useDownloadDir", json!(true)),
		("browser.download.manager.showWhenStarting", json!(false)),
		(
			"browser.helperApps.neverAsk.saveToDisk",
			json!("application/pdf,application/zip,application/octet-stream"),
		),
		("pdfjs.disabled", json!(true)),
	]
}

fn chrome_capabilities(download_dir: &Path, headless: bool) -> Result<ChromeCapabilities> {
	let mut caps = DesiredCapabilities::chrome();
	caps.add_experimental_option("prefs", chrome_prefs(download_dir))?;
	if headless {
		caps.set_headless()?;
	}
	Ok(caps)
}

fn firefox_capabilities(download_dir: &Path) -> Result<FirefoxCapabilities> {
	let mut prefs = FirefoxPreferences::new();
	for (key, value) in firefox_prefs(download_dir) {
		prefs.set(key, value)?;
	}
	let mut caps = DesiredCapabilities::firefox();
	caps.set_preferences(prefs)?;
	Ok(caps)
}

fn by(locator: &Locator) -> By {
	match locator {
		Locator::Id(id) => By::Id(id.as_str()),
		Locator::Name(name) => By::Name(name.as_str()),
		Locator::XPath(xpath) => By::XPath(xpath.as_str()),
		Locator::Css(css) => By::Css(css.as_str()),
	}
}

fn lookup_error(locator: &Locator, err: WebDriverError) -> Error {
	if matches!(err.as_inner(), WebDriverErrorInner::NoSuchElement(..)) {
		Error::ElementNotFound { locator: locator.to_string() }
	} else {
		Error::WebDriver(err)
	}
}

/// Where a separately started WebDriver server usually listens.
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";

/// Live WebDriver session for one backend.
pub struct WebDriverSession {
	driver: WebDriver,
}

impl WebDriverSession {
	/// Opens a session on the WebDriver server at `server_url`.
	pub async fn connect(server_url: &str, kind: BrowserKind, download_dir: &Path) -> Result<Self> {
		debug!(target = "coursegrab", server = %server_url, browser = %kind, dir = %download_dir.display(), "starting browser session");

		let driver = match kind {
			BrowserKind::Chrome => WebDriver::new(server_url, chrome_capabilities(download_dir, false)?).await,
			BrowserKind::Phantom => WebDriver::new(server_url, chrome_capabilities(download_dir, true)?).await,
			BrowserKind::Firefox => WebDriver::new(server_url, firefox_capabilities(download_dir)?).await,
		}
		.map_err(|e| Error::BrowserLaunch(format!("{kind} via {server_url}: {e}")))?;

		Ok(Self { driver })
	}

	async fn find(&self, locator: &Locator) -> Result<WebElement> {
		self.driver.find(by(locator)).await.map_err(|e| lookup_error(locator, e))
	}
}

#[async_trait]
impl Browser for WebDriverSession {
	async fn goto(&self, url: &str) -> Result<()> {
		self.driver.goto(url).await?;
		Ok(())
	}

	async fn fill(&self, locator: &Locator, text: &str) -> Result<()> {
		self.find(locator).await?.send_keys(text).await?;
		Ok(())
	}

	async fn click(&self, locator: &Locator) -> Result<()> {
		self.find(locator).await?.click().await?;
		Ok(())
	}

	async fn count(&self, locator: &Locator) -> Result<usize> {
		Ok(self.driver.find_all(by(locator)).await?.len())
	}

	async fn all_visible(&self, locator: &Locator) -> Result<bool> {
		let elements = self.driver.find_all(by(locator)).await?;
		if elements.is_empty() {
			return Ok(false);
		}
		for element in &elements {
			match element.is_displayed().await {
				Ok(true) => {}
				Ok(false) => return Ok(false),
				Err(e) if matches!(e.as_inner(), WebDriverErrorInner::StaleElementReference(..)) => return Ok(false),
				Err(e) => return Err(e.into()),
			}
		}
		Ok(true)
	}

	async fn is_clickable(&self, locator: &Locator) -> Result<bool> {
		match self.driver.find(by(locator)).await {
			Ok(element) => Ok(element.is_clickable().await?),
			Err(e) if matches!(e.as_inner(), WebDriverErrorInner::NoSuchElement(..)) => Ok(false),
			Err(e) => Err(e.into()),
		}
	}

	async fn property_at(&self, locator: &Locator, index: usize, name: &str) -> Result<Option<String>> {
		let elements = self.driver.find_all(by(locator)).await?;
		match elements.get(index) {
			Some(element) => Ok(element.prop(name).await?),
			None => Ok(None),
		}
	}

	async fn current_tab(&self) -> Result<TabHandle> {
		let handle = self.driver.window().await?;
		Ok(TabHandle::new(handle.to_string()))
	}

	async fn tabs(&self) -> Result<TabSet> {
		let handles = self.driver.windows().await?;
		Ok(handles.into_iter().map(|h| TabHandle::new(h.to_string())).collect())
	}

	async fn open_tab(&self, url: &str) -> Result<()> {
		self.driver.execute("window.open(arguments[0]);", vec![json!(url)]).await?;
		Ok(())
	}

	async fn switch_to(&self, tab: &TabHandle) -> Result<()> {
		self.driver.switch_to_window(WindowHandle::from(tab.as_str())).await?;
		Ok(())
	}

	async fn close_tab(&self) -> Result<()> {
		self.driver.close_window().await?;
		Ok(())
	}

	async fn screenshot(&self, path: &Path) -> Result<()> {
		self.driver.screenshot(path).await?;
		Ok(())
	}

	async fn quit(&self) -> Result<()> {
		self.driver.clone().quit().await?;
		Ok(())
	}
}
