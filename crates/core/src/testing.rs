//! Testing infrastructure for browser flows.
//!
//! [`MockBrowser`] implements [`Browser`] in memory. Elements are registered
//! per [`Locator`], tabs are simulated with generated handles, and every
//! interaction is recorded as a [`MockAction`] for later assertion.
//!
//! # Example
//!
//! ```ignore
//! use coursegrab::testing::{MockBrowser, MockAction};
//!
//! let browser = MockBrowser::new();
//! browser.add_links(&topics, &["https://portal.test/mod/resource/view.php?id=1"]);
//! browser.auto_close("https://portal.test/mod/resource/view.php?id=1");
//!
//! // After running the harvester...
//! assert_eq!(browser.count_actions(|a| matches!(a, MockAction::CloseTab { .. })), 0);
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::browser::{Browser, Locator};
use crate::error::{Error, Result};
use crate::tabs::{TabHandle, TabSet};

/// Handle of the tab a [`MockBrowser`] starts with.
pub const MAIN_TAB: &str = "main";

/// Action recorded by [`MockBrowser`] for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockAction {
	Goto { url: String },
	Fill { locator: String, text: String },
	Click { locator: String },
	OpenTab { url: String },
	SwitchTo { tab: String },
	/// The test closed a tab explicitly.
	CloseTab { tab: String },
	Screenshot { path: PathBuf },
	Quit,
}

/// Simulated element.
#[derive(Debug, Clone)]
pub struct MockElement {
	pub href: Option<String>,
	pub visible: bool,
	pub enabled: bool,
}

impl Default for MockElement {
	fn default() -> Self {
		Self {
			href: None,
			visible: true,
			enabled: true,
		}
	}
}

#[derive(Default)]
struct State {
	elements: HashMap<Locator, Vec<MockElement>>,
	/// Open tabs in opening order, with the URL each was opened on.
	tabs: Vec<(TabHandle, String)>,
	current: Option<TabHandle>,
	next_tab: usize,
	auto_close: HashSet<String>,
	popups_blocked: bool,
	actions: Vec<MockAction>,
}

/// In-memory browser for exercising login, navigation and harvesting.
pub struct MockBrowser {
	state: Mutex<State>,
}

impl Default for MockBrowser {
	fn default() -> Self {
		Self::new()
	}
}

impl MockBrowser {
	/// Creates a browser with a single focused tab, [`MAIN_TAB`].
	pub fn new() -> Self {
		let main = TabHandle::new(MAIN_TAB);
		let state = State {
			tabs: vec![(main.clone(), "about:blank".to_string())],
			current: Some(main),
			..Default::default()
		};
		Self { state: Mutex::new(state) }
	}

	/// Registers one visible, enabled element for `locator`.
	pub fn add_element(&self, locator: Locator) {
		self.push_element(locator, MockElement::default());
	}

	/// Registers an element with explicit state.
	pub fn push_element(&self, locator: Locator, element: MockElement) {
		self.state.lock().unwrap().elements.entry(locator).or_default().push(element);
	}

	/// Registers one anchor per href under `locator`, in page order.
	pub fn add_links(&self, locator: &Locator, hrefs: &[&str]) {
		for href in hrefs {
			self.push_element(
				locator.clone(),
				MockElement {
					href: Some((*href).to_string()),
					..Default::default()
				},
			);
		}
	}

	/// Makes tabs opened on `url` close themselves when focused, like a started download.
	pub fn auto_close(&self, url: &str) {
		self.state.lock().unwrap().auto_close.insert(url.to_string());
	}

	/// Makes `window.open` a no-op, as with a popup blocker.
	pub fn block_popups(&self) {
		self.state.lock().unwrap().popups_blocked = true;
	}

	/// Number of open tabs.
	pub fn tab_count(&self) -> usize {
		self.state.lock().unwrap().tabs.len()
	}

	/// Handle of the focused tab, if it is still open.
	pub fn focused(&self) -> Option<TabHandle> {
		let state = self.state.lock().unwrap();
		state.current.clone().filter(|tab| state.tabs.iter().any(|(open, _)| open == tab))
	}

	/// Returns all recorded actions.
	pub fn actions(&self) -> Vec<MockAction> {
		self.state.lock().unwrap().actions.clone()
	}

	/// Counts recorded actions matching `predicate`.
	pub fn count_actions(&self, predicate: impl Fn(&MockAction) -> bool) -> usize {
		self.state.lock().unwrap().actions.iter().filter(|a| predicate(a)).count()
	}

	fn record(&self, action: MockAction) {
		self.state.lock().unwrap().actions.push(action);
	}

	fn first_element(&self, locator: &Locator) -> Result<MockElement> {
		self.state
			.lock()
			.unwrap()
			.elements
			.get(locator)
			.and_then(|elements| elements.first().cloned())
			.ok_or_else(|| Error::ElementNotFound { locator: locator.to_string() })
	}
}

#[async_trait]
impl Browser for MockBrowser {
	async fn goto(&self, url: &str) -> Result<()> {
		self.record(MockAction::Goto { url: url.to_string() });
		Ok(())
	}

	async fn fill(&self, locator: &Locator, text: &str) -> Result<()> {
		self.first_element(locator)?;
		self.record(MockAction::Fill {
			locator: locator.to_string(),
			text: text.to_string(),
		});
		Ok(())
	}

	async fn click(&self, locator: &Locator) -> Result<()> {
		self.first_element(locator)?;
		self.record(MockAction::Click { locator: locator.to_string() });
		Ok(())
	}

	async fn count(&self, locator: &Locator) -> Result<usize> {
		Ok(self.state.lock().unwrap().elements.get(locator).map_or(0, Vec::len))
	}

	async fn all_visible(&self, locator: &Locator) -> Result<bool> {
		let state = self.state.lock().unwrap();
		Ok(state.elements.get(locator).is_some_and(|elements| !elements.is_empty() && elements.iter().all(|e| e.visible)))
	}

	async fn is_clickable(&self, locator: &Locator) -> Result<bool> {
		Ok(self.first_element(locator).map(|e| e.visible && e.enabled).unwrap_or(false))
	}

	async fn property_at(&self, locator: &Locator, index: usize, name: &str) -> Result<Option<String>> {
		let state = self.state.lock().unwrap();
		let element = state.elements.get(locator).and_then(|elements| elements.get(index));
		Ok(match (name, element) {
			("href", Some(element)) => element.href.clone(),
			_ => None,
		})
	}

	async fn current_tab(&self) -> Result<TabHandle> {
		self.focused().ok_or_else(|| Error::InvalidTab("focused tab was closed".into()))
	}

	async fn tabs(&self) -> Result<TabSet> {
		Ok(self.state.lock().unwrap().tabs.iter().map(|(tab, _)| tab.clone()).collect())
	}

	async fn open_tab(&self, url: &str) -> Result<()> {
		let mut state = self.state.lock().unwrap();
		state.actions.push(MockAction::OpenTab { url: url.to_string() });
		if state.popups_blocked {
			return Ok(());
		}
		state.next_tab += 1;
		let tab = TabHandle::new(format!("tab-{}", state.next_tab));
		state.tabs.push((tab, url.to_string()));
		Ok(())
	}

	async fn switch_to(&self, tab: &TabHandle) -> Result<()> {
		let mut state = self.state.lock().unwrap();
		let Some(position) = state.tabs.iter().position(|(open, _)| open == tab) else {
			return Err(Error::InvalidTab(tab.to_string()));
		};
		state.actions.push(MockAction::SwitchTo { tab: tab.to_string() });
		state.current = Some(tab.clone());

		if state.auto_close.contains(&state.tabs[position].1) {
			state.tabs.remove(position);
		}
		Ok(())
	}

	async fn close_tab(&self) -> Result<()> {
		let mut state = self.state.lock().unwrap();
		let Some(current) = state.current.clone() else {
			return Err(Error::InvalidTab("no focused tab".into()));
		};
		let Some(position) = state.tabs.iter().position(|(open, _)| *open == current) else {
			return Err(Error::InvalidTab(current.to_string()));
		};
		state.tabs.remove(position);
		state.actions.push(MockAction::CloseTab { tab: current.to_string() });
		Ok(())
	}

	async fn screenshot(&self, path: &Path) -> Result<()> {
		self.record(MockAction::Screenshot { path: path.to_path_buf() });
		Ok(())
	}

	async fn quit(&self) -> Result<()> {
		let mut state = self.state.lock().unwrap();
		state.tabs.clear();
		state.current = None;
		state.actions.push(MockAction::Quit);
		Ok(())
	}
}
