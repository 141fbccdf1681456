//! Tab handle bookkeeping.
//!
//! Every classified link must produce exactly one new tab. [`TabSet::difference`]
//! and [`TabSet::single_new_tab`] make that check explicit.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::{Error, Result};

/// Opaque browser tab (window) handle.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct TabHandle(String);

impl TabHandle {
	pub fn new(handle: impl Into<String>) -> Self {
		Self(handle.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl std::fmt::Display for TabHandle {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for TabHandle {
	fn from(handle: &str) -> Self {
		Self::new(handle)
	}
}

/// Set of open tab handles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabSet(BTreeSet<TabHandle>);

impl TabSet {
	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Handles present in `self` but absent from `before`.
	pub fn difference(&self, before: &TabSet) -> TabSet {
		self.0.difference(&before.0).cloned().collect()
	}

	/// The one handle opened since `before`; zero or several is an error.
	pub fn single_new_tab(&self, before: &TabSet) -> Result<TabHandle> {
		let opened = self.difference(before);
		if opened.len() != 1 {
			return Err(Error::UnexpectedTabs { found: opened.len() });
		}
		opened.0.into_iter().next().ok_or(Error::UnexpectedTabs { found: 0 })
	}
}

impl FromIterator<TabHandle> for TabSet {
	fn from_iter<I: IntoIterator<Item = TabHandle>>(iter: I) -> Self {
		Self(iter.into_iter().collect())
	}
}

impl From<TabHandle> for TabSet {
	fn from(tab: TabHandle) -> Self {
		std::iter::once(tab).collect()
	}
}
