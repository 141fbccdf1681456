//! Course page resource harvesting.
//!
//! Moodle activity links look like `https://host/mod/<kind>/view.php?id=<n>`.
//! Resource links download a single file, folder links show a listing with a
//! "Download folder" button, everything else is ignored.
//!
//! Each classified link is opened in a second tab. With the download
//! preferences set by [`crate::webdriver`], a direct download makes the
//! browser close that tab on its own. A tab that is still open after
//! [`Timeouts::download_close`] is a page instead: folders get their button
//! clicked, anything else is skipped. The tab is closed exactly once either
//! way and focus always returns to the course page before the next link.

use serde::Serialize;
use tracing::{debug, info};
use url::Url;

use crate::browser::Browser;
use crate::config::{CoursePage, Timeouts};
use crate::error::Result;
use crate::tabs::TabSet;
use crate::wait;

/// Classification of a course page link by its URL shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
	/// A single downloadable file.
	Resource,
	/// A listing that must be zipped through its action button.
	Folder,
	/// Forums, external URLs, pages and anything unparsable.
	Other,
}

impl LinkKind {
	/// Classifies `href` by its second path segment (`/mod/<kind>/...`).
	pub fn classify(href: &str) -> Self {
		let Ok(url) = Url::parse(href) else {
			return LinkKind::Other;
		};
		let kind = url.path_segments().and_then(|mut segments| segments.nth(1));
		match kind {
			Some("resource") => LinkKind::Resource,
			Some("folder") => LinkKind::Folder,
			_ => LinkKind::Other,
		}
	}

	/// Whether the harvester opens links of this kind.
	pub fn is_fetched(self) -> bool {
		!matches!(self, LinkKind::Other)
	}
}

/// What happened to one fetched link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LinkOutcome {
	/// The browser closed the tab after starting a download.
	Downloaded,
	/// The folder's download button was clicked.
	FolderArchived,
	/// The tab stayed open and was not a folder.
	Skipped,
}

/// Per-run harvesting counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HarvestReport {
	/// Anchors found in the topic list.
	pub links: usize,
	pub downloaded: usize,
	pub folders_archived: usize,
	pub skipped: usize,
	/// Links that were not resources or folders.
	pub ignored: usize,
}

impl HarvestReport {
	fn record(&mut self, outcome: LinkOutcome) {
		match outcome {
			LinkOutcome::Downloaded => self.downloaded += 1,
			LinkOutcome::FolderArchived => self.folders_archived += 1,
			LinkOutcome::Skipped => self.skipped += 1,
		}
	}
}

/// Triggers downloads for every resource and folder link on the current course page.
///
/// Links are processed one at a time in page order.
pub async fn harvest<B: Browser + ?Sized>(browser: &B, page: &CoursePage, timeouts: &Timeouts) -> Result<HarvestReport> {
	let mut report = HarvestReport {
		links: browser.count(&page.topic_links).await?,
		..Default::default()
	};
	info!(target = "coursegrab", links = report.links, "scanning course page");

	for index in 0..report.links {
		// The page re-renders asynchronously; wait for it before each lookup.
		wait::all_visible(browser, &page.topic_links, timeouts.element, timeouts.poll_interval).await?;

		let Some(href) = browser.property_at(&page.topic_links, index, "href").await? else {
			debug!(target = "coursegrab", index, "link without href");
			report.ignored += 1;
			continue;
		};

		let kind = LinkKind::classify(&href);
		if !kind.is_fetched() {
			debug!(target = "coursegrab", href = %href, "ignoring link");
			report.ignored += 1;
			continue;
		}

		let outcome = fetch_link(browser, &href, kind, page, timeouts).await?;
		debug!(target = "coursegrab", href = %href, ?kind, ?outcome, "link done");
		report.record(outcome);
	}

	info!(
		target = "coursegrab",
		downloaded = report.downloaded,
		folders = report.folders_archived,
		skipped = report.skipped,
		ignored = report.ignored,
		"harvest finished"
	);
	Ok(report)
}

/// Opens one classified link in a transient tab and resolves it.
pub async fn fetch_link<B: Browser + ?Sized>(browser: &B, href: &str, kind: LinkKind, page: &CoursePage, timeouts: &Timeouts) -> Result<LinkOutcome> {
	let before = browser.current_tab().await?;

	browser.open_tab(href).await?;
	wait::tab_count(browser, 2, timeouts.tab_open, timeouts.poll_interval).await?;
	let opened = browser.tabs().await?.single_new_tab(&TabSet::from(before.clone()))?;
	browser.switch_to(&opened).await?;

	match wait::tab_count(browser, 1, timeouts.download_close, timeouts.poll_interval).await {
		Ok(()) => {
			browser.switch_to(&before).await?;
			return Ok(LinkOutcome::Downloaded);
		}
		Err(e) if e.is_timeout() => {}
		Err(e) => return Err(e),
	}

	let outcome = if kind == LinkKind::Folder {
		wait::clickable(browser, &page.folder_button, timeouts.element, timeouts.poll_interval).await?;
		browser.click(&page.folder_button).await?;
		LinkOutcome::FolderArchived
	} else {
		info!(target = "coursegrab", href = %href, "not a direct download, skipping");
		LinkOutcome::Skipped
	};

	browser.close_tab().await?;
	browser.switch_to(&before).await?;
	Ok(outcome)
}
