//! End-of-run report.

use std::fmt::Write as _;

use serde::Serialize;

use crate::browser::BrowserKind;
use crate::harvest::HarvestReport;
use crate::postprocess::{OrganizeReport, UnpackReport};

/// Everything one run did, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
	pub course: String,
	pub browser: BrowserKind,
	pub harvest: HarvestReport,
	pub unpacked: UnpackReport,
	pub organized: OrganizeReport,
}

impl RunSummary {
	/// Human-readable multi-line rendering.
	pub fn to_text(&self) -> String {
		let h = &self.harvest;
		let mut out = String::new();
		let _ = writeln!(out, "course:    {} ({})", self.course, self.browser);
		let _ = writeln!(
			out,
			"links:     {} found, {} downloaded, {} folders, {} skipped, {} ignored",
			h.links, h.downloaded, h.folders_archived, h.skipped, h.ignored
		);
		let _ = writeln!(out, "archives:  {} unpacked ({} files)", self.unpacked.archives.len(), self.unpacked.files());
		let moved: Vec<String> = self.organized.moved.iter().map(|(ext, n)| format!("{ext}: {n}")).collect();
		let _ = write!(out, "organized: {}", if moved.is_empty() { "nothing".to_string() } else { moved.join(", ") });
		if self.organized.left_in_place > 0 {
			let _ = write!(out, " ({} without extension left in place)", self.organized.left_in_place);
		}
		out
	}
}
