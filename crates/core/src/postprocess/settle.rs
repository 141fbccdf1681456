use std::fs;
use std::path::Path;
use std::time::Duration;

use tracing::info;

use crate::error::{Error, Result};
use crate::wait;

/// Suffixes browsers give to files still being written.
const PARTIAL_SUFFIXES: &[&str] = &[".crdownload", ".part", ".download"];

/// Names of in-progress downloads directly under `dir`.
pub fn partial_downloads(dir: &Path) -> Result<Vec<String>> {
	let mut partial = Vec::new();
	for entry in fs::read_dir(dir)? {
		let name = entry?.file_name().to_string_lossy().into_owned();
		if PARTIAL_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
			partial.push(name);
		}
	}
	partial.sort();
	Ok(partial)
}

/// Waits until the browser has no partially written files in `dir`.
pub async fn wait_for_downloads(dir: &Path, timeout: Duration, interval: Duration) -> Result<()> {
	let pending = partial_downloads(dir)?;
	if pending.is_empty() {
		return Ok(());
	}

	info!(target = "coursegrab", pending = pending.len(), "waiting for downloads to finish");
	wait::poll_until(timeout, interval, "downloads to finish", || async {
		Ok::<_, Error>(partial_downloads(dir)?.is_empty())
	})
	.await
}
