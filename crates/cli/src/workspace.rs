//! Run directory layout.
//!
//! Every run works relative to the directory it was started in:
//! `logs/` for driver output, `img/` for failure screenshots and the download
//! directory the browser saves into.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use coursegrab::BrowserKind;

pub const LOGS_DIR: &str = "logs";
pub const IMG_DIR: &str = "img";
/// Where `--driver` without a path looks for the WebDriver binary.
pub const DRIVERS_DIR: &str = "drivers";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
	pub logs: PathBuf,
	pub img: PathBuf,
	/// Absolute, since the browser resolves it outside our working directory.
	pub downloads: PathBuf,
}

impl Layout {
	/// Creates the run directories under `root`. An absolute `download_dir`
	/// is used as is.
	pub fn prepare(root: &Path, download_dir: &Path) -> Result<Self> {
		let logs = root.join(LOGS_DIR);
		let img = root.join(IMG_DIR);
		let downloads = root.join(download_dir);

		for dir in [&logs, &img, &downloads] {
			fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
		}

		let downloads = std::path::absolute(&downloads).with_context(|| format!("resolving {}", downloads.display()))?;

		Ok(Self { logs, img, downloads })
	}

	/// Log file for a spawned driver, e.g. `logs/chrome.log`.
	pub fn driver_log(&self, kind: BrowserKind) -> PathBuf {
		self.logs.join(format!("{kind}.log"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn creates_all_run_directories() {
		let root = tempfile::tempdir().unwrap();
		let layout = Layout::prepare(root.path(), Path::new("downloads")).unwrap();

		assert!(root.path().join("logs").is_dir());
		assert!(root.path().join("img").is_dir());
		assert!(root.path().join("downloads").is_dir());
		assert!(layout.downloads.is_absolute());
		assert!(layout.downloads.ends_with("downloads"));
	}

	#[test]
	fn existing_directories_are_fine() {
		let root = tempfile::tempdir().unwrap();
		fs::create_dir(root.path().join("logs")).unwrap();
		fs::write(root.path().join("logs").join("old.log"), "x").unwrap();

		Layout::prepare(root.path(), Path::new("downloads")).unwrap();
		assert!(root.path().join("logs").join("old.log").exists());
	}

	#[test]
	fn absolute_download_dir_is_kept() {
		let root = tempfile::tempdir().unwrap();
		let elsewhere = tempfile::tempdir().unwrap();
		let target = elsewhere.path().join("course");

		let layout = Layout::prepare(root.path(), &target).unwrap();
		assert_eq!(layout.downloads, target);
		assert!(target.is_dir());
	}

	#[test]
	fn driver_log_is_named_after_backend() {
		let root = tempfile::tempdir().unwrap();
		let layout = Layout::prepare(root.path(), Path::new("downloads")).unwrap();
		assert_eq!(layout.driver_log(BrowserKind::Firefox), root.path().join("logs").join("firefox.log"));
	}
}
