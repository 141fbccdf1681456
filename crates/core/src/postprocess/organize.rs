use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizeReport {
	/// Files moved, per extension directory.
	pub moved: BTreeMap<String, usize>,
	/// Files without an extension, left at the top level.
	pub left_in_place: usize,
}

impl OrganizeReport {
	pub fn total_moved(&self) -> usize {
		self.moved.values().sum()
	}
}

/// Lower-cased text after the last period of the file name.
///
/// `None` for names without a period, dot-files such as `.profile`, and names
/// ending in a period.
pub fn extension_of(path: &Path) -> Option<String> {
	let ext = path.extension()?.to_string_lossy().to_lowercase();
	if ext.is_empty() { None } else { Some(ext) }
}

/// Moves every regular file in `dir` into a subdirectory named after its extension.
///
/// Running it again on an organized directory is a no-op: subdirectories are
/// never moved and existing extension directories are reused.
pub fn organize_by_extension(dir: &Path) -> Result<OrganizeReport> {
	let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
	let mut report = OrganizeReport::default();

	for entry in fs::read_dir(dir)? {
		let entry = entry?;
		if !entry.file_type()?.is_file() {
			continue;
		}
		let path = entry.path();
		match extension_of(&path) {
			Some(ext) => groups.entry(ext).or_default().push(path),
			None => report.left_in_place += 1,
		}
	}

	// Check every destination before the first move so a conflict leaves
	// the directory as it was.
	let mut plan = Vec::with_capacity(groups.len());
	for (ext, files) in groups {
		let target = dir.join(&ext);
		check_directory(&target)?;

		let mut moves = Vec::with_capacity(files.len());
		for file in files {
			let Some(name) = file.file_name() else {
				continue;
			};
			let destination = target.join(name);
			if destination.exists() {
				return Err(Error::DestinationConflict { path: destination });
			}
			moves.push((file, destination));
		}
		plan.push((ext, target, moves));
	}

	for (ext, target, moves) in plan {
		if !target.is_dir() {
			fs::create_dir(&target)?;
		}
		for (file, destination) in &moves {
			fs::rename(file, destination)?;
			debug!(target = "coursegrab", from = %file.display(), to = %destination.display(), "moved");
		}

		info!(target = "coursegrab", extension = %ext, files = moves.len(), "organized");
		report.moved.insert(ext, moves.len());
	}

	Ok(report)
}

/// Fails when `path` exists but is not a directory.
fn check_directory(path: &Path) -> Result<()> {
	match fs::metadata(path) {
		Ok(meta) if meta.is_dir() => Ok(()),
		Ok(_) => Err(Error::DestinationConflict { path: path.to_path_buf() }),
		Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
		Err(e) => Err(e.into()),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn touch(dir: &Path, name: &str) {
		fs::write(dir.join(name), name).unwrap();
	}

	#[test]
	fn extension_rules() {
		assert_eq!(extension_of(Path::new("a.PDF")), Some("pdf".into()));
		assert_eq!(extension_of(Path::new("archive.tar.gz")), Some("gz".into()));
		assert_eq!(extension_of(Path::new("readme")), None);
		assert_eq!(extension_of(Path::new(".profile")), None);
		assert_eq!(extension_of(Path::new("draft.")), None);
	}

	#[test]
	fn sorts_files_into_extension_directories() {
		let dir = tempfile::tempdir().unwrap();
		for name in ["a.pdf", "b.pdf", "c.docx", "readme"] {
			touch(dir.path(), name);
		}

		let report = organize_by_extension(dir.path()).unwrap();

		assert!(dir.path().join("pdf/a.pdf").is_file());
		assert!(dir.path().join("pdf/b.pdf").is_file());
		assert!(dir.path().join("docx/c.docx").is_file());
		assert!(dir.path().join("readme").is_file());
		assert!(!dir.path().join("a.pdf").exists());
		assert_eq!(report.moved.get("pdf"), Some(&2));
		assert_eq!(report.moved.get("docx"), Some(&1));
		assert_eq!(report.left_in_place, 1);
	}

	#[test]
	fn second_run_changes_nothing() {
		let dir = tempfile::tempdir().unwrap();
		for name in ["a.pdf", "c.docx", "readme"] {
			touch(dir.path(), name);
		}

		organize_by_extension(dir.path()).unwrap();
		let again = organize_by_extension(dir.path()).unwrap();

		assert_eq!(again.total_moved(), 0);
		assert!(dir.path().join("pdf/a.pdf").is_file());
		assert!(dir.path().join("docx/c.docx").is_file());
		assert!(!dir.path().join("pdf/pdf").exists());
	}

	#[test]
	fn new_files_join_existing_directory() {
		let dir = tempfile::tempdir().unwrap();
		touch(dir.path(), "a.pdf");
		organize_by_extension(dir.path()).unwrap();

		touch(dir.path(), "b.PDF");
		let report = organize_by_extension(dir.path()).unwrap();

		assert_eq!(report.moved.get("pdf"), Some(&1));
		assert!(dir.path().join("pdf/b.PDF").is_file());
	}

	#[test]
	fn file_named_like_extension_directory_conflicts() {
		let dir = tempfile::tempdir().unwrap();
		touch(dir.path(), "pdf");
		touch(dir.path(), "a.pdf");

		let err = organize_by_extension(dir.path()).unwrap_err();
		assert!(matches!(err, Error::DestinationConflict { ref path } if path.ends_with("pdf")));
		assert!(dir.path().join("a.pdf").is_file());
	}

	#[test]
	fn refuses_to_overwrite_organized_file() {
		let dir = tempfile::tempdir().unwrap();
		touch(dir.path(), "a.pdf");
		organize_by_extension(dir.path()).unwrap();
		touch(dir.path(), "a.pdf");

		let err = organize_by_extension(dir.path()).unwrap_err();
		assert!(matches!(err, Error::DestinationConflict { ref path } if path.ends_with("pdf/a.pdf")));
	}

	#[test]
	fn conflict_leaves_directory_untouched() {
		let dir = tempfile::tempdir().unwrap();
		fs::create_dir(dir.path().join("pdf")).unwrap();
		touch(&dir.path().join("pdf"), "b.pdf");
		for name in ["a.pdf", "b.pdf", "c.docx"] {
			touch(dir.path(), name);
		}

		let err = organize_by_extension(dir.path()).unwrap_err();

		assert!(matches!(err, Error::DestinationConflict { ref path } if path.ends_with("pdf/b.pdf")));
		for name in ["a.pdf", "b.pdf", "c.docx"] {
			assert!(dir.path().join(name).is_file(), "{name} was moved");
		}
		assert!(!dir.path().join("docx").exists());
		assert!(!dir.path().join("pdf/a.pdf").exists());
	}
}
