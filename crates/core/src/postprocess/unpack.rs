use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};
use zip::ZipArchive;

use crate::error::{Error, Result};

/// One extracted archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveReport {
	pub name: String,
	/// Files written, directories not counted.
	pub files: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnpackReport {
	pub archives: Vec<ArchiveReport>,
}

impl UnpackReport {
	pub fn files(&self) -> usize {
		self.archives.iter().map(|a| a.files).sum()
	}
}

fn archive_error(path: &Path, err: zip::result::ZipError) -> Error {
	match err {
		zip::result::ZipError::Io(io) => Error::Io(io),
		other => Error::Archive {
			path: path.to_path_buf(),
			message: other.to_string(),
		},
	}
}

/// Archives directly under `dir` whose name ends in `.{extension}`, sorted by name.
fn list_archives(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
	let suffix = format!(".{extension}");
	let mut archives = Vec::new();
	for entry in fs::read_dir(dir)? {
		let entry = entry?;
		if entry.file_type()?.is_file() && entry.file_name().to_string_lossy().ends_with(&suffix) {
			archives.push(entry.path());
		}
	}
	archives.sort();
	Ok(archives)
}

/// Extracts every `.{extension}` archive in `dir` into `dir` and deletes it.
///
/// Only archives present before extraction starts are processed; archives
/// that come out of another archive stay packed.
pub fn unpack_archives(dir: &Path, extension: &str) -> Result<UnpackReport> {
	let mut report = UnpackReport::default();

	for path in list_archives(dir, extension)? {
		let files = extract(&path, dir)?;
		fs::remove_file(&path)?;

		let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
		info!(target = "coursegrab", archive = %name, files, "unpacked archive");
		report.archives.push(ArchiveReport { name, files });
	}

	Ok(report)
}

fn extract(archive_path: &Path, dest: &Path) -> Result<usize> {
	let file = fs::File::open(archive_path)?;
	let mut archive = ZipArchive::new(file).map_err(|e| archive_error(archive_path, e))?;

	// Resolve every entry up front so an unsafe name aborts before anything is written.
	let mut targets = Vec::with_capacity(archive.len());
	for i in 0..archive.len() {
		let entry = archive.by_index(i).map_err(|e| archive_error(archive_path, e))?;
		let Some(relative) = entry.enclosed_name() else {
			return Err(Error::Archive {
				path: archive_path.to_path_buf(),
				message: format!("entry escapes extraction directory: {}", entry.name()),
			});
		};
		targets.push(dest.join(relative));
	}

	let mut files = 0;
	for (i, outpath) in targets.into_iter().enumerate() {
		let mut entry = archive.by_index(i).map_err(|e| archive_error(archive_path, e))?;
		if entry.is_dir() {
			fs::create_dir_all(&outpath)?;
			continue;
		}

		if let Some(parent) = outpath.parent() {
			fs::create_dir_all(parent)?;
		}
		let mut outfile = fs::File::create(&outpath)?;
		io::copy(&mut entry, &mut outfile)?;
		debug!(target = "coursegrab", path = %outpath.display(), "extracted");
		files += 1;
	}

	Ok(files)
}
