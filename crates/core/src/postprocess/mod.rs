//! Download directory housekeeping: waiting for downloads, archive extraction,
//! then sorting by extension.

mod organize;
mod settle;
mod unpack;

pub use organize::{OrganizeReport, extension_of, organize_by_extension};
pub use settle::{partial_downloads, wait_for_downloads};
pub use unpack::{ArchiveReport, UnpackReport, unpack_archives};
