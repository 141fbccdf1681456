//! coursegrab: fetch the files posted on a Moodle course page.
//!
//! A run is a fixed pipeline:
//!
//! 1. [`config::DataFile`] supplies credentials and the course identifier.
//! 2. [`webdriver::WebDriverSession`] starts a browser that saves PDFs and
//!    archives straight to the download directory.
//! 3. [`auth::login`] submits the portal login form.
//! 4. [`navigate::open_course`] clicks the course link on the dashboard.
//! 5. [`harvest::harvest`] opens every resource and folder link in a
//!    transient tab and waits for the browser to turn it into a download.
//! 6. [`postprocess::wait_for_downloads`] lets in-flight downloads finish, then
//!    [`postprocess::unpack_archives`] and
//!    [`postprocess::organize_by_extension`] tidy the download directory.
//!
//! Browser steps go through the [`Browser`] trait so they can be exercised
//! with [`testing::MockBrowser`].
//!
//! # Example
//!
//! ```ignore
//! use coursegrab::{Browser, BrowserKind, DataFile, RunConfig, WebDriverSession};
//!
//! let data = DataFile::load("data.txt".as_ref())?;
//! let config = RunConfig::default();
//! let browser = WebDriverSession::connect("http://localhost:4444", BrowserKind::Chrome, &config.download_dir).await?;
//!
//! coursegrab::auth::login(&browser, &config.login_url, &config.login_form, &data.credentials()?).await?;
//! coursegrab::navigate::open_course(&browser, &data.course_identifier()?).await?;
//! let report = coursegrab::harvest::harvest(&browser, &config.course_page, &config.timeouts).await?;
//! ```

pub mod auth;
pub mod browser;
pub mod config;
pub mod driver;
pub mod error;
pub mod harvest;
pub mod navigate;
pub mod postprocess;
pub mod summary;
pub mod tabs;
pub mod testing;
pub mod wait;
pub mod webdriver;

pub use browser::{Browser, BrowserKind, Locator};
pub use config::{Credentials, DataFile, RunConfig, Timeouts};
pub use error::{Error, Result};
pub use harvest::{HarvestReport, LinkKind, LinkOutcome};
pub use summary::RunSummary;
pub use tabs::{TabHandle, TabSet};
pub use webdriver::WebDriverSession;
