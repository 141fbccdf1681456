//! One end-to-end run.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use coursegrab::driver::{DriverProcess, default_driver_path};
use coursegrab::postprocess::{organize_by_extension, unpack_archives, wait_for_downloads};
use coursegrab::{Browser, BrowserKind, Credentials, DataFile, RunConfig, RunSummary, WebDriverSession, auth, harvest, navigate};
use tracing::{debug, info, warn};

use crate::cli::Cli;
use crate::output::{self, OutputFormat};
use crate::shutdown::{self, ShutdownMode};
use crate::workspace::{DRIVERS_DIR, Layout};

const DRIVER_STARTUP: Duration = Duration::from_secs(10);

pub async fn run(cli: Cli) -> Result<()> {
	let layout = Layout::prepare(Path::new("."), &cli.download_dir)?;

	let data = DataFile::load(&cli.data)?;
	let credentials = data.credentials()?;
	let course = data.course_identifier()?;
	let kind = BrowserKind::from_selector(&cli.browser);
	let config = cli.run_config(layout.downloads.clone());

	let driver = match &cli.driver {
		Some(path) => {
			let binary = path.clone().unwrap_or_else(|| default_driver_path(Path::new(DRIVERS_DIR), kind));
			let process = DriverProcess::spawn(&binary, cli.port, &layout.driver_log(kind), DRIVER_STARTUP)
				.await
				.context("starting webdriver")?;
			Some(process)
		}
		None => None,
	};
	let server_url = driver.as_ref().map_or_else(|| cli.webdriver_url.clone(), DriverProcess::url);

	let session = Session {
		kind,
		config: &config,
		credentials: &credentials,
		course: &course,
		img_dir: &layout.img,
		format: cli.format,
		shutdown: ShutdownMode::for_browser(kind, cli.close),
	};
	let result = connect_and_drive(&session, &server_url).await;

	if let Some(driver) = driver {
		driver.stop().await;
	}
	result.map(|_| ())
}

async fn connect_and_drive(session: &Session<'_>, server_url: &str) -> Result<RunSummary> {
	info!(target = "coursegrab", browser = %session.kind, server = %server_url, course = %session.course, "starting run");
	let browser = WebDriverSession::connect(server_url, session.kind, &session.config.download_dir)
		.await
		.with_context(|| format!("connecting to webdriver at {server_url}"))?;
	session.drive(&browser).await
}

/// Everything one browser session needs, resolved from the command line.
pub struct Session<'a> {
	pub kind: BrowserKind,
	pub config: &'a RunConfig,
	pub credentials: &'a Credentials,
	pub course: &'a str,
	/// Where a failure screenshot goes.
	pub img_dir: &'a Path,
	pub format: OutputFormat,
	/// Applied after a successful run; a failed run always quits.
	pub shutdown: ShutdownMode,
}

impl Session<'_> {
	/// Runs the pipeline on `browser`, prints the summary and shuts the
	/// browser down whatever the outcome.
	pub async fn drive<B: Browser + ?Sized>(&self, browser: &B) -> Result<RunSummary> {
		let outcome = match collect(browser, self.kind, self.config, self.credentials, self.course).await {
			Ok(summary) => output::print_summary(&summary, self.format).map(|()| summary).map_err(anyhow::Error::from),
			Err(err) => {
				capture_failure(browser, self.img_dir).await;
				Err(err.into())
			}
		};

		let mode = if outcome.is_ok() { self.shutdown } else { ShutdownMode::Quit };
		let closed = shutdown::finish(browser, mode).await;
		match outcome {
			Ok(summary) => closed.map(|()| summary),
			Err(err) => {
				if let Err(e) = closed {
					warn!(target = "coursegrab", error = %e, "failed to close browser session");
				}
				Err(err)
			}
		}
	}
}

/// Logs in, harvests the course page and tidies the download directory.
pub async fn collect<B: Browser + ?Sized>(
	browser: &B,
	kind: BrowserKind,
	config: &RunConfig,
	credentials: &Credentials,
	course: &str,
) -> coursegrab::Result<RunSummary> {
	auth::login(browser, &config.login_url, &config.login_form, credentials).await?;
	navigate::open_course(browser, course).await?;

	let harvest = harvest::harvest(browser, &config.course_page, &config.timeouts).await?;

	let timeouts = &config.timeouts;
	wait_for_downloads(&config.download_dir, timeouts.downloads_settle, timeouts.poll_interval).await?;
	let unpacked = unpack_archives(&config.download_dir, &config.archive_extension)?;
	let organized = organize_by_extension(&config.download_dir)?;

	Ok(RunSummary {
		course: course.to_string(),
		browser: kind,
		harvest,
		unpacked,
		organized,
	})
}

/// Best-effort screenshot of the focused tab into `img_dir`.
pub async fn capture_failure<B: Browser + ?Sized>(browser: &B, img_dir: &Path) -> Option<PathBuf> {
	let secs = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default();
	let path = img_dir.join(format!("failure-{secs}.png"));

	match browser.screenshot(&path).await {
		Ok(()) => {
			warn!(target = "coursegrab", path = %path.display(), "saved failure screenshot");
			Some(path)
		}
		Err(e) => {
			debug!(target = "coursegrab", error = %e, "failure screenshot not taken");
			None
		}
	}
}
