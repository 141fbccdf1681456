//! WebDriver server process management.
//!
//! Runs a local chromedriver or geckodriver for the duration of a run. The
//! driver's stdout and stderr go to a log file and the process is killed when
//! the [`DriverProcess`] is dropped.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio::process::{Child, Command};
use tracing::{debug, warn};

use crate::browser::BrowserKind;
use crate::error::{Error, Result};
use crate::wait;

/// Executable name of the WebDriver server for `kind`, with `.exe` on Windows.
pub fn driver_binary_name(kind: BrowserKind) -> String {
	let base = match kind {
		BrowserKind::Firefox => "geckodriver",
		BrowserKind::Chrome | BrowserKind::Phantom => "chromedriver",
	};
	if cfg!(windows) { format!("{base}.exe") } else { base.to_string() }
}

/// Conventional location of the driver binary: `<drivers_dir>/<binary>`.
pub fn default_driver_path(drivers_dir: &Path, kind: BrowserKind) -> PathBuf {
	drivers_dir.join(driver_binary_name(kind))
}

/// A spawned WebDriver server.
pub struct DriverProcess {
	child: Child,
	port: u16,
}

impl DriverProcess {
	/// Starts `binary` on `port` and waits until it accepts connections.
	pub async fn spawn(binary: &Path, port: u16, log_path: &Path, startup_timeout: Duration) -> Result<Self> {
		debug!(target = "coursegrab", driver = %binary.display(), port, log = %log_path.display(), "starting webdriver");

		let log = std::fs::File::create(log_path)?;
		let child = Command::new(binary)
			.arg(format!("--port={port}"))
			.stdin(Stdio::null())
			.stdout(Stdio::from(log.try_clone()?))
			.stderr(Stdio::from(log))
			.kill_on_drop(true)
			.spawn()
			.map_err(|e| Error::BrowserLaunch(format!("failed to start {}: {e}", binary.display())))?;

		let process = Self { child, port };
		let condition = format!("webdriver to listen on port {port}");
		let listening = wait::poll_until(startup_timeout, Duration::from_millis(100), &condition, || async move {
			Ok::<_, Error>(TcpStream::connect(("127.0.0.1", port)).await.is_ok())
		})
		.await;
		if let Err(err) = listening {
			process.stop().await;
			return Err(err);
		}

		Ok(process)
	}

	/// Base URL clients should connect to.
	pub fn url(&self) -> String {
		format!("http://localhost:{}", self.port)
	}

	/// Kills the driver and reaps it.
	pub async fn stop(mut self) {
		if let Err(e) = self.child.kill().await {
			warn!(target = "coursegrab", error = %e, "failed to stop webdriver");
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn phantom_uses_chromedriver() {
		let name = driver_binary_name(BrowserKind::Phantom);
		assert!(name.starts_with("chromedriver"));
		assert_eq!(name, driver_binary_name(BrowserKind::Chrome));
		assert!(driver_binary_name(BrowserKind::Firefox).starts_with("geckodriver"));
	}

	#[test]
	fn default_path_lives_in_drivers_dir() {
		let path = default_driver_path(Path::new("drivers"), BrowserKind::Firefox);
		assert!(path.starts_with("drivers"));
	}

	#[tokio::test]
	async fn missing_binary_is_a_launch_error() {
		let dir = tempfile::tempdir().unwrap();
		let result = DriverProcess::spawn(
			&dir.path().join("no-such-driver"),
			9,
			&dir.path().join("driver.log"),
			Duration::from_millis(50),
		)
		.await;
		assert!(matches!(result, Err(Error::BrowserLaunch(_))));
	}

	#[cfg(unix)]
	#[tokio::test]
	async fn driver_that_never_listens_times_out() {
		let dir = tempfile::tempdir().unwrap();
		let log = dir.path().join("driver.log");

		let Err(err) = DriverProcess::spawn(Path::new("/bin/sh"), 9, &log, Duration::from_millis(50)).await else {
			panic!("nothing should be listening on port 9");
		};
		assert!(err.is_timeout());
		assert!(log.exists());
	}
}
