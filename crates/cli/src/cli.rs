use std::path::PathBuf;

use clap::{ArgAction, Parser};
use coursegrab::RunConfig;
use coursegrab::webdriver::DEFAULT_WEBDRIVER_URL;

use crate::output::OutputFormat;

/// Downloads every PDF and folder archive posted on a Moodle course page.
#[derive(Parser, Debug)]
#[command(name = "coursegrab")]
#[command(about = "Download the files posted on a Moodle course page")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v debug, -vv trace)
	#[arg(short, long, action = ArgAction::Count)]
	pub verbose: u8,

	/// Summary format: text or json
	#[arg(short = 'f', long, value_enum, default_value = "text")]
	pub format: OutputFormat,

	/// Data file with username, password, course and term records
	#[arg(short, long, value_name = "FILE")]
	pub data: PathBuf,

	/// Browser backend: chrome, firefox or phantom (anything else means phantom)
	#[arg(short, long, value_name = "NAME")]
	pub browser: String,

	/// Directory the browser saves into
	#[arg(long, value_name = "DIR", default_value = "downloads")]
	pub download_dir: PathBuf,

	/// Portal login page
	#[arg(long, value_name = "URL")]
	pub login_url: Option<String>,

	/// WebDriver server to connect to when no driver is spawned
	#[arg(long, value_name = "URL", default_value = DEFAULT_WEBDRIVER_URL)]
	pub webdriver_url: String,

	/// Spawn a WebDriver binary for the run (defaults to ./drivers/<chromedriver|geckodriver>)
	#[arg(long, value_name = "PATH", num_args = 0..=1)]
	pub driver: Option<Option<PathBuf>>,

	/// Port for a spawned WebDriver binary
	#[arg(long, default_value_t = 4444)]
	pub port: u16,

	/// Quit a visible browser at the end instead of waiting for Ctrl-C
	#[arg(long)]
	pub close: bool,
}

impl Cli {
	/// Run configuration with this invocation's overrides applied.
	pub fn run_config(&self, download_dir: PathBuf) -> RunConfig {
		let defaults = RunConfig::default();
		RunConfig {
			login_url: self.login_url.clone().unwrap_or(defaults.login_url),
			download_dir,
			..RunConfig::default()
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_required_flags() {
		let cli = Cli::try_parse_from(["coursegrab", "-d", "data.txt", "-b", "chrome"]).unwrap();

		assert_eq!(cli.data, PathBuf::from("data.txt"));
		assert_eq!(cli.browser, "chrome");
		assert_eq!(cli.download_dir, PathBuf::from("downloads"));
		assert_eq!(cli.webdriver_url, "http://localhost:4444");
		assert_eq!(cli.format, OutputFormat::Text);
		assert!(cli.driver.is_none());
		assert!(!cli.close);
	}

	#[test]
	fn data_and_browser_are_required() {
		assert!(Cli::try_parse_from(["coursegrab", "-b", "chrome"]).is_err());
		assert!(Cli::try_parse_from(["coursegrab", "--data", "data.txt"]).is_err());
	}

	#[test]
	fn unknown_browser_name_is_accepted() {
		let cli = Cli::try_parse_from(["coursegrab", "--data", "d.txt", "--browser", "Safari"]).unwrap();
		assert_eq!(cli.browser, "Safari");
	}

	#[test]
	fn driver_flag_takes_optional_path() {
		let bare = Cli::try_parse_from(["coursegrab", "-d", "d.txt", "-b", "firefox", "--driver"]).unwrap();
		assert_eq!(bare.driver, Some(None));

		let explicit = Cli::try_parse_from(["coursegrab", "-d", "d.txt", "-b", "firefox", "--driver", "/opt/geckodriver", "--port", "9515"]).unwrap();
		assert_eq!(explicit.driver, Some(Some(PathBuf::from("/opt/geckodriver"))));
		assert_eq!(explicit.port, 9515);
	}

	#[test]
	fn verbosity_and_format() {
		let cli = Cli::try_parse_from(["coursegrab", "-vv", "-f", "json", "-d", "d.txt", "-b", "phantom"]).unwrap();
		assert_eq!(cli.verbose, 2);
		assert_eq!(cli.format, OutputFormat::Json);
	}

	#[test]
	fn run_config_applies_overrides() {
		let cli = Cli::try_parse_from(["coursegrab", "-d", "d.txt", "-b", "chrome", "--login-url", "https://moodle.test/login/index.php"]).unwrap();
		let config = cli.run_config(PathBuf::from("/tmp/dl"));

		assert_eq!(config.login_url, "https://moodle.test/login/index.php");
		assert_eq!(config.download_dir, PathBuf::from("/tmp/dl"));
		assert_eq!(config.archive_extension, "zip");
	}

	#[test]
	fn run_config_keeps_default_login_url() {
		let cli = Cli::try_parse_from(["coursegrab", "-d", "d.txt", "-b", "chrome"]).unwrap();
		assert_eq!(cli.run_config(PathBuf::from("dl")).login_url, RunConfig::default().login_url);
	}
}
