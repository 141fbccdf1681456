use std::fs;
use std::path::Path;
use std::time::Duration;

use coursegrab::browser::Locator;
use coursegrab::config::{Credentials, RunConfig, Timeouts};
use coursegrab::navigate::course_link;
use coursegrab::testing::{MockAction, MockBrowser};
use coursegrab::{BrowserKind, Error};
use coursegrab_cli::output::OutputFormat;
use coursegrab_cli::run::{Session, capture_failure, collect};
use coursegrab_cli::shutdown::ShutdownMode;

const COURSE: &str = "2024F CS101-01";
const SLIDES: &str = "https://moodle.test/mod/resource/view.php?id=11";
const LABS: &str = "https://moodle.test/mod/folder/view.php?id=12";

fn credentials() -> Credentials {
	Credentials {
		username: "alice".into(),
		password: "secret".into(),
	}
}

fn config(download_dir: &Path) -> RunConfig {
	RunConfig {
		login_url: "https://moodle.test/login/index.php".into(),
		download_dir: download_dir.to_path_buf(),
		timeouts: Timeouts {
			element: Duration::from_millis(200),
			tab_open: Duration::from_millis(200),
			download_close: Duration::from_millis(30),
			downloads_settle: Duration::from_millis(50),
			poll_interval: Duration::from_millis(5),
		},
		..RunConfig::default()
	}
}

fn portal(config: &RunConfig) -> MockBrowser {
	let browser = MockBrowser::new();
	browser.add_element(Locator::Name("username".into()));
	browser.add_element(Locator::Name("password".into()));
	browser.add_element(Locator::Id("loginbtn".into()));
	browser.add_element(course_link(COURSE));
	browser.add_links(&config.course_page.topic_links, &[SLIDES, LABS]);
	browser.add_element(config.course_page.folder_button.clone());
	browser.auto_close(SLIDES);
	browser
}

#[tokio::test]
async fn full_run_logs_in_harvests_and_sorts() {
	let dir = tempfile::tempdir().unwrap();
	let config = config(dir.path());
	let browser = portal(&config);

	// What the browser would have saved.
	fs::write(dir.path().join("slides.pdf"), "pdf").unwrap();
	fs::write(dir.path().join("syllabus.DOCX"), "docx").unwrap();
	fs::write(dir.path().join("README"), "text").unwrap();

	let summary = collect(&browser, BrowserKind::Chrome, &config, &credentials(), COURSE).await.unwrap();

	assert_eq!(summary.course, COURSE);
	assert_eq!(summary.harvest.links, 2);
	assert_eq!(summary.harvest.downloaded, 1);
	assert_eq!(summary.harvest.folders_archived, 1);
	assert!(summary.unpacked.archives.is_empty());
	assert_eq!(summary.organized.moved.get("pdf"), Some(&1));
	assert_eq!(summary.organized.moved.get("docx"), Some(&1));
	assert_eq!(summary.organized.left_in_place, 1);

	assert!(dir.path().join("pdf").join("slides.pdf").is_file());
	assert!(dir.path().join("docx").join("syllabus.DOCX").is_file());
	assert!(dir.path().join("README").is_file());

	let actions = browser.actions();
	assert_eq!(actions[0], MockAction::Goto { url: "https://moodle.test/login/index.php".into() });
	assert!(actions.contains(&MockAction::Click { locator: course_link(COURSE).to_string() }));
}

#[tokio::test]
async fn wrong_course_stops_before_harvesting() {
	let dir = tempfile::tempdir().unwrap();
	let config = config(dir.path());
	let browser = portal(&config);

	let err = collect(&browser, BrowserKind::Chrome, &config, &credentials(), "2023W CS999-01").await.unwrap_err();

	assert!(matches!(err, Error::ElementNotFound { .. }));
	assert_eq!(browser.count_actions(|a| matches!(a, MockAction::OpenTab { .. })), 0);
}

#[tokio::test]
async fn failure_screenshot_goes_to_img_dir() {
	let dir = tempfile::tempdir().unwrap();
	let browser = MockBrowser::new();

	let path = capture_failure(&browser, dir.path()).await.unwrap();

	assert!(path.starts_with(dir.path()));
	let name = path.file_name().unwrap().to_string_lossy().into_owned();
	assert!(name.starts_with("failure-") && name.ends_with(".png"));
	assert_eq!(browser.actions(), vec![MockAction::Screenshot { path }]);
}

fn session<'a>(config: &'a RunConfig, credentials: &'a Credentials, course: &'a str, img_dir: &'a Path) -> Session<'a> {
	Session {
		kind: BrowserKind::Chrome,
		config,
		credentials,
		course,
		img_dir,
		format: OutputFormat::Json,
		shutdown: ShutdownMode::Quit,
	}
}

#[tokio::test]
async fn successful_session_quits_browser_last() {
	let dir = tempfile::tempdir().unwrap();
	let img = tempfile::tempdir().unwrap();
	let config = config(dir.path());
	let browser = portal(&config);
	let credentials = credentials();

	let summary = session(&config, &credentials, COURSE, img.path()).drive(&browser).await.unwrap();

	assert_eq!(summary.harvest.links, 2);
	assert_eq!(browser.actions().last(), Some(&MockAction::Quit));
	assert_eq!(browser.count_actions(|a| matches!(a, MockAction::Screenshot { .. })), 0);
}

#[tokio::test]
async fn failed_session_takes_screenshot_then_quits() {
	let dir = tempfile::tempdir().unwrap();
	let img = tempfile::tempdir().unwrap();
	let config = config(dir.path());
	let browser = portal(&config);
	let credentials = credentials();

	let mut session = session(&config, &credentials, "2023W CS999-01", img.path());
	session.shutdown = ShutdownMode::WaitForInterrupt;
	let err = session.drive(&browser).await.unwrap_err();

	assert!(matches!(err.downcast_ref::<Error>(), Some(Error::ElementNotFound { .. })));
	let actions = browser.actions();
	let n = actions.len();
	assert!(matches!(&actions[n - 2], MockAction::Screenshot { path } if path.starts_with(img.path())));
	assert_eq!(actions[n - 1], MockAction::Quit);
}
