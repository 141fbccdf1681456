use anyhow::{Context, Result};
use coursegrab::{Browser, BrowserKind};
use tracing::info;

/// What happens to the browser once the run is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownMode {
	/// Quit the session right away.
	Quit,
	/// Leave the window up for inspection until Ctrl-C, then quit.
	WaitForInterrupt,
}

impl ShutdownMode {
	/// Headless sessions have nothing to inspect and always quit.
	pub fn for_browser(kind: BrowserKind, force_quit: bool) -> Self {
		if kind.is_headless() || force_quit { Self::Quit } else { Self::WaitForInterrupt }
	}
}

pub async fn finish<B: Browser + ?Sized>(browser: &B, mode: ShutdownMode) -> Result<()> {
	if mode == ShutdownMode::WaitForInterrupt {
		info!(target = "coursegrab", "browser left open, press Ctrl-C to exit");
		tokio::signal::ctrl_c().await.context("waiting for Ctrl-C")?;
	}

	browser.quit().await.context("closing browser session")?;
	Ok(())
}
