//! Bounded client-side polling.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tracing::trace;

use crate::browser::{Browser, Locator};
use crate::error::{Error, Result};

/// Polls `check` every `interval` until it yields `true` or `timeout` expires.
///
/// The condition is always checked at least once, and once more at the deadline.
/// Errors from `check` abort the wait immediately.
pub async fn poll_until<F, Fut>(timeout: Duration, interval: Duration, condition: &str, mut check: F) -> Result<()>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<bool>>,
{
	let deadline = Instant::now() + timeout;
	loop {
		if check().await? {
			return Ok(());
		}

		let now = Instant::now();
		if now >= deadline {
			return Err(Error::Timeout {
				ms: timeout.as_millis() as u64,
				condition: condition.to_string(),
			});
		}

		trace!(target = "coursegrab", condition, "condition not met, polling");
		tokio::time::sleep(interval.min(deadline - now)).await;
	}
}

/// Waits until exactly `expected` tabs are open.
pub async fn tab_count<B: Browser + ?Sized>(browser: &B, expected: usize, timeout: Duration, interval: Duration) -> Result<()> {
	let condition = format!("number of tabs to be {expected}");
	poll_until(timeout, interval, &condition, || async { Ok::<_, Error>(browser.tabs().await?.len() == expected) }).await
}

/// Waits until every element matching `locator` is displayed.
pub async fn all_visible<B: Browser + ?Sized>(browser: &B, locator: &Locator, timeout: Duration, interval: Duration) -> Result<()> {
	let condition = format!("visibility of all elements located by {locator}");
	poll_until(timeout, interval, &condition, || browser.all_visible(locator)).await
}

/// Waits until the first element matching `locator` can be clicked.
pub async fn clickable<B: Browser + ?Sized>(browser: &B, locator: &Locator, timeout: Duration, interval: Duration) -> Result<()> {
	let condition = format!("element to be clickable: {locator}");
	poll_until(timeout, interval, &condition, || browser.is_clickable(locator)).await
}
