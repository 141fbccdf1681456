//! Portal login.

use tracing::info;

use crate::browser::{Browser, Locator};
use crate::config::{Credentials, LoginForm};
use crate::error::Result;

/// Opens the login page, fills both credential fields and submits the form.
///
/// Success is not verified here; a failed login surfaces when the course link
/// cannot be found.
pub async fn login<B: Browser + ?Sized>(browser: &B, login_url: &str, form: &LoginForm, credentials: &Credentials) -> Result<()> {
	info!(target = "coursegrab", url = %login_url, user = %credentials.username, "logging in");

	browser.goto(login_url).await?;
	browser.fill(&Locator::Name(form.username_field.clone()), &credentials.username).await?;
	browser.fill(&Locator::Name(form.password_field.clone()), &credentials.password).await?;
	browser.click(&Locator::Id(form.submit_button_id.clone())).await
}
