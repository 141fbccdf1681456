//! Dashboard navigation to a course page.

use tracing::info;

use crate::browser::{Browser, Locator};
use crate::error::Result;

/// Quotes `text` as an XPath 1.0 string literal.
///
/// XPath has no escape sequences, so text containing both quote kinds is
/// assembled with `concat()`.
pub fn xpath_literal(text: &str) -> String {
	if !text.contains('\'') {
		return format!("'{text}'");
	}
	if !text.contains('"') {
		return format!("\"{text}\"");
	}

	let parts: Vec<String> = text.split('\'').map(|part| format!("'{part}'")).collect();
	format!("concat({})", parts.join(", \"'\", "))
}

/// Locator for the nearest anchor enclosing the element whose text is exactly `identifier`.
pub fn course_link(identifier: &str) -> Locator {
	Locator::XPath(format!("//*[text()={}]//ancestor::a[1]", xpath_literal(identifier)))
}

/// Clicks the dashboard link for `identifier` (`"<term> <course>"`).
pub async fn open_course<B: Browser + ?Sized>(browser: &B, identifier: &str) -> Result<()> {
	info!(target = "coursegrab", course = %identifier, "opening course page");
	browser.click(&course_link(identifier)).await
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::Error;
	use crate::testing::{MockAction, MockBrowser};

	#[test]
	fn plain_identifier_uses_single_quotes() {
		assert_eq!(
			course_link("2024F CS101-01"),
			Locator::XPath("//*[text()='2024F CS101-01']//ancestor::a[1]".into())
		);
	}

	#[test]
	fn quotes_in_identifier_stay_inside_the_literal() {
		assert_eq!(xpath_literal("O'Neil"), "\"O'Neil\"");
		assert_eq!(xpath_literal(r#"a'b"c"#), r#"concat('a', "'", 'b"c')"#);
	}

	#[tokio::test]
	async fn clicks_the_matching_course_link() {
		let browser = MockBrowser::new();
		let link = course_link("1920W ME327-03");
		browser.add_element(link.clone());

		open_course(&browser, "1920W ME327-03").await.unwrap();
		assert_eq!(browser.actions(), vec![MockAction::Click { locator: link.to_string() }]);
	}

	#[tokio::test]
	async fn unknown_course_is_a_lookup_error() {
		let browser = MockBrowser::new();
		let err = open_course(&browser, "2024F NOPE-01").await.unwrap_err();
		assert!(matches!(err, Error::ElementNotFound { .. }));
	}
}
