//! Run summary and error printing.

use clap::ValueEnum;
use colored::Colorize;
use coursegrab::RunSummary;

/// How the run summary is written to stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
	#[default]
	Text,
	Json,
}

pub fn render_summary(summary: &RunSummary, format: OutputFormat) -> serde_json::Result<String> {
	match format {
		OutputFormat::Text => Ok(summary.to_text()),
		OutputFormat::Json => serde_json::to_string_pretty(summary),
	}
}

pub fn print_summary(summary: &RunSummary, format: OutputFormat) -> serde_json::Result<()> {
	println!("{}", render_summary(summary, format)?);
	Ok(())
}

/// Prints the full error chain to stderr.
pub fn print_error(err: &anyhow::Error) {
	eprintln!("{} {err:#}", "error:".red().bold());
}

#[cfg(test)]
mod tests {
	use coursegrab::postprocess::{OrganizeReport, UnpackReport};
	use coursegrab::{BrowserKind, HarvestReport};

	use super::*;

	fn summary() -> RunSummary {
		RunSummary {
			course: "2024F CS101-01".into(),
			browser: BrowserKind::Phantom,
			harvest: HarvestReport {
				links: 2,
				downloaded: 2,
				..Default::default()
			},
			unpacked: UnpackReport::default(),
			organized: OrganizeReport::default(),
		}
	}

	#[test]
	fn json_is_camel_case_object() {
		let text = render_summary(&summary(), OutputFormat::Json).unwrap();
		let value: serde_json::Value = serde_json::from_str(&text).unwrap();
		assert_eq!(value["course"], "2024F CS101-01");
		assert_eq!(value["harvest"]["downloaded"], 2);
		assert_eq!(value["browser"], "phantom");
	}

	#[test]
	fn text_uses_summary_rendering() {
		let text = render_summary(&summary(), OutputFormat::Text).unwrap();
		assert_eq!(text, summary().to_text());
	}
}
