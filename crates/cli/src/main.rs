use clap::Parser;
use coursegrab_cli::{cli::Cli, logging, output, run};

#[tokio::main]
async fn main() {
	let cli = Cli::parse();
	logging::init_logging(cli.verbose);

	if let Err(err) = run::run(cli).await {
		output::print_error(&err);
		std::process::exit(1);
	}
}
