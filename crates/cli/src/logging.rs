use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

pub fn init_logging(verbosity: u8) {
	// thirtyfour and its HTTP stack are chatty at debug; keep them at warn
	// until -vv asks for everything.
	let filter = match verbosity {
		0 => "info,thirtyfour=warn,hyper=warn,reqwest=warn",
		1 => "debug,thirtyfour=warn,hyper=warn,reqwest=warn",
		_ => "trace",
	};

	let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

	let stderr = std::io::stderr.with_max_level(tracing::Level::TRACE);

	tracing_subscriber::fmt()
		.with_env_filter(env_filter)
		.with_writer(stderr)
		.with_target(false)
		.with_level(true)
		.compact()
		.init();
}
