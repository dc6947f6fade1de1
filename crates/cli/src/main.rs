mod cmd;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use onabuild_lib::execute::BuildError;

use crate::output::print_error;

/// onabuild - incremental builds for Ona engine modules
#[derive(Parser)]
#[command(name = "onabuild")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Name of the module to build, together with its dependencies
  module: String,
}

fn main() {
  // Progress comes from the library's info-level events unless RUST_LOG says otherwise.
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,onabuild_lib=info"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let cli = Cli::parse();

  if let Err(err) = cmd::cmd_build(&cli.module) {
    print_error(&format!("{:#}", err));
    let code = err.downcast_ref::<BuildError>().map_or(1, BuildError::exit_code);
    std::process::exit(code);
  }
}
