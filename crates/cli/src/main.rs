use std::process::ExitCode;

use clap::Parser;
use clap::error::ErrorKind;
use tracing_subscriber::EnvFilter;

mod install;
mod output;
mod prompts;

/// verso - install software versions into a versioned directory tree
#[derive(Parser, Debug)]
#[command(name = "verso")]
#[command(version, about, long_about = None)]
pub(crate) struct Cli {
  /// Version name or path to a definition file
  pub definition: Option<String>,

  /// List all available versions and exit
  #[arg(short, long)]
  pub list: bool,

  /// Install even if the version appears to be installed already
  #[arg(short, long)]
  pub force: bool,

  /// Ask the build engine to keep its working tree after building
  #[arg(short, long)]
  pub keep: bool,

  /// Forward verbose output from the build engine
  #[arg(short, long)]
  pub verbose: bool,
}

fn main() -> ExitCode {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .without_time()
    .init();

  // clap exits 2 on usage errors by default; this tool reserves 2 for the
  // build engine's "definition not recognized" status, so map parse errors
  // to 1 ourselves.
  let cli = match Cli::try_parse() {
    Ok(cli) => cli,
    Err(err) => {
      let code = match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
      };
      let _ = err.print();
      return ExitCode::from(code);
    }
  };

  let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
    Ok(runtime) => runtime,
    Err(err) => {
      output::print_error(&format!("failed to create async runtime: {err}"));
      return ExitCode::FAILURE;
    }
  };

  match runtime.block_on(install::run(cli)) {
    Ok(code) => code,
    Err(err) => {
      output::print_error(&format!("{err:#}"));
      ExitCode::FAILURE
    }
  }
}
