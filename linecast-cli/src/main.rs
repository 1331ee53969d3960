use clap::Parser;
use linecast_cli::cli::Cli;
use linecast_cli::logging;

fn main() {
    let cli = Cli::parse();

    let logger = logging::init(cli.log_level());
    if let Err(error) = &logger {
        eprintln!("linecast: {error:#}");
    }

    match linecast_cli::run(&cli) {
        Ok(report) => std::process::exit(report.exit_code),
        Err(error) => {
            if logger.is_ok() {
                tracing::error!(exit_code = error.exit_code(), "{error}");
            } else {
                eprintln!("linecast: {error}");
            }
            std::process::exit(error.exit_code());
        }
    }
}
