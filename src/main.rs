use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

mod output;

use play_publisher::defaults::Settings;
use play_publisher::prompt::Prompter;
use play_publisher::{api, publish, workflow, Error, Result};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "play-publisher")]
#[command(version = VERSION)]
#[command(about = "Publish an APK or app bundle to a Google Play release track")]
struct Cli {
    /// Path to the JSON release configuration
    #[arg(value_name = "CONFIG")]
    config: Vec<PathBuf>,

    /// Invalid answers accepted per prompt before giving up
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    max_attempts: Option<u32>,
}

fn run(cli: Cli) -> Result<String> {
    let [config_path] = cli.config.as_slice() else {
        return Err(Error::config_not_found(None));
    };

    let settings = Settings::from_env()?.with_max_attempts(cli.max_attempts);
    let mut prompter = Prompter::stdio(settings.max_attempts);

    let config = workflow::prepare(config_path, &mut prompter)?;
    let client = api::create_client(&config, &settings)?;
    let outcome = workflow::publish(&client, &config, &mut prompter)?;

    Ok(publish::commit_message(&outcome.commit))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(message) => {
            output::print_message(&message);
            ExitCode::SUCCESS
        }
        Err(err) => ExitCode::from(output::report_error(&err)),
    }
}
