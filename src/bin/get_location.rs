use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use nslocation::{get_location, set_location_helper, HelperCommand, LocationFinderError};

#[derive(Parser, Debug)]
struct Args {
    /// Location helper program to run instead of `nslocation-helper`.
    #[arg(long)]
    helper: Option<String>,
    #[arg(long = "helper-arg", allow_hyphen_values = true)]
    helper_args: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    simple_logger::init_with_env()?;
    let args = Args::parse();
    if let Some(ref helper) = args.helper {
        info!("helper: {}", helper);
    }
    let helper = (args.helper.is_some() || !args.helper_args.is_empty()).then(|| HelperCommand {
        program: args.helper.unwrap_or_else(|| HelperCommand::default().program),
        args: args.helper_args,
    });
    set_location_helper(helper)
        .map_err(|helper| format!("location helper already set: {}", helper.program))?;

    match get_location().await {
        Ok(coordinates) => {
            println!("{}", serde_json::to_string_pretty(&coordinates)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(LocationFinderError::Location(location_error)) => {
            eprintln!("{}", serde_json::to_string_pretty(&location_error)?);
            Ok(ExitCode::FAILURE)
        }
        Err(LocationFinderError::Native(native_error)) => {
            eprintln!("{}", serde_json::to_string_pretty(&native_error)?);
            Ok(ExitCode::FAILURE)
        }
        Err(err) => {
            error!("Error getting location: {}", err);
            Ok(ExitCode::FAILURE)
        }
    }
}
