use std::{io, marker::PhantomData, process::Command, sync::OnceLock};

use log::{debug, info};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::error::{LocationErrorCode, NativeError};

/// The synchronous native location lookup the facade wraps.
pub trait LocationAccessor: Send + Sync + 'static {
    type Output: Send + 'static;

    fn get_location(&self) -> Result<Self::Output, NativeError>;
}

impl<F, T> LocationAccessor for F
where
    F: Fn() -> Result<T, NativeError> + Send + Sync + 'static,
    T: Send + 'static,
{
    type Output = T;

    fn get_location(&self) -> Result<T, NativeError> {
        self()
    }
}

#[derive(serde::Deserialize, serde::Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Option<f64>,
    pub horizontal_accuracy: Option<f64>,
    pub vertical_accuracy: Option<f64>,
    /// Seconds since the Unix epoch.
    pub timestamp: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelperCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl HelperCommand {
    pub fn new(program: impl Into<String>) -> Self {
        HelperCommand {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl Default for HelperCommand {
    fn default() -> Self {
        HelperCommand::new("nslocation-helper")
    }
}

static LOCATION_HELPER: OnceLock<HelperCommand> = OnceLock::new();

/// Sets the process-wide helper used by [`CommandAccessor::from_config`]. Only the first
/// call takes effect; later ones get their value back.
pub fn set_location_helper(helper: Option<HelperCommand>) -> Result<(), HelperCommand> {
    if let Some(helper) = helper {
        LOCATION_HELPER.set(helper)?;
        info!("Using location helper: {}", location_helper().program);
    }
    Ok(())
}

pub fn location_helper() -> &'static HelperCommand {
    LOCATION_HELPER.get_or_init(HelperCommand::default)
}

/// Accessor backed by an external helper program.
///
/// On exit status zero the helper's stdout is parsed as JSON into `T`. Otherwise the first
/// non-empty stderr line is the error identifier and an optional second line carries a
/// JSON diagnostic payload.
#[derive(Debug)]
pub struct CommandAccessor<T = Coordinates> {
    helper: HelperCommand,
    output: PhantomData<fn() -> T>,
}

impl<T> CommandAccessor<T> {
    pub fn new(helper: HelperCommand) -> Self {
        CommandAccessor {
            helper,
            output: PhantomData,
        }
    }

    pub fn from_config() -> Self {
        CommandAccessor::new(location_helper().clone())
    }

    pub fn helper(&self) -> &HelperCommand {
        &self.helper
    }
}

impl<T> Clone for CommandAccessor<T> {
    fn clone(&self) -> Self {
        CommandAccessor::new(self.helper.clone())
    }
}

impl<T: DeserializeOwned + Send + 'static> LocationAccessor for CommandAccessor<T> {
    type Output = T;

    fn get_location(&self) -> Result<T, NativeError> {
        debug!("Running {} {:?}", self.helper.program, self.helper.args);
        let output = Command::new(&self.helper.program)
            .args(&self.helper.args)
            .output()
            .map_err(|err| launch_error(&self.helper, &err))?;

        if output.status.success() {
            return serde_json::from_slice(&output.stdout).map_err(|err| {
                NativeError::with_extra(
                    LocationErrorCode::GetLocationFailed.as_str(),
                    json!({ "reason": err.to_string() }),
                )
            });
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(parse_failure(&stderr).unwrap_or_else(|| {
            NativeError::with_extra(
                LocationErrorCode::GetLocationFailed.as_str(),
                json!({ "status": output.status.code() }),
            )
        }))
    }
}

fn launch_error(helper: &HelperCommand, err: &io::Error) -> NativeError {
    NativeError::with_extra(
        LocationErrorCode::NoLocationServices.as_str(),
        json!({ "program": helper.program, "reason": err.to_string() }),
    )
}

fn parse_failure(stderr: &str) -> Option<NativeError> {
    let mut lines = stderr.lines().map(str::trim).filter(|line| !line.is_empty());
    let identifier = lines.next()?;
    let extra = lines.next().map(|line| {
        serde_json::from_str::<Value>(line).unwrap_or_else(|_| json!({ "detail": line }))
    });
    Some(NativeError {
        message: identifier.to_string(),
        extra,
    })
}
