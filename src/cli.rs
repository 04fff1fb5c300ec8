//! CLI argument parsing and request payloads for gomodup

use crate::domain::Dependency;
use crate::error::ConfigError;
use crate::registry::DEFAULT_GOPROXY;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

/// Parse a timeout: plain seconds (`30`), or with an `s` / `m` suffix
fn parse_timeout(s: &str) -> Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty timeout".to_string());
    }

    let (num_str, multiplier) = if let Some(n) = s.strip_suffix('s') {
        (n, 1)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60)
    } else {
        (s, 1)
    };

    let num: u64 = num_str
        .parse()
        .map_err(|_| format!("invalid number in timeout: {}", num_str))?;
    if num == 0 {
        return Err("timeout must be greater than zero".to_string());
    }

    Ok(Duration::from_secs(num * multiplier))
}

/// Go module update helper
#[derive(Parser, Debug, Clone)]
#[command(name = "gomodup", version, about = "Go module update helper")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Module root holding go.mod
    #[arg(long, global = true, default_value = ".")]
    pub dir: PathBuf,

    /// Go module proxy list used for version lookups
    #[arg(long, global = true, env = "GOPROXY", default_value = DEFAULT_GOPROXY)]
    pub goproxy: String,

    /// Timeout for version lookups (e.g. 30, 45s, 2m)
    #[arg(long, global = true, default_value = "30", value_parser = parse_timeout)]
    pub timeout: Duration,

    /// Read the JSON payload from a file instead of stdin
    #[arg(long, global = true, value_name = "FILE")]
    pub args: Option<PathBuf>,

    /// Print diagnostics on stderr
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Show progress while rewriting imports
    #[arg(long, global = true)]
    pub progress: bool,

    /// Pretty-print the JSON response
    #[arg(long, global = true)]
    pub pretty: bool,
}

/// Subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Apply dependency changes to go.mod and rewrite imports for major upgrades
    UpdateDependencyFile,
    /// Select the version a dependency should be upgraded to
    GetUpdatedVersion,
    /// Print go.mod as JSON
    EditJson,
    /// Read `{"function": ..., "args": ...}` and dispatch it
    Run,
}

impl Command {
    /// The function a subcommand invokes directly, `None` for `run`
    pub fn function(&self) -> Option<Function> {
        match self {
            Command::UpdateDependencyFile => Some(Function::UpdateDependencyFile),
            Command::GetUpdatedVersion => Some(Function::GetUpdatedVersion),
            Command::EditJson => Some(Function::EditJson),
            Command::Run => None,
        }
    }
}

/// Helper functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    UpdateDependencyFile,
    GetUpdatedVersion,
    EditJson,
}

impl Function {
    /// Look a function up by its request name
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name {
            "updateDependencyFile" => Ok(Function::UpdateDependencyFile),
            "getUpdatedVersion" => Ok(Function::GetUpdatedVersion),
            "editJson" | "editJSON" => Ok(Function::EditJson),
            other => Err(ConfigError::invalid_payload(format!(
                "unknown function: {}",
                other
            ))),
        }
    }

    /// The request name of the function
    pub fn name(&self) -> &'static str {
        match self {
            Function::UpdateDependencyFile => "updateDependencyFile",
            Function::GetUpdatedVersion => "getUpdatedVersion",
            Function::EditJson => "editJson",
        }
    }
}

/// A `run` request
#[derive(Debug, Clone, Deserialize)]
pub struct HelperRequest {
    pub function: String,
    #[serde(default)]
    pub args: Value,
}

/// Arguments of `updateDependencyFile`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateDependencyFileArgs {
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

/// Arguments of `getUpdatedVersion`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetUpdatedVersionArgs {
    #[serde(default)]
    pub dependency: Option<Dependency>,
    #[serde(default)]
    pub exclusions: Vec<String>,
}

/// Parse raw payload text; blank input is an empty object
pub fn parse_payload(text: &str) -> Result<Value, ConfigError> {
    if text.trim().is_empty() {
        return Ok(Value::Object(Default::default()));
    }
    serde_json::from_str(text).map_err(|e| ConfigError::invalid_payload(e.to_string()))
}

/// Decode a payload into typed arguments; `null` is an empty object
pub fn decode_args<T: DeserializeOwned>(payload: Value) -> Result<T, ConfigError> {
    let payload = match payload {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    serde_json::from_value(payload).map_err(|e| ConfigError::invalid_payload(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = CliArgs::try_parse_from(["gomodup", "edit-json"]).unwrap();
        assert_eq!(args.command, Command::EditJson);
        assert_eq!(args.dir, PathBuf::from("."));
        assert_eq!(args.timeout, Duration::from_secs(30));
        assert!(args.args.is_none());
        assert!(!args.verbose);
        assert!(!args.progress);
        assert!(!args.pretty);
    }

    #[test]
    fn test_subcommands() {
        let args = CliArgs::try_parse_from(["gomodup", "update-dependency-file"]).unwrap();
        assert_eq!(args.command.function(), Some(Function::UpdateDependencyFile));

        let args = CliArgs::try_parse_from(["gomodup", "get-updated-version"]).unwrap();
        assert_eq!(args.command.function(), Some(Function::GetUpdatedVersion));

        let args = CliArgs::try_parse_from(["gomodup", "run"]).unwrap();
        assert_eq!(args.command.function(), None);
    }

    #[test]
    fn test_subcommand_required() {
        assert!(CliArgs::try_parse_from(["gomodup"]).is_err());
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let args = CliArgs::try_parse_from([
            "gomodup",
            "update-dependency-file",
            "--dir",
            "/work/app",
            "--args",
            "payload.json",
            "--verbose",
            "--progress",
            "--pretty",
        ])
        .unwrap();
        assert_eq!(args.dir, PathBuf::from("/work/app"));
        assert_eq!(args.args, Some(PathBuf::from("payload.json")));
        assert!(args.verbose);
        assert!(args.progress);
        assert!(args.pretty);
    }

    #[test]
    fn test_goproxy_flag() {
        let args = CliArgs::try_parse_from([
            "gomodup",
            "get-updated-version",
            "--goproxy",
            "https://goproxy.io,direct",
        ])
        .unwrap();
        assert_eq!(args.goproxy, "https://goproxy.io,direct");
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("30").unwrap(), Duration::from_secs(30));
        assert_eq!(parse_timeout("45s").unwrap(), Duration::from_secs(45));
        assert_eq!(parse_timeout("2m").unwrap(), Duration::from_secs(120));
    }

    #[test]
    fn test_parse_timeout_invalid() {
        assert!(parse_timeout("").is_err());
        assert!(parse_timeout("abc").is_err());
        assert!(parse_timeout("0").is_err());
        assert!(parse_timeout("1h").is_err());
    }

    #[test]
    fn test_function_names() {
        for function in [
            Function::UpdateDependencyFile,
            Function::GetUpdatedVersion,
            Function::EditJson,
        ] {
            assert_eq!(Function::from_name(function.name()).unwrap(), function);
        }
        assert!(Function::from_name("getVcsRemoteForImport").is_err());
    }

    #[test]
    fn test_parse_payload() {
        assert!(parse_payload("  \n").unwrap().is_object());
        assert!(parse_payload("{\"dependencies\": []}").is_ok());
        assert!(parse_payload("{not json").is_err());
    }

    #[test]
    fn test_decode_update_args() {
        let payload = parse_payload(
            r#"{"dependencies":[{"name":"example.com/mod/v2","version":"2.0.0","previousVersion":"v1.9.0","indirect":false}]}"#,
        )
        .unwrap();
        let args: UpdateDependencyFileArgs = decode_args(payload).unwrap();
        assert_eq!(args.dependencies.len(), 1);
        assert_eq!(args.dependencies[0].version, "v2.0.0");
    }

    #[test]
    fn test_decode_get_updated_version_args() {
        let args: GetUpdatedVersionArgs = decode_args(Value::Null).unwrap();
        assert!(args.dependency.is_none());
        assert!(args.exclusions.is_empty());

        let payload = parse_payload(
            r#"{"dependency":{"name":"example.com/mod","version":"v1.0.0"},"exclusions":["v1.1.0"]}"#,
        )
        .unwrap();
        let args: GetUpdatedVersionArgs = decode_args(payload).unwrap();
        assert_eq!(args.dependency.unwrap().name, "example.com/mod");
        assert_eq!(args.exclusions, vec!["v1.1.0"]);
    }

    #[test]
    fn test_decode_rejects_wrong_types() {
        let payload = parse_payload(r#"{"dependencies": "nope"}"#).unwrap();
        assert!(decode_args::<UpdateDependencyFileArgs>(payload).is_err());
    }
}
