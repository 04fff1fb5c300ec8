//! gomodup - Go module update helper
//!
//! Reads a JSON payload (stdin or `--args <FILE>`), runs one helper
//! function against the module at `--dir` and prints a JSON response:
//! `{"result": ...}` on success, `{"error": "..."}` with exit code 1 on failure.

use anyhow::Context;
use clap::Parser;
use gomodup::cli::{
    decode_args, parse_payload, CliArgs, Function, GetUpdatedVersionArgs, HelperRequest,
    UpdateDependencyFileArgs,
};
use gomodup::error::{AppError, ConfigError, IoError};
use gomodup::orchestrator::{Orchestrator, OrchestratorConfig};
use gomodup::output::{JsonFormatter, OutputFormatter, Reporter, Response};
use gomodup::registry::{GoProxyRepository, HttpClient};
use serde_json::Value;
use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = CliArgs::parse();

    match run(args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Main application logic
fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    let reporter = Reporter::new(args.verbose);
    reporter.step(format!("gomodup v{}", env!("CARGO_PKG_VERSION")));
    reporter.detail("dir", args.dir.display().to_string());

    let response = match respond(&args) {
        Ok(result) => Response::success(result),
        Err(e) => {
            reporter.warn(e.to_string());
            Response::failure(e.to_string())
        }
    };

    let formatter = JsonFormatter::new(args.pretty);
    let mut stdout = io::stdout().lock();
    formatter
        .format(&response, &mut stdout)
        .context("failed to write response")?;
    stdout.flush()?;

    if response.is_error() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Resolve the requested function and its arguments, then invoke it
fn respond(args: &CliArgs) -> Result<Value, AppError> {
    if !args.dir.is_dir() {
        return Err(ConfigError::invalid_path(&args.dir, "not a directory").into());
    }

    let payload = parse_payload(&read_payload(args)?)?;

    let (function, payload) = match args.command.function() {
        Some(function) => (function, payload),
        None => {
            let request: HelperRequest = decode_args(payload)?;
            (Function::from_name(&request.function)?, request.args)
        }
    };

    invoke(args, function, payload)
}

fn invoke(args: &CliArgs, function: Function, payload: Value) -> Result<Value, AppError> {
    let orchestrator = Orchestrator::new(OrchestratorConfig::from(args));

    match function {
        Function::UpdateDependencyFile => {
            let request: UpdateDependencyFileArgs = decode_args(payload)?;
            let files = orchestrator.update_dependency_file(&request.dependencies)?;
            Ok(Value::from(files))
        }
        Function::GetUpdatedVersion => {
            let request: GetUpdatedVersionArgs = decode_args(payload)?;
            let client = HttpClient::with_timeout(args.timeout)?;
            let repository = GoProxyRepository::from_goproxy(client, &args.goproxy)?;
            let version = orchestrator.get_updated_version(
                &repository,
                request.dependency.as_ref(),
                &request.exclusions,
            )?;
            Ok(Value::from(version))
        }
        Function::EditJson => {
            let summary = orchestrator.edit_json()?;
            serde_json::to_value(summary)
                .map_err(|e| ConfigError::invalid_payload(e.to_string()).into())
        }
    }
}

/// Payload text from `--args`, or stdin unless it is a terminal
fn read_payload(args: &CliArgs) -> Result<String, IoError> {
    if let Some(path) = &args.args {
        return fs::read_to_string(path).map_err(|e| IoError::read(path, e));
    }

    let mut stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(String::new());
    }
    let mut text = String::new();
    stdin
        .read_to_string(&mut text)
        .map_err(|e| IoError::read("<stdin>", e))?;
    Ok(text)
}
