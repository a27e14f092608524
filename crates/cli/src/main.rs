mod cli;

use std::fs;
use std::io::Read;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing::{info, warn};

use status_hooks_core::config::{load_dotenv, Config};
use status_hooks_rules::loader::{LoadStatus, PolicyLoader};
use status_hooks_rules::validation::{validate_policy, validate_yaml, ValidationResult};
use status_hooks_rules::{FunctionRunner, RunRequest};

use crate::cli::{CliArgs, Command};

fn main() -> Result<ExitCode> {
    load_dotenv();
    let config = Config::from_env();

    // Logs go to stderr so stdout stays machine-readable.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    let pretty = args.pretty || config.output.pretty;
    config.log_summary();

    match args.command {
        Command::Run { request, policy, tag } => {
            let policy = policy.or_else(|| config.policy.path.clone());
            run(&config, &request, policy.as_deref(), tag, pretty)
        }
        Command::Validate { policy } => validate(&policy, pretty),
        Command::Config => {
            print_json(&config.summary(), pretty)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run(config: &Config, request_path: &Path, policy_path: Option<&Path>, tag: Option<String>, pretty: bool) -> Result<ExitCode> {
    let raw = read_input(request_path)?;
    let mut request: RunRequest = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse request '{}'", request_path.display()))?;
    if let Some(tag) = tag {
        request.meta.tag = tag;
    }

    let runner = FunctionRunner::new().with_ttl(u64::from(config.output.ttl_seconds));
    let response = match policy_path {
        Some(path) => {
            let policy = PolicyLoader::load_path(path)
                .with_context(|| format!("failed to load policy '{}'", path.display()))?;
            info!(path = %path.display(), hooks = policy.hooks().len(), "using policy from disk");
            runner.run_with_policy(&request, &policy)
        }
        None => runner.run(&request),
    };

    print_json(&response, pretty)?;
    Ok(if response.succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn validate(path: &Path, pretty: bool) -> Result<ExitCode> {
    let mut reports: Vec<(String, ValidationResult)> = Vec::new();

    if path.is_dir() {
        let mut loader = PolicyLoader::new(path.to_path_buf());
        for result in loader.load_all().context("failed to scan policy directory")? {
            if let LoadStatus::Failed { error } = &result.status {
                reports.push((result.path.display().to_string(), ValidationResult::failed(error.clone())));
            }
        }
        for (file, policy) in loader.documents() {
            reports.push((file.display().to_string(), validate_policy(policy)));
        }
    } else {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read '{}'", path.display()))?;
        reports.push((path.display().to_string(), validate_yaml(&contents)));
    }

    let valid = reports.iter().all(|(_, r)| r.valid);
    for (file, report) in &reports {
        for w in &report.warnings {
            warn!(file = %file, path = %w.path, "{}", w.message);
        }
    }

    #[derive(Serialize)]
    struct Report<'a> {
        file: &'a str,
        #[serde(flatten)]
        result: &'a ValidationResult,
    }
    let out: Vec<_> = reports
        .iter()
        .map(|(file, result)| Report { file, result })
        .collect();
    print_json(&out, pretty)?;

    Ok(if valid { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read request from stdin")?;
        return Ok(buf);
    }
    fs::read_to_string(path).with_context(|| format!("failed to read '{}'", path.display()))
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}
