//! Request Guard CLI
//!
//! Command-line interface for validating payloads, linting schema
//! descriptions, and invoking function handlers locally.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use request_guard::{
    handle, lint, load_json, load_schema, validate, Event, FileStatus, FunctionContext, Gate,
    ValidationResult,
};

#[derive(Parser)]
#[command(name = "request-guard")]
#[command(about = "Validate serverless request payloads against schema descriptions")]
#[command(version)]
struct Cli {
    /// Log debug details to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum GateKind {
    /// Static key in the x-api-key header
    ApiKey,
    /// Bearer credential in the authorization header
    Token,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a payload against a schema description
    Validate {
        /// Schema description file
        schema: PathBuf,

        /// Payload file to validate
        payload: PathBuf,

        /// Output the full result as JSON (for automation)
        #[arg(long)]
        json: bool,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Lint schema description files
    Lint {
        /// File or directory to lint
        path: PathBuf,

        /// Output format: text (default) or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Suppress progress output, only show errors
        #[arg(long, short)]
        quiet: bool,
    },

    /// Run a function handler against an event file and print the response
    Invoke {
        /// Schema description file
        #[arg(long)]
        schema: PathBuf,

        /// Event file: {"headers": {...}, "body": {...}}
        #[arg(long)]
        event: PathBuf,

        /// Authorization gate the function uses
        #[arg(long, value_enum)]
        gate: GateKind,

        /// Configured API key [env: API_KEY]
        #[arg(long)]
        api_key: Option<String>,

        /// Account identifier for token verification [env: ACCOUNT_SID]
        #[arg(long)]
        account_sid: Option<String>,

        /// Account secret for token verification [env: AUTH_TOKEN]
        #[arg(long)]
        auth_token: Option<String>,

        /// Base URL of the token verification service
        #[arg(long)]
        verifier_url: Option<String>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Validate {
            schema,
            payload,
            json,
            pretty,
        } => run_validate(&schema, &payload, json, pretty),

        Commands::Lint {
            path,
            format,
            strict,
            quiet,
        } => run_lint(&path, &format, strict, quiet),

        Commands::Invoke {
            schema,
            event,
            gate,
            api_key,
            account_sid,
            auth_token,
            verifier_url,
            pretty,
        } => run_invoke(InvokeArgs {
            schema,
            event,
            gate,
            context: FunctionContext {
                api_key,
                account_sid,
                auth_token,
            }
            .or(FunctionContext::from_env()),
            verifier_url,
            pretty,
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code),
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();
}

fn to_json(value: &impl serde::Serialize, pretty: bool) -> Result<String, u8> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(|e| {
        eprintln!("Error serializing output: {}", e);
        2u8
    })
}

fn run_validate(
    schema_path: &Path,
    payload_path: &Path,
    json_output: bool,
    pretty: bool,
) -> Result<(), u8> {
    let schema = load_schema(schema_path).map_err(|e| {
        report_error(json_output, &format!("loading schema: {}", e));
        e.exit_code() as u8
    })?;

    let payload = load_json(payload_path).map_err(|e| {
        report_error(json_output, &format!("loading payload: {}", e));
        e.exit_code() as u8
    })?;

    let result = validate(&schema, &payload);
    tracing::debug!(errors = result.errors.len(), "validation finished");

    if json_output {
        println!("{}", to_json(&result, pretty)?);
    } else {
        print_result(&result, pretty)?;
    }

    if result.is_valid {
        Ok(())
    } else {
        Err(1)
    }
}

fn print_result(result: &ValidationResult, pretty: bool) -> Result<(), u8> {
    if result.is_valid {
        println!("Valid");
        println!("{}", to_json(&result.data, pretty)?);
    } else {
        eprintln!("Validation failed:");
        for error in &result.errors {
            eprintln!("  {}", error);
        }
    }
    Ok(())
}

/// Output an error message in plain text or JSON format.
fn report_error(json_output: bool, msg: &str) {
    if json_output {
        println!("{}", serde_json::json!({ "isValid": false, "error": msg }));
    } else {
        eprintln!("Error: {}", msg);
    }
}

struct InvokeArgs {
    schema: PathBuf,
    event: PathBuf,
    gate: GateKind,
    context: FunctionContext,
    verifier_url: Option<String>,
    pretty: bool,
}

fn run_invoke(args: InvokeArgs) -> Result<(), u8> {
    let InvokeArgs {
        schema: schema_path,
        event: event_path,
        gate,
        context,
        verifier_url,
        pretty,
    } = args;

    let schema = load_schema(&schema_path).map_err(|e| {
        eprintln!("Error: loading schema: {}", e);
        e.exit_code() as u8
    })?;

    let event_value = load_json(&event_path).map_err(|e| {
        eprintln!("Error: loading event: {}", e);
        e.exit_code() as u8
    })?;
    let event: Event = serde_json::from_value(event_value).map_err(|e| {
        eprintln!("Error: invalid event: {}", e);
        2u8
    })?;

    let response = match gate {
        GateKind::ApiKey => handle(Gate::ApiKey, &context, &schema, &event),
        GateKind::Token => invoke_with_token(&context, &schema, &event, verifier_url)?,
    };

    println!("{}", to_json(&response, pretty)?);

    if response.is_success() {
        Ok(())
    } else {
        Err(1)
    }
}

#[cfg(feature = "remote")]
fn invoke_with_token(
    context: &FunctionContext,
    schema: &request_guard::SchemaNode,
    event: &Event,
    verifier_url: Option<String>,
) -> Result<request_guard::Response, u8> {
    use request_guard::HttpTokenVerifier;

    let verifier = match verifier_url {
        Some(url) => HttpTokenVerifier::with_base_url(url),
        None => HttpTokenVerifier::new(),
    }
    .map_err(|e| {
        eprintln!("Error: {}", e);
        e.exit_code() as u8
    })?;

    Ok(handle(Gate::Token(&verifier), context, schema, event))
}

#[cfg(not(feature = "remote"))]
fn invoke_with_token(
    _context: &FunctionContext,
    _schema: &request_guard::SchemaNode,
    _event: &Event,
    _verifier_url: Option<String>,
) -> Result<request_guard::Response, u8> {
    eprintln!("Error: token verification requires the 'remote' feature");
    Err(2)
}

fn run_lint(path: &Path, format: &str, strict: bool, quiet: bool) -> Result<(), u8> {
    use request_guard::Severity;

    if !path.exists() {
        eprintln!("Error: path not found: {}", path.display());
        return Err(2);
    }

    let result = lint(path, strict);

    if format == "json" {
        println!("{}", to_json(&result, true)?);
    } else {
        if !quiet {
            println!("Linting {} ...\n", path.display());
        }

        for file_result in &result.results {
            let status_icon = match file_result.status {
                FileStatus::Ok => "\x1b[32m✓\x1b[0m",
                FileStatus::Warning => "\x1b[33m⚠\x1b[0m",
                FileStatus::Error => "\x1b[31m✗\x1b[0m",
            };

            if !quiet || file_result.status != FileStatus::Ok {
                println!("  {} {}", status_icon, file_result.file.display());
            }

            for diag in &file_result.diagnostics {
                let (color, label) = match diag.severity {
                    Severity::Error => ("\x1b[31m", "error"),
                    Severity::Warning => ("\x1b[33m", "warning"),
                };
                if !quiet || diag.severity == Severity::Error {
                    println!(
                        "    {}{}[{}]\x1b[0m: {} - {}",
                        color, label, diag.code, diag.path, diag.message
                    );
                }
            }
        }

        println!();
        if result.is_ok() && (!strict || result.warnings == 0) {
            println!(
                "\x1b[32m✓ {} files checked, all passed\x1b[0m",
                result.files_checked
            );
        } else {
            println!(
                "\x1b[31m✗ {} files checked: {} passed, {} failed ({} errors, {} warnings)\x1b[0m",
                result.files_checked, result.passed, result.failed, result.errors, result.warnings
            );
        }
    }

    if result.is_ok() && (!strict || result.warnings == 0) {
        Ok(())
    } else {
        Err(1)
    }
}
