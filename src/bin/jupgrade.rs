//! Binary entry point for the jupgrade CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Convert every *Test.java under src/test in place
//! jupgrade convert src/test
//!
//! # Preview the changes as unified diffs, JSON report
//! jupgrade convert --dry-run --format json src/test/java/FooTest.java
//!
//! # Print the effective rule tables
//! jupgrade rules --rules my-rules.json
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use jupgrade::batch::BatchOptions;
use jupgrade::cli::{batch_outcome, run_convert, run_rules};
use jupgrade::convert::{CombinedWrapPolicy, ConvertOptions};
use jupgrade_core::error::{JupError, OutputErrorCode};
use jupgrade_core::output::{emit_response, ErrorResponse};

// ============================================================================
// CLI Structure
// ============================================================================

/// Rewrite JUnit 4 test sources to JUnit 5.
#[derive(Parser, Debug)]
#[command(name = "jupgrade", version, about = "Rewrite JUnit 4 test sources to JUnit 5")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Log level (overridden by RUST_LOG).
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Output format for the convert command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    /// One line per file plus totals (default).
    #[default]
    Text,
    /// Full JSON report.
    Json,
}

/// What to do with a `@Test` carrying both `timeout` and `expected`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum CombinedWrap {
    /// Two wrap statements, each around the original body (default).
    #[default]
    Sibling,
    /// The `expected` wrap encloses the `timeout` wrap.
    Nested,
}

impl From<CombinedWrap> for CombinedWrapPolicy {
    fn from(wrap: CombinedWrap) -> Self {
        match wrap {
            CombinedWrap::Sibling => CombinedWrapPolicy::Sibling,
            CombinedWrap::Nested => CombinedWrapPolicy::Nested,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert test sources in place.
    Convert {
        /// Files or directories to convert.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Report what would change, with diffs, without writing.
        #[arg(long)]
        dry_run: bool,

        /// File name glob to select (repeatable, default: *Test.java).
        #[arg(long = "include", value_name = "GLOB")]
        include: Vec<String>,

        /// JSON file overriding the built-in rule tables.
        #[arg(long, value_name = "FILE")]
        rules: Option<PathBuf>,

        /// Do not synthesize @DisplayName annotations.
        #[arg(long)]
        no_display_names: bool,

        /// Layout for methods with both timeout and expected.
        #[arg(long, value_enum, default_value_t = CombinedWrap::Sibling)]
        combined_wrap: CombinedWrap,

        /// Report format.
        #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
        format: ReportFormat,
    },
    /// Print the effective rule tables as JSON.
    Rules {
        /// JSON file overriding the built-in rule tables.
        #[arg(long, value_name = "FILE")]
        rules: Option<PathBuf>,
    },
}

// ============================================================================
// Main
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::from_error(&err);
            // Best effort: if stdout is gone there is nowhere left to report.
            let _ = emit_response(&response, &mut io::stdout());
            ExitCode::from(error_code.code())
        }
    }
}

fn init_tracing(level: LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn execute(cli: Cli) -> Result<(), JupError> {
    match cli.command {
        Command::Convert {
            paths,
            dry_run,
            include,
            rules,
            no_display_names,
            combined_wrap,
            format,
        } => {
            let options = BatchOptions {
                dry_run,
                convert: ConvertOptions {
                    display_names: !no_display_names,
                    combined_wrap: combined_wrap.into(),
                },
            };
            execute_convert(&paths, &include, rules, &options, format)
        }
        Command::Rules { rules } => {
            let response = run_rules(rules.as_deref())?;
            emit_response(&response, &mut io::stdout())
                .map_err(|e| JupError::internal(format!("cannot write output: {}", e)))
        }
    }
}

// ============================================================================
// Command Executors
// ============================================================================

fn execute_convert(
    paths: &[PathBuf],
    include: &[String],
    rules: Option<PathBuf>,
    options: &BatchOptions,
    format: ReportFormat,
) -> Result<(), JupError> {
    let report = run_convert(paths, include, rules.as_deref(), options)?;
    let mut stdout = io::stdout();
    let written = match format {
        ReportFormat::Json => emit_response(&report, &mut stdout),
        ReportFormat::Text => stdout.write_all(report.render_text().as_bytes()),
    };
    written.map_err(|e| JupError::internal(format!("cannot write output: {}", e)))?;
    batch_outcome(&report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn convert_flags_parse() {
        let cli = Cli::try_parse_from([
            "jupgrade",
            "--log-level",
            "debug",
            "convert",
            "--dry-run",
            "--include",
            "*IT.java",
            "--include",
            "*Test.java",
            "--no-display-names",
            "--combined-wrap",
            "nested",
            "--format",
            "json",
            "src/test",
        ])
        .unwrap();
        assert_eq!(cli.global.log_level, LogLevel::Debug);
        match cli.command {
            Command::Convert {
                paths,
                dry_run,
                include,
                no_display_names,
                combined_wrap,
                format,
                ..
            } => {
                assert_eq!(paths, vec![PathBuf::from("src/test")]);
                assert!(dry_run);
                assert_eq!(include.len(), 2);
                assert!(no_display_names);
                assert_eq!(combined_wrap, CombinedWrap::Nested);
                assert_eq!(format, ReportFormat::Json);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn convert_requires_a_path() {
        assert!(Cli::try_parse_from(["jupgrade", "convert"]).is_err());
    }

    #[test]
    fn rules_subcommand() {
        let cli = Cli::try_parse_from(["jupgrade", "rules"]).unwrap();
        assert!(matches!(cli.command, Command::Rules { rules: None }));
        assert_eq!(cli.global.log_level, LogLevel::Warn);
    }
}
