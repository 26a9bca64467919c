//! mkproj CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid arguments
//! - 4: Template error

use std::fmt;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, Event, Subscriber};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::{FmtContext, FormatEvent, FormatFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{prelude::*, EnvFilter};

use mkproj_templates::TemplateError;

mod commands;

use commands::{Cli, UsageError};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_ARGS: u8 = 2;
    pub const TEMPLATE_ERROR: u8 = 4;
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match &cli.list {
        Some(target) => commands::list::execute(&cli, target),
        None => commands::create::execute(&cli),
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(categorize_error(&e))
        }
    }
}

/// Log to stderr with `ERROR: ` / `WARN: ` style prefixes. `RUST_LOG` wins
/// over the defaults.
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "warn,mkproj_templates=debug,mkproj_cli=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let log_result = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(PrefixFormat)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init();

    if log_result.is_err() {
        // Logging already initialized, continue
    }
}

/// Event format printing `LEVEL: message fields`.
struct PrefixFormat;

impl<S, N> FormatEvent<S, N> for PrefixFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(writer, "{}: ", event.metadata().level())?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    if e.downcast_ref::<UsageError>().is_some() {
        return ExitCodes::INVALID_ARGS;
    }
    match e.chain().find_map(|cause| cause.downcast_ref::<TemplateError>()) {
        Some(err) if err.is_lookup() => ExitCodes::INVALID_ARGS,
        Some(_) => ExitCodes::TEMPLATE_ERROR,
        None => ExitCodes::GENERAL_ERROR,
    }
}
