//! `rpc-certify` - Conformance test harness for JSON-RPC 2.0 HTTP servers

use clap::Parser;

use rpc_certify::cli::args::Cli;
use rpc_certify::cli::commands;
use rpc_certify::error::{CertifyError, ExitCode};
use rpc_certify::observability::init_logging;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // `--help` and `--version` arrive here too, on stdout.
            let code = if e.use_stderr() {
                ExitCode::USAGE_ERROR
            } else {
                ExitCode::SUCCESS
            };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    if !cli.quiet {
        init_logging(cli.log_format, cli.verbose, cli.color);
    }

    // Exit on the first SIGINT or SIGTERM.
    tokio::spawn(async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => std::process::exit(ExitCode::INTERRUPTED),
                    _ = sigterm.recv() => std::process::exit(ExitCode::TERMINATED),
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to register SIGTERM handler");
                if tokio::signal::ctrl_c().await.is_ok() {
                    std::process::exit(ExitCode::INTERRUPTED);
                }
            }
        }
    });

    let result = commands::dispatch(cli).await;

    match result {
        Ok(()) => std::process::exit(ExitCode::SUCCESS),
        Err(e) => {
            // The report already describes each failing case.
            if !matches!(e, CertifyError::Conformance { .. }) {
                eprintln!("error: {e}");
            }
            std::process::exit(e.exit_code());
        }
    }
}
