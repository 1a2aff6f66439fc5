//! Leavedesk MCP Server Binary
//!
//! This is the entry point for running the Leavedesk MCP server.
//!
//! ## Usage
//!
//! ```bash
//! # Run with the built-in sample roster
//! leavedesk-mcp
//!
//! # Run with a custom employee roster
//! LEAVEDESK_ROSTER=/etc/leavedesk/roster.toml leavedesk-mcp
//!
//! # Adjust log verbosity (diagnostics go to stderr; stdout is the transport)
//! RUST_LOG=leavedesk_core=debug,leavedesk_mcp=debug leavedesk-mcp
//! ```

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use leavedesk_core::{
    AuditCategory, AuditEvent, AuditOutcome, AuditSink, EmployeeDirectory, LeaveLedger,
    TracingAuditSink,
};
use leavedesk_mcp::LeaveMcpServer;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the MCP stdio transport; all diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Leavedesk MCP Server");

    let directory = match std::env::var("LEAVEDESK_ROSTER") {
        Ok(path) => {
            info!(path = %path, "Loading employee roster");
            EmployeeDirectory::load(&path)
                .with_context(|| format!("loading employee roster from `{path}`"))?
        }
        Err(_) => {
            info!("No roster configured, using the built-in sample roster");
            EmployeeDirectory::seeded()
        }
    };

    let audit: Arc<dyn AuditSink> = Arc::new(TracingAuditSink);
    audit.emit(
        AuditEvent::new(
            None,
            None,
            "server.started",
            AuditCategory::System,
            "leavedesk-mcp",
            AuditOutcome::Success,
        )
        .with_metadata("employees", directory.len().to_string()),
    );

    let ledger = Arc::new(LeaveLedger::new(Arc::new(directory), audit));
    let server = LeaveMcpServer::new(ledger);

    server.run_stdio().await?;

    Ok(())
}
