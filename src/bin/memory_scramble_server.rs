//! CLI entry point (spec §4.10), mirroring the shape of the teacher's server
//! binary: parse args, init tracing, load the initial board, serve.

use std::net::SocketAddr;

use clap::Parser;
use memory_scramble::boardfile;
use memory_scramble::server::{build_router, AppState};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "memory_scramble_server")]
struct Args {
    /// Address to bind the HTTP server to.
    #[arg(long, env = "MEMORY_SCRAMBLE_BIND", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Path to the board file to load at startup.
    #[arg(long, env = "MEMORY_SCRAMBLE_BOARD", default_value = "board.txt")]
    board: String,

    /// Emit structured JSON logs instead of the default human-readable format.
    #[arg(long, env = "MEMORY_SCRAMBLE_JSON_LOGS", default_value_t = false)]
    json_logs: bool,
}

fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        fmt().with_env_filter(env_filter).json().init();
    } else {
        fmt().with_env_filter(env_filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.json_logs);

    tracing::info!(board = %args.board, bind = %args.bind, "starting memory scramble server");

    let board = boardfile::parse_board_file(&args.board).await?;
    let state = AppState::new(board, args.board.clone().into());
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(args.bind).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_on_ctrl_c())
        .await?;

    Ok(())
}

async fn shutdown_on_ctrl_c() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install ctrl-c handler");
    }
    tracing::info!("shutting down");
}
