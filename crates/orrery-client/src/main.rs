//! Orrery-Live Client
//!
//! Browser entry point: reads the page configuration, sets up logging,
//! joins the room and runs the Bevy app on the page canvas.
//!
//! This crate is WASM-only. Use `trunk build` or `cargo check --target wasm32-unknown-unknown`.

#[cfg(not(target_arch = "wasm32"))]
compile_error!(
    "orrery-client only supports wasm32 target. Use: cargo check -p orrery-client --target wasm32-unknown-unknown"
);

mod app;
mod config;
mod error;
mod network;
mod panels;

use orrery_core::OrreryConfig;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_web::MakeWebConsoleWriter;

fn main() {
    console_error_panic_hook::set_once();

    let (config, config_error) = match config::load_config() {
        Ok(config) => (config, None),
        Err(e) => (OrreryConfig::default(), Some(e)),
    };

    let filter = EnvFilter::try_new(&config.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new())
        .with_filter(filter);

    // No performance layer: Bevy emits hundreds of spans per frame.
    tracing_subscriber::registry().with(fmt_layer).init();

    if let Some(e) = config_error {
        tracing::warn!("[orrery] falling back to default config: {}", e);
    }

    app::run(config);
}
