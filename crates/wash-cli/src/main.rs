//! # Carwash
//!
//! Command-line booking client for the carwash service.
//!
//! ## Usage
//!
//! ```bash
//! export CARWASH_API_BASE_URL=https://api.example.com/
//!
//! carwash login 0501234567
//! carwash verify 0501234567 123456
//! carwash cart
//! carwash book 42 --agree-terms --lock
//! carwash orders
//! ```

use clap::Parser;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    cli::Cli::parse().run().await
}

fn print_banner() {
    eprintln!(
        r#"
  🚗 Carwash
  ━━━━━━━━━━━━━━━━━━━━━━━
  Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
