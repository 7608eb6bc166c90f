//! File logging
//!
//! The terminal belongs to the UI, so log records go to
//! `~/.virtual-lab-tui/virtual-lab.log`. Filter with `VLAB_LOG`
//! (`EnvFilter` syntax, default `virtual_lab_tui=info`).

use anyhow::{Context, Result};
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const LOG_FILE: &str = "virtual-lab.log";

pub fn init(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))
        .context("opening log file")?;

    let filter = EnvFilter::try_from_env("VLAB_LOG")
        .unwrap_or_else(|_| EnvFilter::new("virtual_lab_tui=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .context("installing tracing subscriber")?;

    Ok(())
}
