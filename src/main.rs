//! virtual-lab - NCERT science labs in the terminal
//!
//! This is the main entry point for the virtual-lab-tui application.
//! It uses the Component Architecture pattern from ratatui.

mod action;
mod app;
mod component;
mod components;
mod config;
mod error;
mod logging;
mod model;
mod services;
mod tui;

use crate::action::Action;
use crate::app::App;
use crate::component::Component;
use crate::config::Config;
use crate::model::Catalog;
use crate::tui::Tui;
use anyhow::{Context, Result};
use crossterm::event::{Event, KeyCode, KeyModifiers};
use std::path::Path;
use std::time::Duration;

fn main() -> Result<()> {
    if let Some(dir) = Config::config_dir() {
        if let Err(err) = logging::init(&dir) {
            eprintln!("Logging disabled: {:#}", err);
        }
    }

    let config = Config::load().unwrap_or_else(|| {
        let config = Config::default();
        // First run: write the defaults so there is a file to edit
        if Config::config_path().is_some_and(|path| !path.exists()) {
            if let Err(err) = config.save() {
                tracing::warn!(error = %err, "could not write default config");
            }
        }
        config
    });

    // Catalog errors are fatal; report them before touching the terminal
    let catalog = match load_catalog(&config) {
        Ok(catalog) => catalog,
        Err(err) => {
            tracing::error!(error = %format!("{:#}", err), "catalog failed to load");
            eprintln!("Error: {:#}", err);
            std::process::exit(1);
        }
    };

    let mut tui = Tui::new()?.with_tick_rate(Duration::from_millis(100));
    tui.enter()?;

    let mut app = App::new(catalog, config);
    let result = app.init().and_then(|_| run_app(&mut tui, &mut app));

    tui.exit()?;
    tracing::info!("app exited");

    if let Err(err) = result {
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    Ok(())
}

fn load_catalog(config: &Config) -> Result<Catalog> {
    match config.catalog_path.as_deref() {
        Some(path) => {
            tracing::info!(path, "loading catalog override");
            Catalog::load(Path::new(path))
                .with_context(|| format!("failed to load catalog from {}", path))
        }
        None => Catalog::embedded().context("embedded catalog is invalid"),
    }
}

/// Run the main application loop
fn run_app(tui: &mut Tui, app: &mut App) -> Result<()> {
    while !app.should_quit {
        tui.draw(|frame| {
            if let Err(e) = app.draw(frame, frame.area()) {
                tracing::error!(error = %e, "draw failed");
            }
        })?;

        if let Some(url) = app.pending_open_url.take() {
            open_media(tui, app, &url)?;
            continue;
        }

        if let Some(event) = tui.next_event()? {
            let action = match event {
                Event::Key(key)
                    if key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL) =>
                {
                    Some(Action::ForceQuit)
                }
                Event::Key(key) => app.handle_key_event(key)?,
                Event::Resize(w, h) => Some(Action::Resize(w, h)),
                _ => None,
            };

            // Action might produce a follow-up action
            let mut current_action = action;
            while let Some(a) = current_action {
                current_action = app.update(a)?;
            }
        } else {
            // No event - send a tick for time-based updates
            let mut current_action = Some(Action::Tick);
            while let Some(a) = current_action {
                current_action = app.update(a)?;
            }
        }
    }

    Ok(())
}

/// Hand the resolved video URL to the system opener with the terminal released
fn open_media(tui: &mut Tui, app: &mut App, url: &str) -> Result<()> {
    tui.suspend()?;
    let result = services::open_url(url);
    tui.resume()?;

    match result {
        Ok(()) => tracing::info!(url, "media opened"),
        Err(e) => {
            tracing::warn!(url, error = %e, "failed to open media");
            app.status_message = Some(format!("Could not open video: {}", e));
        }
    }
    Ok(())
}
