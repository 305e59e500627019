use std::{fs, path::PathBuf};

use clap::Parser;
use crossbeam_channel::bounded;
use eframe::egui;
use serde::Deserialize;

mod backend_bridge;
mod controller;
mod ui;

use backend_bridge::commands::BackendCommand;
use backend_bridge::runtime::{self, StoreSettings};
use controller::events::UiEvent;
use ui::DashboardApp;

#[derive(Debug, Parser)]
#[command(name = "kursmanager", about = "Kursmanager – Verwaltungssystem für Kursprogramme")]
struct Cli {
    /// Base URL of the record store gateway.
    #[arg(long)]
    base_url: Option<String>,

    /// API token sent with every store request.
    #[arg(long)]
    api_token: Option<String>,

    /// Explicit settings file; replaces the default lookup locations.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    base_url: Option<String>,
    api_token: Option<String>,
}

fn settings_file_candidates(explicit: Option<&PathBuf>) -> Vec<PathBuf> {
    if let Some(path) = explicit {
        return vec![path.clone()];
    }
    let mut candidates = vec![PathBuf::from("kursmanager.toml")];
    if let Some(config_dir) = dirs::config_dir() {
        candidates.push(config_dir.join("kursmanager").join("kursmanager.toml"));
    }
    candidates
}

/// Defaults, then the first settings file found, then environment, then CLI
/// flags. Later sources win.
fn load_settings(cli: &Cli) -> StoreSettings {
    let mut settings = StoreSettings {
        base_url: "http://127.0.0.1:8420/gateway".to_string(),
        api_token: "dev-token".to_string(),
    };

    for path in settings_file_candidates(cli.config.as_ref()) {
        let Ok(raw) = fs::read_to_string(&path) else {
            continue;
        };
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.base_url {
                    settings.base_url = v;
                }
                if let Some(v) = file_cfg.api_token {
                    settings.api_token = v;
                }
                tracing::info!(path = %path.display(), "loaded settings file");
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), "ignoring unreadable settings file: {err}");
            }
        }
        break;
    }

    if let Ok(v) = std::env::var("KURSMANAGER_BASE_URL") {
        settings.base_url = v;
    }
    if let Ok(v) = std::env::var("KURSMANAGER_API_TOKEN") {
        settings.api_token = v;
    }

    if let Some(v) = &cli.base_url {
        settings.base_url = v.clone();
    }
    if let Some(v) = &cli.api_token {
        settings.api_token = v.clone();
    }

    settings
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let cli = Cli::parse();
    let settings = load_settings(&cli);
    tracing::info!(base_url = %settings.base_url, "starting kursmanager dashboard");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(256);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(2048);
    runtime::launch(settings, cmd_rx, ui_tx);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Kursmanager")
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([980.0, 640.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Kursmanager",
        options,
        Box::new(|cc| {
            let persisted = DashboardApp::restore(cc.storage);
            Ok(Box::new(DashboardApp::new(cmd_tx, ui_rx, persisted)))
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_config_replaces_the_default_lookup() {
        let explicit = PathBuf::from("/tmp/custom.toml");
        let candidates = settings_file_candidates(Some(&explicit));
        assert_eq!(candidates, vec![explicit]);

        let default = settings_file_candidates(None);
        assert_eq!(default[0], PathBuf::from("kursmanager.toml"));
    }

    #[test]
    fn settings_file_fields_are_optional() {
        let parsed: FileSettings =
            toml::from_str("base_url = \"https://records.example/gateway\"").expect("parse");
        assert_eq!(
            parsed.base_url.as_deref(),
            Some("https://records.example/gateway")
        );
        assert_eq!(parsed.api_token, None);
    }

    #[test]
    fn cli_flags_override_everything() {
        let cli = Cli::try_parse_from([
            "kursmanager",
            "--base-url",
            "https://records.example/gateway",
            "--api-token",
            "cli-token",
        ])
        .expect("parse cli");
        let settings = load_settings(&cli);
        assert_eq!(settings.base_url, "https://records.example/gateway");
        assert_eq!(settings.api_token, "cli-token");
    }
}
