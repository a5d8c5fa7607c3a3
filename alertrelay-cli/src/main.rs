// Copyright 2025 Sushanth (https://github.com/sushanthpy)
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Alertrelay CLI
//!
//! Replays alerts through the receive pipeline against an in-memory store.

use alertrelay_core::{Alert, MemoryAlertStore};
use alertrelay_plugins::{
    PipelineConfig, PipelineError, PluginPipeline, PluginRegistry, ReceiveOutcome, RegistryRouter,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "alertrelay")]
#[command(about = "Alertrelay - alert plugin pipelines", long_about = None)]
struct Cli {
    /// Pipeline configuration file (TOML, or JSON with a .json extension)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose mode
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run alerts from a JSON file (one alert or an array) through the receive pipeline
    Receive {
        /// Alert file
        file: PathBuf,
    },

    /// Print the effective configuration
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = PipelineConfig::load(cli.config).context("Failed to load configuration")?;

    match cli.command {
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }

        Commands::Receive { file } => {
            let alerts = load_alerts(&file)?;
            let pipeline = build_pipeline(&config)?;
            info!(
                alerts = alerts.len(),
                plugins = ?config.plugins,
                policy = %config.policy(),
                "Replaying alerts"
            );

            let mut failures = 0;
            for alert in alerts {
                let result = pipeline.process_alert(alert);
                if matches!(&result, Err(e) if !e.is_signal()) {
                    failures += 1;
                }
                println!("{}", serde_json::to_string(&report(result))?);
            }

            if failures > 0 {
                anyhow::bail!("{} alert(s) failed processing", failures);
            }
        }
    }

    Ok(())
}

/// Read one alert or an array of alerts.
fn load_alerts(path: &Path) -> Result<Vec<Alert>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read alert file {:?}", path))?;
    let value: Value = serde_json::from_str(&content).context("Alert file is not valid JSON")?;

    let alerts = match value {
        Value::Array(items) => items
            .into_iter()
            .map(serde_json::from_value)
            .collect::<Result<Vec<Alert>, _>>(),
        single => serde_json::from_value(single).map(|alert| vec![alert]),
    };
    alerts.context("Invalid alert")
}

fn build_pipeline(config: &PipelineConfig) -> Result<PluginPipeline> {
    let registry = Arc::new(PluginRegistry::with_builtins(config)?);
    let router = RegistryRouter::from_config(registry, config);
    Ok(PluginPipeline::new(
        Arc::new(router),
        Arc::new(MemoryAlertStore::new()),
        config.policy(),
    ))
}

fn report(result: Result<ReceiveOutcome, PipelineError>) -> Value {
    match result {
        Ok(outcome) => json!({
            "status": "ok",
            "lifecycle": outcome.lifecycle,
            "suppressed": outcome.suppressed,
            "alert": outcome.alert,
        }),
        Err(e) => json!({
            "status": "error",
            "code": e.status_code(),
            "message": e.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn alert_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_load_single_and_array() {
        let single = alert_file(r#"{"resource": "web01", "event": "HttpError"}"#);
        let alerts = load_alerts(single.path()).unwrap();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].environment, "Production");

        let many = alert_file(
            r#"[{"resource": "web01", "event": "HttpError"}, {"resource": "db01", "event": "DiskFull"}]"#,
        );
        assert_eq!(load_alerts(many.path()).unwrap().len(), 2);
    }

    #[test]
    fn test_load_rejects_invalid_alert() {
        let file = alert_file(r#"{"event": "HttpError"}"#);
        assert!(load_alerts(file.path()).is_err());
    }

    #[test]
    fn test_report_shapes() {
        let config = PipelineConfig {
            plugins: vec!["reject".into()],
            ..PipelineConfig::default()
        };
        let pipeline = build_pipeline(&config).unwrap();

        let rejected = report(pipeline.process_alert(Alert::new("web01", "HttpError")));
        assert_eq!(rejected["status"], "error");
        assert_eq!(rejected["code"], 403);

        let accepted = report(pipeline.process_alert(Alert::new("web01", "HttpError").with_service("Web")));
        assert_eq!(accepted["status"], "ok");
        assert_eq!(accepted["lifecycle"], "created");
    }
}
