// Copyright 2025 RustFS Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::statuses::taxonomy::StatusValue;
use crate::statuses::vm::{VmStatusEntry, resolve_all};
use crate::types::snapshot::Inventory;
use comfy_table::Table;
use comfy_table::presets::UTF8_FULL;
use std::path::Path;
use std::pin::Pin;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub mod console;
pub mod statuses;
pub mod types;
pub mod utils;

#[cfg(test)]
mod tests;

shadow_rs::shadow!(build);

/// Output format of the `resolve` command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Yaml,
    Json,
}

/// Initializes logging. `RUST_LOG` wins over `level` when set.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Resolves every VM of the `List` document at `path` and writes the result
/// to `file`, or stdout when no file is given.
pub async fn resolve(
    path: &Path,
    output: OutputFormat,
    file: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let inventory = Inventory::load(path).await?;
    let entries = resolve_all(&inventory);
    info!("resolved {} virtual machines from {}", entries.len(), path.display());

    let rendered = render(&entries, output)?;

    let mut writer: Pin<Box<dyn AsyncWrite + Send>> = if let Some(file) = file {
        Box::pin(
            tokio::fs::OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(file)
                .await?,
        )
    } else {
        Box::pin(tokio::io::stdout())
    };

    writer.write_all(rendered.as_bytes()).await?;
    writer.flush().await?;

    Ok(())
}

pub fn render(
    entries: &[VmStatusEntry],
    output: OutputFormat,
) -> Result<String, types::error::Error> {
    Ok(match output {
        OutputFormat::Yaml => serde_yaml_ng::to_string(entries)?,
        OutputFormat::Json => serde_json::to_string_pretty(entries)? + "\n",
        OutputFormat::Table => render_table(entries),
    })
}

fn render_table(entries: &[VmStatusEntry]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["NAMESPACE", "NAME", "STATUS", "PROGRESS", "MESSAGE"]);

    for entry in entries {
        let bundle = &entry.bundle;
        let detail = [bundle.message.as_deref(), bundle.detailed_message.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" / ");
        table.add_row(vec![
            entry.namespace.clone(),
            entry.name.clone(),
            bundle.status.label().to_owned(),
            bundle
                .progress
                .map(|p| format!("{p}%"))
                .unwrap_or_default(),
            detail,
        ]);
    }

    format!("{table}\n")
}

pub async fn serve(config: console::server::ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    console::server::run(config).await
}
