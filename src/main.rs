// Copyright 2024 RustFS Team
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

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vm_status::console::server::ServerConfig;
use vm_status::{OutputFormat, build, init_logging, resolve, serve};

#[derive(Parser)]
#[command(name = "vm-status")]
#[command(about = "Kubevirt virtual machine status CLI", long_about = None)]
#[command(version = build::PKG_VERSION, long_version = build::CLAP_LONG_VERSION)]
struct Cli {
    /// Log filter, e.g. "info" or "vm_status=debug". RUST_LOG takes precedence.
    #[arg(long, global = true, env = "VM_STATUS_LOG", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve the status of every VM in a resource list
    Resolve {
        /// YAML or JSON file with a Kubernetes List (e.g. `kubectl get -o yaml`)
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,

        /// Optional output path. If not set, the output will be written to stdout.
        #[arg(long)]
        out_file: Option<String>,
    },

    /// Run the console API server
    Serve {
        #[arg(short, long, env = "VM_STATUS_PORT", default_value_t = 9090)]
        port: u16,

        /// Origin allowed to call the API from a browser
        #[arg(long, env = "VM_STATUS_ALLOWED_ORIGIN")]
        allowed_origin: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Commands::Resolve {
            file,
            output,
            out_file,
        } => resolve(&file, output, out_file).await?,
        Commands::Serve {
            port,
            allowed_origin,
        } => {
            serve(ServerConfig {
                port,
                allowed_origin,
            })
            .await?
        }
    }

    Ok(())
}
