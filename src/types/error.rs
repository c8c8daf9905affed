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

use snafu::Snafu;
use std::path::PathBuf;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum Error {
    #[snafu(display("failed to read '{}': {}", path.display(), source))]
    ReadSnapshot {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("yaml error: {}", source))]
    Yaml { source: serde_yaml_ng::Error },

    #[snafu(display("item {} has no kind", index))]
    MissingKind { index: usize },

    #[snafu(display("cannot decode {} '{}': {}", kind, name, source))]
    DecodeItem {
        kind: String,
        name: String,
        source: serde_json::Error,
    },

    #[snafu(display("unknown status '{}'", key))]
    UnknownStatusKey { key: String },

    #[snafu(display("serde_json error: {}", source))]
    SerdeJson { source: serde_json::Error },
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Error::SerdeJson { source }
    }
}

impl From<serde_yaml_ng::Error> for Error {
    fn from(source: serde_yaml_ng::Error) -> Self {
        Error::Yaml { source }
    }
}
