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

//! Kubevirt, CDI and V2V custom resources, reduced to the fields the status
//! engine reads. Every status field is optional so partially populated
//! objects still deserialize.

pub mod condition;
pub mod data_volume;
pub mod migration;
pub mod vm;
pub mod vm_import;
pub mod vmi;
