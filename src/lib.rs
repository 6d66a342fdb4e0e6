//
// Copyright 2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

//! # anyformat — one dump/load API over many serialization formats
//!
//! The crate is organized in layers:
//!
//! - **[`value`]**: the dynamic [`Value`] tree all backends operate on
//! - **[`registry`]**: the class registry, format registry, and extension
//!   resolver behind one [`Registry`] service object
//! - **[`codec`]**: the marker codec wrapping registered types into a
//!   self-describing two-field map and back
//! - **[`traverse`]**: the generic tree walker with a replaceable dispatch
//!   table, used by backends without native custom-type hooks
//! - **[`formats`]**: the built-in, feature-gated backend adapters
//! - **[`api`]**: free functions over the process-wide default registry,
//!   re-exported at the crate root

pub mod api;
pub mod codec;
pub mod error;
pub mod formats;
pub mod registry;
pub mod traverse;
pub mod value;

pub use api::{
    dump, dump_path, dumps, load, load_path, loads, register_class, register_format,
    register_unavailable, register_unavailable_package, registry,
};
pub use error::{Error, Result};
pub use registry::{ClassRegistration, Format, FormatSpec, Registry};
pub use value::{CustomValue, Value};

