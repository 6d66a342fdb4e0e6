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

//! Format bundles: a named set of dump/load operations.
//!
//! A [`FormatSpec`] is what an adapter hands to
//! [`Registry::register_format`](crate::Registry::register_format): the
//! format name plus whichever of the four operations the backend naturally
//! provides. Registration turns it into a fully populated [`Format`] by an
//! explicit synthesis step:
//!
//! - a missing stream operation is derived from the buffer one (write the
//!   whole buffer at once / read the whole stream before decoding), and vice
//!   versa;
//! - a direction with neither operation gets a pair that fails with
//!   [`Error::NotImplemented`] naming the format, so a placeholder
//!   registration is still a *known* format, distinguishable from an unknown
//!   one.
//!
//! Every operation receives the owning [`Registry`] as an explicit context
//! argument; adapters reach the encode/decode core through it rather than
//! through any global state.

use crate::error::{Error, Result};
use crate::registry::{ClassRegistration, Registry};
use crate::value::Value;
use std::fmt;
use std::io::{Read, Write};
use std::sync::Arc;

/// Buffer-dump operation: serialize a value to bytes.
pub type DumpsFn = Arc<dyn Fn(&Registry, &Value) -> Result<Vec<u8>> + Send + Sync>;
/// Stream-dump operation: serialize a value into a writer.
pub type DumpFn = Arc<dyn Fn(&Registry, &Value, &mut dyn Write) -> Result<()> + Send + Sync>;
/// Buffer-load operation: deserialize a value from bytes.
pub type LoadsFn = Arc<dyn Fn(&Registry, &[u8]) -> Result<Value> + Send + Sync>;
/// Stream-load operation: deserialize a value from a reader.
pub type LoadFn = Arc<dyn Fn(&Registry, &mut dyn Read) -> Result<Value> + Send + Sync>;
/// Callback invoked once per registered class, for backends needing
/// per-type setup.
pub type ClassHookFn = Arc<dyn Fn(&ClassRegistration) + Send + Sync>;

/// How a format's file extension is determined at registration time.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
enum ExtensionRule {
    /// Use the part of the format name before the first `:` separator.
    #[default]
    Derive,
    /// Do not associate the format with any extension.
    Suppress,
    /// Use the given extension verbatim.
    Named(String),
}

/// Declarative description of a format, as supplied by a backend adapter.
///
/// # Examples
///
/// ```rust
/// use anyformat::{FormatSpec, Registry, Value};
///
/// let registry = Registry::new();
/// registry.register_format(
///     FormatSpec::new("upper")
///         .with_dumps(|_, value| match value {
///             Value::Str(s) => Ok(s.to_uppercase().into_bytes()),
///             _ => Ok(b"?".to_vec()),
///         })
///         .with_loads(|_, bytes| {
///             Ok(Value::Str(String::from_utf8_lossy(bytes).into_owned()))
///         }),
/// )?;
///
/// // The stream forms were synthesized from the buffer forms.
/// let mut buffer = Vec::new();
/// registry.dump(&Value::from("hi"), &mut buffer, "upper")?;
/// assert_eq!(buffer, b"HI");
/// # anyformat::Result::<()>::Ok(())
/// ```
pub struct FormatSpec {
    pub(crate) name: String,
    extension: ExtensionRule,
    dumps: Option<DumpsFn>,
    dump: Option<DumpFn>,
    loads: Option<LoadsFn>,
    load: Option<LoadFn>,
    class_hook: Option<ClassHookFn>,
}

impl FormatSpec {
    /// Starts a spec for the named format.
    ///
    /// A `:` in the name separates a base format from a sub-variant (for
    /// example `json:pretty`); by default the extension is derived from the
    /// part before the separator, so variants share their base's extension.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extension: ExtensionRule::Derive,
            dumps: None,
            dump: None,
            loads: None,
            load: None,
            class_hook: None,
        }
    }

    /// Supplies the buffer-dump operation.
    pub fn with_dumps<F>(mut self, f: F) -> Self
    where
        F: Fn(&Registry, &Value) -> Result<Vec<u8>> + Send + Sync + 'static,
    {
        self.dumps = Some(Arc::new(f));
        self
    }

    /// Supplies the stream-dump operation.
    pub fn with_dump<F>(mut self, f: F) -> Self
    where
        F: Fn(&Registry, &Value, &mut dyn Write) -> Result<()> + Send + Sync + 'static,
    {
        self.dump = Some(Arc::new(f));
        self
    }

    /// Supplies the buffer-load operation.
    pub fn with_loads<F>(mut self, f: F) -> Self
    where
        F: Fn(&Registry, &[u8]) -> Result<Value> + Send + Sync + 'static,
    {
        self.loads = Some(Arc::new(f));
        self
    }

    /// Supplies the stream-load operation.
    pub fn with_load<F>(mut self, f: F) -> Self
    where
        F: Fn(&Registry, &mut dyn Read) -> Result<Value> + Send + Sync + 'static,
    {
        self.load = Some(Arc::new(f));
        self
    }

    /// Overrides the derived file extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = ExtensionRule::Named(extension.into());
        self
    }

    /// Leaves the format without any extension association.
    pub fn without_extension(mut self) -> Self {
        self.extension = ExtensionRule::Suppress;
        self
    }

    /// Supplies the class-registration hook.
    ///
    /// The hook is called once for every class already registered at format
    /// registration time, and again for every class registered afterwards.
    pub fn with_class_hook<F>(mut self, f: F) -> Self
    where
        F: Fn(&ClassRegistration) + Send + Sync + 'static,
    {
        self.class_hook = Some(Arc::new(f));
        self
    }

    /// Resolves the extension this spec will claim, if any.
    pub(crate) fn resolve_extension(&self) -> Option<String> {
        match &self.extension {
            ExtensionRule::Derive => Some(
                self.name
                    .split(':')
                    .next()
                    .unwrap_or(&self.name)
                    .to_string(),
            ),
            ExtensionRule::Suppress => None,
            ExtensionRule::Named(ext) => Some(ext.clone()),
        }
    }

    /// Synthesizes the missing operations, producing a complete [`Format`].
    pub(crate) fn build(self) -> Format {
        let extension = self.resolve_extension();
        let name = self.name;

        let (dump, dumps): (DumpFn, DumpsFn) = match (self.dump, self.dumps) {
            (Some(dump), Some(dumps)) => (dump, dumps),
            (Some(dump), None) => {
                let from_stream = dump.clone();
                let dumps: DumpsFn = Arc::new(move |registry, value| {
                    let mut buffer = Vec::new();
                    from_stream(registry, value, &mut buffer)?;
                    Ok(buffer)
                });
                (dump, dumps)
            }
            (None, Some(dumps)) => {
                let from_buffer = dumps.clone();
                let dump: DumpFn = Arc::new(move |registry, value, writer| {
                    let bytes = from_buffer(registry, value)?;
                    writer.write_all(&bytes)?;
                    Ok(())
                });
                (dump, dumps)
            }
            (None, None) => {
                let raiser_name = name.clone();
                let dump: DumpFn = Arc::new(move |_, _, _| {
                    Err(Error::NotImplemented {
                        format: raiser_name.clone(),
                        operation: "dump/dumps",
                    })
                });
                let raiser_name = name.clone();
                let dumps: DumpsFn = Arc::new(move |_, _| {
                    Err(Error::NotImplemented {
                        format: raiser_name.clone(),
                        operation: "dump/dumps",
                    })
                });
                (dump, dumps)
            }
        };

        let (load, loads): (LoadFn, LoadsFn) = match (self.load, self.loads) {
            (Some(load), Some(loads)) => (load, loads),
            (Some(load), None) => {
                let from_stream = load.clone();
                let loads: LoadsFn = Arc::new(move |registry, bytes| {
                    let mut reader = bytes;
                    from_stream(registry, &mut reader)
                });
                (load, loads)
            }
            (None, Some(loads)) => {
                let from_buffer = loads.clone();
                let load: LoadFn = Arc::new(move |registry, reader| {
                    let mut bytes = Vec::new();
                    reader.read_to_end(&mut bytes)?;
                    from_buffer(registry, &bytes)
                });
                (load, loads)
            }
            (None, None) => {
                let raiser_name = name.clone();
                let load: LoadFn = Arc::new(move |_, _| {
                    Err(Error::NotImplemented {
                        format: raiser_name.clone(),
                        operation: "load/loads",
                    })
                });
                let raiser_name = name.clone();
                let loads: LoadsFn = Arc::new(move |_, _| {
                    Err(Error::NotImplemented {
                        format: raiser_name.clone(),
                        operation: "load/loads",
                    })
                });
                (load, loads)
            }
        };

        let class_hook = self.class_hook.unwrap_or_else(|| Arc::new(|_| {}));

        Format {
            name,
            extension,
            dump,
            dumps,
            load,
            loads,
            class_hook,
        }
    }
}

impl fmt::Debug for FormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatSpec")
            .field("name", &self.name)
            .field("extension", &self.extension)
            .field("has_dumps", &self.dumps.is_some())
            .field("has_dump", &self.dump.is_some())
            .field("has_loads", &self.loads.is_some())
            .field("has_load", &self.load.is_some())
            .finish()
    }
}

/// A registered format: all four operations populated, plus the class hook.
///
/// Handles are cheap to clone (the operations are shared), so lookups hand
/// out clones and no registry lock is held while a backend runs.
#[derive(Clone)]
pub struct Format {
    name: String,
    extension: Option<String>,
    dump: DumpFn,
    dumps: DumpsFn,
    load: LoadFn,
    loads: LoadsFn,
    class_hook: ClassHookFn,
}

impl Format {
    /// The format's registered name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The file extension this format asked for, if any.
    ///
    /// Note that another format may have claimed the extension first; the
    /// extension resolver, not this field, is authoritative for inference.
    #[must_use]
    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// Serializes a value to bytes.
    ///
    /// # Errors
    ///
    /// [`Error::NotImplemented`] for a placeholder format, otherwise
    /// whatever the backend reports.
    pub fn dumps(&self, registry: &Registry, value: &Value) -> Result<Vec<u8>> {
        (self.dumps)(registry, value)
    }

    /// Serializes a value into a writer.
    ///
    /// # Errors
    ///
    /// As [`Format::dumps`], plus I/O errors from the writer.
    pub fn dump(&self, registry: &Registry, value: &Value, writer: &mut dyn Write) -> Result<()> {
        (self.dump)(registry, value, writer)
    }

    /// Deserializes a value from bytes.
    ///
    /// # Errors
    ///
    /// [`Error::NotImplemented`] for a placeholder format, otherwise
    /// whatever the backend reports.
    pub fn loads(&self, registry: &Registry, bytes: &[u8]) -> Result<Value> {
        (self.loads)(registry, bytes)
    }

    /// Deserializes a value from a reader.
    ///
    /// # Errors
    ///
    /// As [`Format::loads`], plus I/O errors from the reader.
    pub fn load(&self, registry: &Registry, reader: &mut dyn Read) -> Result<Value> {
        (self.load)(registry, reader)
    }

    /// Invokes the class hook for one registration.
    pub(crate) fn notify_class(&self, class: &ClassRegistration) {
        (self.class_hook)(class);
    }
}

impl fmt::Debug for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Format")
            .field("name", &self.name)
            .field("extension", &self.extension)
            .finish_non_exhaustive()
    }
}

/// A format that is known by name but unusable in this environment.
#[derive(Clone, Debug)]
pub(crate) struct Unavailable {
    pub(crate) message: String,
}
