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

//! The registry service object: classes, formats, and extensions.
//!
//! A [`Registry`] owns the three tables the whole system runs on:
//!
//! - the **class table**, mapping a user type (by `TypeId` and by identity
//!   string) to its converter pair;
//! - the **format table**, mapping a format name to its operation bundle,
//!   with a sibling table of known-but-unavailable formats;
//! - the **extension table**, mapping a lowercased file extension to the
//!   format that claimed it first.
//!
//! Backend adapters self-register against an explicit registry instance
//! rather than against module globals, so tests can build isolated
//! registries while the facade keeps a process-wide default one.
//!
//! Registration follows a one-way lifecycle: formats and classes are only
//! ever added (classes may be overwritten per type; formats may not), never
//! removed.

mod class;
mod format;

pub use class::ClassRegistration;
pub use format::{ClassHookFn, DumpFn, DumpsFn, Format, FormatSpec, LoadFn, LoadsFn};

pub(crate) use format::Unavailable;

use crate::error::{Error, Result};
use crate::value::{CustomValue, Value};
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, trace};

#[derive(Default)]
struct Inner {
    formats: HashMap<String, Format>,
    unavailable: HashMap<String, Unavailable>,
    by_extension: HashMap<String, String>,
    classes: Vec<Arc<ClassRegistration>>,
    by_type: HashMap<TypeId, usize>,
    by_identity: HashMap<String, usize>,
}

/// The shared registry of classes, formats, and extensions.
///
/// Safe to share across threads; lookups take a read lock and release it
/// before any backend operation runs. Registration is expected to happen
/// during process initialization — later registrations are legal but the
/// caller is responsible for sequencing them against concurrent use.
///
/// # Examples
///
/// ```rust
/// use anyformat::{Registry, Value};
///
/// let registry = Registry::with_default_formats()?;
/// let bytes = registry.dumps(&Value::Int(42), "json")?;
/// assert_eq!(registry.loads(&bytes, "json")?, Value::Int(42));
/// # anyformat::Result::<()>::Ok(())
/// ```
#[derive(Default)]
pub struct Registry {
    inner: RwLock<Inner>,
}

impl Registry {
    /// Creates an empty registry with no formats and no classes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-populated with every compiled backend adapter.
    ///
    /// Backends whose cargo feature is disabled are recorded as unavailable
    /// rather than omitted.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateFormat`] cannot actually occur on a fresh registry;
    /// the `Result` exists because registration is fallible in general.
    pub fn with_default_formats() -> Result<Self> {
        let registry = Self::new();
        crate::formats::register_defaults(&registry)?;
        Ok(registry)
    }

    // ------------------------------------------------------------------
    // Class registration
    // ------------------------------------------------------------------

    /// Registers a custom type with its `to_plain`/`from_plain` converter
    /// pair, making it serializable by every format.
    ///
    /// Re-registering the same type replaces its converters. Every already
    /// registered format's class hook is invoked with the new registration;
    /// formats registered later replay the hook themselves.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use anyformat::{Error, Registry, Value};
    ///
    /// #[derive(Debug, Clone, PartialEq)]
    /// struct Celsius(i64);
    ///
    /// let registry = Registry::with_default_formats()?;
    /// registry.register_class(
    ///     |c: &Celsius| Value::Int(c.0),
    ///     |v: Value| {
    ///         v.as_i64()
    ///             .map(Celsius)
    ///             .ok_or_else(|| Error::reconstruct("Celsius", "expected an integer"))
    ///     },
    /// );
    ///
    /// let value = Value::custom(Celsius(21));
    /// let bytes = registry.dumps(&value, "json")?;
    /// assert_eq!(registry.loads(&bytes, "json")?, value);
    /// # anyformat::Result::<()>::Ok(())
    /// ```
    pub fn register_class<T, F, G>(&self, to_plain: F, from_plain: G)
    where
        T: Any + fmt::Debug + Clone + PartialEq + Send + Sync,
        F: Fn(&T) -> Value + Send + Sync + 'static,
        G: Fn(Value) -> Result<T> + Send + Sync + 'static,
    {
        let registration = Arc::new(ClassRegistration::new(to_plain, from_plain));
        let identity = registration.identity().to_string();

        let formats: Vec<Format> = {
            let mut inner = self.inner.write();
            // `registration` is an `Arc`, so a plain `.type_id()` would
            // resolve to `Any::type_id` on the `Arc` itself; qualify the
            // call to reach the registration's own key.
            let type_id = ClassRegistration::type_id(&registration);
            match inner.by_type.get(&type_id).copied() {
                Some(index) => inner.classes[index] = registration.clone(),
                None => {
                    let index = inner.classes.len();
                    inner.by_type.insert(type_id, index);
                    inner.by_identity.insert(identity.clone(), index);
                    inner.classes.push(registration.clone());
                }
            }
            inner.formats.values().cloned().collect()
        };

        debug!(class = %identity, "registered class");

        // Hooks run outside the lock so they may call back into the registry.
        for format in formats {
            format.notify_class(&registration);
        }
    }

    /// Finds the registration for a live custom value, if its type was
    /// registered. Misses are not errors.
    pub fn class_for(&self, value: &dyn CustomValue) -> Option<Arc<ClassRegistration>> {
        let inner = self.inner.read();
        let index = *inner.by_type.get(&value.as_any().type_id())?;
        Some(inner.classes[index].clone())
    }

    /// Finds a registration by its exact identity string.
    pub fn class_by_identity(&self, identity: &str) -> Option<Arc<ClassRegistration>> {
        let inner = self.inner.read();
        let index = *inner.by_identity.get(identity)?;
        Some(inner.classes[index].clone())
    }

    // ------------------------------------------------------------------
    // Format registration and lookup
    // ------------------------------------------------------------------

    /// Registers a format from its spec.
    ///
    /// Missing operations are synthesized (see [`FormatSpec`]); the derived
    /// or explicit extension is claimed in the extension table only if no
    /// earlier format claimed it; the format's class hook is immediately
    /// replayed against every class registered so far.
    ///
    /// # Errors
    ///
    /// [`Error::DuplicateFormat`] if the name is taken — formats are
    /// immutable once registered, unlike classes.
    pub fn register_format(&self, spec: FormatSpec) -> Result<()> {
        let format = spec.build();
        let name = format.name().to_string();
        let extension = format.extension().map(str::to_string);

        let classes: Vec<Arc<ClassRegistration>> = {
            let mut inner = self.inner.write();
            if inner.formats.contains_key(&name) {
                return Err(Error::DuplicateFormat { name });
            }
            if let Some(ext) = &extension {
                inner
                    .by_extension
                    .entry(ext.to_ascii_lowercase())
                    .or_insert_with(|| name.clone());
            }
            inner.formats.insert(name.clone(), format.clone());
            inner.classes.clone()
        };

        debug!(format = %name, extension = ?extension, "registered format");

        // Replay outside the lock; see register_class.
        for class in classes {
            format.notify_class(&class);
        }
        Ok(())
    }

    /// Records a format as known but unusable, with a human-readable reason.
    ///
    /// The format still claims its derived extension under the usual
    /// first-registration-wins rule, so extension inference resolves to it
    /// and then reports *why* it cannot be used instead of claiming the
    /// format does not exist.
    pub fn register_unavailable(&self, name: &str, message: impl Into<String>) {
        let message = message.into();
        let extension = name.split(':').next().unwrap_or(name).to_string();
        {
            let mut inner = self.inner.write();
            inner.unavailable.insert(
                name.to_string(),
                Unavailable {
                    message: message.clone(),
                },
            );
            inner
                .by_extension
                .entry(extension.to_ascii_lowercase())
                .or_insert_with(|| name.to_string());
        }
        debug!(format = %name, %message, "registered unavailable format");
    }

    /// Records a format as unusable because a backend crate is missing.
    pub fn register_unavailable_package(&self, name: &str, package: &str) {
        self.register_unavailable(
            name,
            format!("this serialization format requires the {package} crate"),
        );
    }

    /// Looks up a format by name, distinguishing unknown from unavailable.
    ///
    /// # Errors
    ///
    /// [`Error::UnavailableFormat`] with the recorded reason if the format
    /// is known but unusable; [`Error::UnknownFormat`] with the list of
    /// valid names otherwise.
    pub fn format(&self, name: &str) -> Result<Format> {
        let inner = self.inner.read();
        if let Some(format) = inner.formats.get(name) {
            return Ok(format.clone());
        }
        if let Some(unavailable) = inner.unavailable.get(name) {
            return Err(Error::UnavailableFormat {
                name: name.to_string(),
                message: unavailable.message.clone(),
            });
        }
        let mut known: Vec<String> = inner.formats.keys().cloned().collect();
        known.sort();
        Err(Error::UnknownFormat {
            name: name.to_string(),
            known,
        })
    }

    /// Resolves a file extension to the format name that claimed it.
    ///
    /// Matching is case-insensitive and tolerates a leading `.`.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownExtension`] with the list of claimed extensions.
    pub fn format_for_extension(&self, extension: &str) -> Result<String> {
        let key = extension.trim_start_matches('.').to_ascii_lowercase();
        let inner = self.inner.read();
        if let Some(name) = inner.by_extension.get(&key) {
            return Ok(name.clone());
        }
        let mut known: Vec<String> = inner.by_extension.keys().cloned().collect();
        known.sort();
        Err(Error::UnknownExtension {
            extension: key,
            known,
        })
    }

    /// The names of all usable formats, sorted.
    #[must_use]
    pub fn format_names(&self) -> Vec<String> {
        let inner = self.inner.read();
        let mut names: Vec<String> = inner.formats.keys().cloned().collect();
        names.sort();
        names
    }

    /// The names of all recorded unavailable formats, sorted.
    #[must_use]
    pub fn unavailable_format_names(&self) -> Vec<String> {
        let inner = self.inner.read();
        let mut names: Vec<String> = inner.unavailable.keys().cloned().collect();
        names.sort();
        names
    }

    // ------------------------------------------------------------------
    // Dump / load orchestration
    // ------------------------------------------------------------------

    /// Serializes a value to bytes using the named format.
    ///
    /// # Errors
    ///
    /// Format resolution errors, then whatever the backend reports.
    pub fn dumps(&self, value: &Value, fmt: &str) -> Result<Vec<u8>> {
        trace!(format = %fmt, "dumps");
        self.format(fmt)?.dumps(self, value)
    }

    /// Serializes a value into a caller-supplied writer.
    ///
    /// The format must be named explicitly: a bare stream carries no
    /// extension to infer it from. The writer's lifecycle stays with the
    /// caller.
    ///
    /// # Errors
    ///
    /// Format resolution errors, backend errors, and writer I/O errors.
    pub fn dump(&self, value: &Value, writer: &mut dyn Write, fmt: &str) -> Result<()> {
        trace!(format = %fmt, "dump");
        self.format(fmt)?.dump(self, value, writer)
    }

    /// Serializes a value to a file, inferring the format from the path's
    /// extension when `fmt` is `None`.
    ///
    /// The file is created (truncating any previous content) and closed on
    /// every exit path, including backend failures.
    ///
    /// # Errors
    ///
    /// Extension or format resolution errors, backend errors, and file I/O
    /// errors.
    pub fn dump_path(&self, value: &Value, path: &Path, fmt: Option<&str>) -> Result<()> {
        let fmt = match fmt {
            Some(fmt) => fmt.to_string(),
            None => self.format_for_extension(extension_of(path))?,
        };
        trace!(format = %fmt, path = %path.display(), "dump_path");
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        self.dump(value, &mut writer, &fmt)?;
        writer.flush()?;
        Ok(())
    }

    /// Deserializes a value from bytes using the named format.
    ///
    /// # Errors
    ///
    /// Format resolution errors, then whatever the backend reports.
    pub fn loads(&self, bytes: &[u8], fmt: &str) -> Result<Value> {
        trace!(format = %fmt, "loads");
        self.format(fmt)?.loads(self, bytes)
    }

    /// Deserializes a value from a caller-supplied reader.
    ///
    /// The format must be named explicitly, mirroring [`Registry::dump`].
    ///
    /// # Errors
    ///
    /// Format resolution errors, backend errors, and reader I/O errors.
    pub fn load(&self, reader: &mut dyn Read, fmt: &str) -> Result<Value> {
        trace!(format = %fmt, "load");
        self.format(fmt)?.load(self, reader)
    }

    /// Deserializes a value from a file, inferring the format from the
    /// path's extension when `fmt` is `None`.
    ///
    /// # Errors
    ///
    /// Extension or format resolution errors, backend errors, and file I/O
    /// errors.
    pub fn load_path(&self, path: &Path, fmt: Option<&str>) -> Result<Value> {
        let fmt = match fmt {
            Some(fmt) => fmt.to_string(),
            None => self.format_for_extension(extension_of(path))?,
        };
        trace!(format = %fmt, path = %path.display(), "load_path");
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        self.load(&mut reader, &fmt)
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("Registry")
            .field("formats", &inner.formats.len())
            .field("unavailable", &inner.unavailable.len())
            .field("classes", &inner.classes.len())
            .finish()
    }
}

fn extension_of(path: &Path) -> &str {
    path.extension().and_then(OsStr::to_str).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Point {
        x: i64,
        y: i64,
    }

    fn register_point(registry: &Registry) {
        registry.register_class(
            |p: &Point| Value::Tuple(vec![Value::Int(p.x), Value::Int(p.y)]),
            |v: Value| {
                let items = v
                    .into_vec()
                    .ok_or_else(|| Error::reconstruct("Point", "expected a sequence"))?;
                match items.as_slice() {
                    [Value::Int(x), Value::Int(y)] => Ok(Point { x: *x, y: *y }),
                    _ => Err(Error::reconstruct("Point", "expected two integers")),
                }
            },
        );
    }

    #[test]
    fn test_class_lookup_by_type_and_identity() {
        let registry = Registry::new();
        register_point(&registry);

        let point = Point { x: 1, y: 2 };
        let registration = registry.class_for(&point).unwrap();
        assert!(registration.identity().ends_with("Point"));
        assert!(registry
            .class_by_identity(registration.identity())
            .is_some());
        assert!(registry.class_by_identity("nope").is_none());
    }

    #[test]
    fn test_class_reregistration_overwrites() {
        let registry = Registry::new();
        register_point(&registry);

        // Replace the converters; the identity stays the same.
        registry.register_class(
            |_: &Point| Value::Str("replaced".to_string()),
            |_: Value| Ok(Point { x: 0, y: 0 }),
        );

        let registration = registry.class_for(&Point { x: 5, y: 6 }).unwrap();
        assert_eq!(
            registration.to_plain(&Point { x: 5, y: 6 }),
            Value::Str("replaced".to_string())
        );
    }

    #[test]
    fn test_duplicate_format_is_rejected_and_first_wins() {
        let registry = Registry::new();
        registry
            .register_format(
                FormatSpec::new("echo").with_dumps(|_, _| Ok(b"first".to_vec())),
            )
            .unwrap();

        let err = registry
            .register_format(
                FormatSpec::new("echo").with_dumps(|_, _| Ok(b"second".to_vec())),
            )
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateFormat { .. }));

        let bytes = registry.dumps(&Value::Null, "echo").unwrap();
        assert_eq!(bytes, b"first");
    }

    #[test]
    fn test_extension_first_registration_wins() {
        let registry = Registry::new();
        registry
            .register_format(FormatSpec::new("alpha").with_extension("data"))
            .unwrap();
        registry
            .register_format(FormatSpec::new("beta").with_extension("data"))
            .unwrap();

        assert_eq!(registry.format_for_extension("data").unwrap(), "alpha");
        // The loser is still addressable by explicit name.
        assert!(registry.format("beta").is_ok());
    }

    #[test]
    fn test_extension_lookup_is_case_insensitive_and_strips_dot() {
        let registry = Registry::new();
        registry
            .register_format(FormatSpec::new("alpha").with_extension("data"))
            .unwrap();

        assert_eq!(registry.format_for_extension(".DATA").unwrap(), "alpha");
        assert_eq!(registry.format_for_extension("Data").unwrap(), "alpha");
    }

    #[test]
    fn test_unknown_vs_unavailable() {
        let registry = Registry::new();
        registry.register_unavailable_package("msgpack", "rmp-serde");

        let err = registry.format("msgpack").unwrap_err();
        assert!(matches!(err, Error::UnavailableFormat { .. }));
        assert!(err.to_string().contains("rmp-serde"));

        let err = registry.format("xml").unwrap_err();
        assert!(matches!(err, Error::UnknownFormat { .. }));
    }

    #[test]
    fn test_unavailable_format_still_claims_extension() {
        let registry = Registry::new();
        registry.register_unavailable_package("msgpack", "rmp-serde");
        assert_eq!(
            registry.format_for_extension("msgpack").unwrap(),
            "msgpack"
        );
    }

    #[test]
    fn test_class_hook_fires_for_classes_registered_later() {
        use std::sync::Mutex;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let registry = Registry::new();

        let sink = seen.clone();
        registry
            .register_format(FormatSpec::new("hooked").with_class_hook(move |class| {
                sink.lock().unwrap().push(class.identity().to_string());
            }))
            .unwrap();

        register_point(&registry);
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].ends_with("Point"));
    }

    #[test]
    fn test_class_hook_replays_for_classes_registered_earlier() {
        use std::sync::Mutex;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let registry = Registry::new();
        register_point(&registry);

        let sink = seen.clone();
        registry
            .register_format(FormatSpec::new("hooked").with_class_hook(move |class| {
                sink.lock().unwrap().push(class.identity().to_string());
            }))
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(seen[0].ends_with("Point"));
    }

    #[test]
    fn test_format_names_are_sorted() {
        let registry = Registry::new();
        registry.register_format(FormatSpec::new("zeta")).unwrap();
        registry.register_format(FormatSpec::new("alpha")).unwrap();
        assert_eq!(registry.format_names(), vec!["alpha", "zeta"]);
    }
}
