//! Runtime subsystem registry
//!
//! Holds the subsystems of an app by feature-set name. An entry is either an
//! instance registered up front, a deferred initializer that runs on first
//! access, or a placeholder for a soft requirement that is not part of the
//! project. Deferred entries are constructed at most once and cached.
//!
//! ```
//! use std::sync::Arc;
//! use appgen_generation::SubsystemRegistry;
//!
//! struct Audio { volume: u8 }
//!
//! let registry = SubsystemRegistry::new();
//! registry.register_deferred("audio", |_| Ok(Arc::new(Audio { volume: 7 }))).unwrap();
//! registry.register_unavailable("vr").unwrap();
//!
//! let audio = registry.get::<Audio>("audio").unwrap().unwrap();
//! assert_eq!(audio.volume, 7);
//! assert!(registry.get::<Audio>("vr").unwrap().is_none());
//! ```

use std::{
    any::{type_name, Any},
    collections::HashMap,
    sync::{Arc, OnceLock},
    thread::{self, ThreadId},
};

use appgen_ordering::InitOrder;
use parking_lot::{Condvar, Mutex, RwLock};
use tracing::{debug, info};

use crate::feature_sets::FeatureSetCatalog;

/// Errors raised while looking up or constructing subsystems
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Nothing is registered under this name
    #[error("Subsystem not registered: {name}")]
    NotRegistered {
        /// Requested name
        name: String,
    },

    /// The name is taken
    #[error("Subsystem already registered: {name}")]
    AlreadyRegistered {
        /// Duplicate name
        name: String,
    },

    /// The subsystem exists but has another type
    #[error("Subsystem '{name}' is a {actual}, not a {expected}")]
    TypeMismatch {
        /// Requested name
        name: String,
        /// Type the caller asked for
        expected: &'static str,
        /// Type that was registered
        actual: &'static str,
    },

    /// An initializer failed
    #[error("Failed to construct subsystem '{name}': {message}")]
    Construction {
        /// Subsystem being constructed
        name: String,
        /// Cause of the failure
        message: String,
    },

    /// An initializer asked for its own subsystem
    #[error("Subsystem '{name}' was requested while it was being constructed")]
    Reentrant {
        /// Subsystem being constructed
        name: String,
    },
}

impl RegistryError {
    /// Construction failure for `name`, for use inside initializers
    pub fn construction(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Construction {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Result of registry operations
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

type Instance = Arc<dyn Any + Send + Sync>;
type Initializer = Box<dyn Fn(&SubsystemRegistry) -> RegistryResult<Instance> + Send + Sync>;

enum Slot {
    Ready(Instance),
    Deferred {
        initializer: Initializer,
        instance: OnceLock<Instance>,
    },
    Unavailable,
}

struct Entry {
    type_name: &'static str,
    slot: Slot,
}

/// Deferred constructions in flight, shared by all threads
#[derive(Default)]
struct InFlight {
    /// Subsystem name to the thread running its initializer
    owners: HashMap<String, ThreadId>,
    /// Thread to the subsystem it is waiting for
    waiting: HashMap<ThreadId, String>,
}

impl InFlight {
    /// Whether `thread` waiting for `name` would close a wait-for cycle
    fn would_deadlock(&self, thread: ThreadId, name: &str) -> bool {
        let mut current = name;
        for _ in 0..=self.waiting.len() {
            let Some(owner) = self.owners.get(current) else {
                return false;
            };
            if *owner == thread {
                return true;
            }
            match self.waiting.get(owner) {
                Some(next) => current = next,
                None => return false,
            }
        }
        false
    }
}

/// Releases a construction claim, even if the initializer panics
struct Claim<'r> {
    registry: &'r SubsystemRegistry,
    name: &'r str,
}

impl Drop for Claim<'_> {
    fn drop(&mut self) {
        self.registry.in_flight.lock().owners.remove(self.name);
        self.registry.finished.notify_all();
    }
}

/// Subsystems keyed by feature-set name
pub struct SubsystemRegistry {
    entries: RwLock<HashMap<String, Arc<Entry>>>,
    in_flight: Mutex<InFlight>,
    finished: Condvar,
}

impl SubsystemRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            in_flight: Mutex::new(InFlight::default()),
            finished: Condvar::new(),
        }
    }

    fn insert(&self, name: String, entry: Entry) -> RegistryResult<()> {
        let mut entries = self.entries.write();
        if entries.contains_key(&name) {
            return Err(RegistryError::AlreadyRegistered { name });
        }
        debug!(subsystem = %name, kind = entry.type_name, "Registered subsystem");
        entries.insert(name, Arc::new(entry));
        Ok(())
    }

    /// Registers an already constructed subsystem
    pub fn register_instance<T>(
        &self,
        name: impl Into<String>,
        instance: Arc<T>,
    ) -> RegistryResult<()>
    where
        T: Send + Sync + 'static,
    {
        self.insert(
            name.into(),
            Entry {
                type_name: type_name::<T>(),
                slot: Slot::Ready(instance),
            },
        )
    }

    /// Registers a subsystem built on first access
    ///
    /// The initializer receives the registry so it can fetch the subsystems
    /// it depends on. Only one thread runs an initializer at a time; others
    /// asking for the same subsystem wait for its result. A request that
    /// would wait on itself, directly or through other threads, fails with
    /// [`RegistryError::Reentrant`] instead of blocking.
    pub fn register_deferred<T, F>(
        &self,
        name: impl Into<String>,
        initializer: F,
    ) -> RegistryResult<()>
    where
        T: Send + Sync + 'static,
        F: Fn(&SubsystemRegistry) -> RegistryResult<Arc<T>> + Send + Sync + 'static,
    {
        let initializer: Initializer =
            Box::new(move |registry: &SubsystemRegistry| -> RegistryResult<Instance> {
                let instance = initializer(registry)?;
                Ok(instance as Instance)
            });

        self.insert(
            name.into(),
            Entry {
                type_name: type_name::<T>(),
                slot: Slot::Deferred {
                    initializer,
                    instance: OnceLock::new(),
                },
            },
        )
    }

    /// Registers a name whose subsystem is known to be absent
    pub fn register_unavailable(&self, name: impl Into<String>) -> RegistryResult<()> {
        self.insert(
            name.into(),
            Entry {
                type_name: "unavailable",
                slot: Slot::Unavailable,
            },
        )
    }

    /// Marks every soft requirement missing from `catalog` as unavailable
    ///
    /// Names that are already registered are left alone. Returns how many
    /// placeholders were added.
    pub fn register_missing_soft_requirements(
        &self,
        catalog: &FeatureSetCatalog,
    ) -> RegistryResult<usize> {
        let mut added = 0;
        for name in catalog.missing_soft_requirements() {
            if self.contains(&name) {
                continue;
            }
            self.register_unavailable(name)?;
            added += 1;
        }
        Ok(added)
    }

    fn entry(&self, name: &str) -> RegistryResult<Arc<Entry>> {
        self.entries
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::NotRegistered {
                name: name.to_string(),
            })
    }

    /// Fetches a subsystem without knowing its type
    ///
    /// `Ok(None)` means the name is registered as unavailable.
    pub fn get_any(&self, name: &str) -> RegistryResult<Option<Instance>> {
        let entry = self.entry(name)?;

        match &entry.slot {
            Slot::Ready(instance) => Ok(Some(instance.clone())),
            Slot::Unavailable => Ok(None),
            Slot::Deferred {
                initializer,
                instance,
            } => {
                if let Some(existing) = instance.get() {
                    return Ok(Some(existing.clone()));
                }
                self.construct(name, initializer, instance).map(Some)
            }
        }
    }

    fn construct(
        &self,
        name: &str,
        initializer: &Initializer,
        instance: &OnceLock<Instance>,
    ) -> RegistryResult<Instance> {
        let me = thread::current().id();
        let mut in_flight = self.in_flight.lock();
        loop {
            if let Some(existing) = instance.get() {
                return Ok(existing.clone());
            }
            match in_flight.owners.get(name).copied() {
                None => break,
                Some(owner) if owner == me => {
                    return Err(RegistryError::Reentrant {
                        name: name.to_string(),
                    })
                }
                Some(_) if in_flight.would_deadlock(me, name) => {
                    return Err(RegistryError::Reentrant {
                        name: name.to_string(),
                    })
                }
                Some(_) => {
                    in_flight.waiting.insert(me, name.to_string());
                    self.finished.wait(&mut in_flight);
                    in_flight.waiting.remove(&me);
                }
            }
        }
        in_flight.owners.insert(name.to_string(), me);
        drop(in_flight);

        let result = {
            let _claim = Claim {
                registry: self,
                name,
            };
            initializer(self).map(|built| instance.get_or_init(|| built).clone())
        };

        match result {
            Ok(built) => {
                debug!(subsystem = %name, "Constructed subsystem");
                Ok(built)
            }
            Err(RegistryError::Construction { name: failed, message }) if failed == name => {
                Err(RegistryError::Construction { name: failed, message })
            }
            Err(source) => Err(RegistryError::construction(name, source.to_string())),
        }
    }

    /// Fetches a subsystem as `T`, constructing it if needed
    ///
    /// # Errors
    ///
    /// [`RegistryError::NotRegistered`] for unknown names,
    /// [`RegistryError::TypeMismatch`] when the subsystem is not a `T`, and
    /// [`RegistryError::Construction`] when its initializer fails.
    pub fn get<T>(&self, name: &str) -> RegistryResult<Option<Arc<T>>>
    where
        T: Send + Sync + 'static,
    {
        let Some(instance) = self.get_any(name)? else {
            return Ok(None);
        };

        instance.downcast::<T>().map(Some).map_err(|_| RegistryError::TypeMismatch {
            name: name.to_string(),
            expected: type_name::<T>(),
            actual: self.entry(name).map(|e| e.type_name).unwrap_or("unknown"),
        })
    }

    /// Constructs every subsystem in `order`
    ///
    /// Stops at the first failure; subsystems built before it stay cached.
    pub fn initialize_all(&self, order: &InitOrder) -> RegistryResult<()> {
        for name in order {
            self.get_any(name)?;
        }
        info!(subsystems = order.len(), "Initialized subsystems");
        Ok(())
    }

    /// Whether `name` has a live instance
    pub fn is_initialized(&self, name: &str) -> bool {
        let Ok(entry) = self.entry(name) else {
            return false;
        };
        match &entry.slot {
            Slot::Ready(_) => true,
            Slot::Deferred { instance, .. } => instance.get().is_some(),
            Slot::Unavailable => false,
        }
    }

    /// Whether `name` is registered as unavailable
    pub fn is_unavailable(&self, name: &str) -> bool {
        self.entry(name)
            .map(|entry| matches!(entry.slot, Slot::Unavailable))
            .unwrap_or(false)
    }

    /// Whether `name` is registered at all
    pub fn contains(&self, name: &str) -> bool {
        self.entries.read().contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.entries.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered names
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for SubsystemRegistry {
    fn default() -> Self {
        Self::new()
    }
}
