//! Engine type registry.

use crate::engines;
use crate::{EngineContext, EngineDescriptor, StorageEngine, layered_sort};
use medialoom_core::EngineInstance;
use medialoom_error::{EngineError, EngineErrorKind, MedialoomResult};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Resolved ordering constraints of one engine type.
#[derive(Debug, Clone, Default, PartialEq, Eq, derive_getters::Getters)]
pub struct EngineConstraints {
    /// Types this type parses before
    try_before: BTreeSet<String>,
    /// Types this type parses after
    try_after: BTreeSet<String>,
}

/// All known engine types.
///
/// Plugins add types at runtime with [`register`](EngineRegistry::register).
/// The constraint graph is kept acyclic: a registration that would close a
/// cycle is rejected and leaves the registry unchanged.
#[derive(Debug, Clone, Default)]
pub struct EngineRegistry {
    descriptors: BTreeMap<String, EngineDescriptor>,
}

impl EngineRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the built-in engine catalogue.
    pub fn with_builtin_engines() -> MedialoomResult<Self> {
        let mut registry = Self::new();
        for descriptor in engines::builtin_descriptors() {
            registry.register(descriptor)?;
        }
        Ok(registry)
    }

    /// Register a new engine type.
    ///
    /// # Errors
    ///
    /// - `DuplicateEngineType` if the tag is taken
    /// - `CircularDependency` if the new constraints close a cycle
    #[tracing::instrument(skip(self, descriptor), fields(engine_type = descriptor.engine_type()))]
    pub fn register(&mut self, descriptor: EngineDescriptor) -> MedialoomResult<()> {
        let engine_type = descriptor.engine_type().to_string();
        if self.descriptors.contains_key(&engine_type) {
            return Err(EngineError::new(EngineErrorKind::DuplicateEngineType(engine_type)).into());
        }

        self.descriptors.insert(engine_type.clone(), descriptor);
        let all: BTreeSet<String> = self.descriptors.keys().cloned().collect();
        if let Err(stuck) = layered_sort(&all, &self.dependency_graph(&all)) {
            self.descriptors.remove(&engine_type);
            tracing::warn!(stuck = ?stuck, "Rejected engine type, ordering would be circular");
            return Err(EngineError::new(EngineErrorKind::CircularDependency(stuck)).into());
        }

        tracing::debug!("Registered engine type");
        Ok(())
    }

    /// Look up a descriptor.
    pub fn get(&self, engine_type: &str) -> Option<&EngineDescriptor> {
        self.descriptors.get(engine_type)
    }

    /// All registered descriptors ordered by type tag.
    pub fn descriptors(&self) -> impl Iterator<Item = &EngineDescriptor> {
        self.descriptors.values()
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Expand a type or family name into registered type tags.
    fn expand(&self, name: &str) -> BTreeSet<String> {
        self.descriptors
            .values()
            .filter(|d| d.engine_type() == name || d.in_family(name))
            .map(|d| d.engine_type().to_string())
            .collect()
    }

    /// Resolved try-before/try-after sets of a type, families expanded.
    ///
    /// # Errors
    ///
    /// Fails with `UnknownEngineType` for unregistered tags.
    pub fn constraints(&self, engine_type: &str) -> MedialoomResult<EngineConstraints> {
        let descriptor = self.get(engine_type).ok_or_else(|| {
            EngineError::new(EngineErrorKind::UnknownEngineType(engine_type.to_string()))
        })?;
        let resolve = |names: &[String]| -> BTreeSet<String> {
            names
                .iter()
                .flat_map(|name| self.expand(name))
                .filter(|t| t != engine_type)
                .collect()
        };
        Ok(EngineConstraints {
            try_before: resolve(descriptor.try_before_names()),
            try_after: resolve(descriptor.try_after_names()),
        })
    }

    /// Dependency edges among `types`: `graph[t]` must all precede `t`.
    ///
    /// `A try_before B` makes A a dependency of B; `A try_after B` makes B a
    /// dependency of A. Edges touching types outside `types` are dropped.
    pub fn dependency_graph(&self, types: &BTreeSet<String>) -> BTreeMap<String, BTreeSet<String>> {
        let mut graph: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for engine_type in types {
            let Ok(constraints) = self.constraints(engine_type) else {
                continue;
            };
            for later in constraints.try_before() {
                if types.contains(later) {
                    graph
                        .entry(later.clone())
                        .or_default()
                        .insert(engine_type.clone());
                }
            }
            for earlier in constraints.try_after() {
                if types.contains(earlier) {
                    graph
                        .entry(engine_type.clone())
                        .or_default()
                        .insert(earlier.clone());
                }
            }
        }
        graph
    }

    /// Build engines for the enabled instances.
    ///
    /// Instances of unregistered types, and instances whose settings fail
    /// to build, are skipped with a warning.
    pub fn instantiate(
        &self,
        instances: &[EngineInstance],
        context: &EngineContext,
    ) -> MedialoomResult<Vec<Arc<dyn StorageEngine>>> {
        let enabled: Vec<EngineInstance> =
            instances.iter().filter(|i| *i.enabled()).cloned().collect();
        self.instantiate_all(&enabled, context)
    }

    /// Build engines for every instance, enabled or not.
    ///
    /// Used when cleaning up files whose engine has since been disabled.
    pub fn instantiate_all(
        &self,
        instances: &[EngineInstance],
        context: &EngineContext,
    ) -> MedialoomResult<Vec<Arc<dyn StorageEngine>>> {
        let mut engines = Vec::with_capacity(instances.len());
        for instance in instances {
            match self.get(instance.engine_type()) {
                Some(descriptor) => match descriptor.build(instance.clone(), context) {
                    Ok(engine) => engines.push(engine),
                    Err(e) => tracing::warn!(
                        engine_id = instance.id(),
                        engine_type = %instance.engine_type(),
                        error = %e,
                        "Skipping engine with invalid settings"
                    ),
                },
                None => tracing::warn!(
                    engine_id = instance.id(),
                    engine_type = %instance.engine_type(),
                    "Skipping instance of unknown engine type"
                ),
            }
        }
        Ok(engines)
    }

    /// Validate adding a new instance of `engine_type`.
    ///
    /// # Errors
    ///
    /// - `UnknownEngineType` for unregistered tags
    /// - `SingletonViolation` if the type is a singleton and `existing`
    ///   already holds an instance of it
    pub fn check_new_instance(
        &self,
        existing: &[EngineInstance],
        engine_type: &str,
    ) -> MedialoomResult<&EngineDescriptor> {
        let descriptor = self.get(engine_type).ok_or_else(|| {
            EngineError::new(EngineErrorKind::UnknownEngineType(engine_type.to_string()))
        })?;
        if descriptor.is_singleton() && existing.iter().any(|i| i.engine_type() == engine_type) {
            return Err(
                EngineError::new(EngineErrorKind::SingletonViolation(engine_type.to_string()))
                    .into(),
            );
        }
        Ok(descriptor)
    }
}
