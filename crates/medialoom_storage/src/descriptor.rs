//! Engine type descriptors.

use crate::{EngineContext, StorageEngine};
use medialoom_core::EngineInstance;
use medialoom_error::MedialoomResult;
use std::fmt;
use std::sync::Arc;

/// Builds an engine object from a stored instance.
pub type EngineFactory = Arc<
    dyn Fn(EngineInstance, &EngineContext) -> MedialoomResult<Arc<dyn StorageEngine>>
        + Send
        + Sync,
>;

/// Everything the registry knows about one engine type.
///
/// `try_before` and `try_after` name other engine types or engine families
/// and are used purely for ordering. A descriptor is immutable once
/// registered.
///
/// # Examples
///
/// ```
/// use medialoom_storage::{EngineDescriptor, engines::RemoteUrlStorage};
/// use std::sync::Arc;
///
/// let descriptor = EngineDescriptor::new("mirror_urls", "Mirror URLs", |instance, _ctx| {
///     Ok(Arc::new(RemoteUrlStorage::new(instance)) as _)
/// })
/// .singleton()
/// .try_after("embed");
///
/// assert!(descriptor.is_singleton());
/// assert_eq!(descriptor.try_after_names(), ["embed"]);
/// ```
#[derive(Clone)]
pub struct EngineDescriptor {
    engine_type: String,
    default_name: String,
    singleton: bool,
    families: Vec<String>,
    try_before: Vec<String>,
    try_after: Vec<String>,
    default_data: serde_json::Value,
    factory: EngineFactory,
}

impl EngineDescriptor {
    /// Describe a non-singleton engine type with no ordering constraints.
    pub fn new<F>(engine_type: impl Into<String>, default_name: impl Into<String>, factory: F) -> Self
    where
        F: Fn(EngineInstance, &EngineContext) -> MedialoomResult<Arc<dyn StorageEngine>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            engine_type: engine_type.into(),
            default_name: default_name.into(),
            singleton: false,
            families: Vec::new(),
            try_before: Vec::new(),
            try_after: Vec::new(),
            default_data: serde_json::Value::Object(serde_json::Map::new()),
            factory: Arc::new(factory),
        }
    }

    /// Allow only one instance of this type.
    pub fn singleton(mut self) -> Self {
        self.singleton = true;
        self
    }

    /// Add this type to an engine family.
    pub fn family(mut self, family: impl Into<String>) -> Self {
        self.families.push(family.into());
        self
    }

    /// Parse before the named type or family.
    pub fn try_before(mut self, name: impl Into<String>) -> Self {
        self.try_before.push(name.into());
        self
    }

    /// Parse after the named type or family.
    pub fn try_after(mut self, name: impl Into<String>) -> Self {
        self.try_after.push(name.into());
        self
    }

    /// Configuration object new instances start from.
    pub fn default_data(mut self, data: serde_json::Value) -> Self {
        self.default_data = data;
        self
    }

    /// Engine type tag.
    pub fn engine_type(&self) -> &str {
        &self.engine_type
    }

    /// Display name for new instances.
    pub fn default_name(&self) -> &str {
        &self.default_name
    }

    /// Whether only one instance may exist.
    pub fn is_singleton(&self) -> bool {
        self.singleton
    }

    /// Families this type belongs to.
    pub fn families(&self) -> &[String] {
        &self.families
    }

    /// Declared try-before names, unexpanded.
    pub fn try_before_names(&self) -> &[String] {
        &self.try_before
    }

    /// Declared try-after names, unexpanded.
    pub fn try_after_names(&self) -> &[String] {
        &self.try_after
    }

    /// Configuration object new instances start from.
    pub fn data_template(&self) -> &serde_json::Value {
        &self.default_data
    }

    /// True if this type belongs to `family`.
    pub fn in_family(&self, family: &str) -> bool {
        self.families.iter().any(|f| f == family)
    }

    /// Build an engine from a stored instance.
    pub fn build(
        &self,
        instance: EngineInstance,
        context: &EngineContext,
    ) -> MedialoomResult<Arc<dyn StorageEngine>> {
        (self.factory)(instance, context)
    }
}

impl fmt::Debug for EngineDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineDescriptor")
            .field("engine_type", &self.engine_type)
            .field("default_name", &self.default_name)
            .field("singleton", &self.singleton)
            .field("families", &self.families)
            .field("try_before", &self.try_before)
            .field("try_after", &self.try_after)
            .finish_non_exhaustive()
    }
}
