//! Layered topological ordering of engines.

use crate::{EngineRegistry, StorageEngine};
use medialoom_core::EngineInstance;
use medialoom_error::{EngineError, EngineErrorKind, MedialoomResult};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Split `nodes` into layers such that every node comes after all of its
/// dependencies.
///
/// `dependencies[n]` lists the nodes that must precede `n`. Dependencies on
/// nodes outside `nodes` are ignored. Each layer holds every remaining node
/// whose dependencies have all been emitted, in sorted order.
///
/// # Errors
///
/// Returns the nodes that could not be placed when the graph has a cycle.
///
/// # Examples
///
/// ```
/// use medialoom_storage::layered_sort;
/// use std::collections::{BTreeMap, BTreeSet};
///
/// let nodes: BTreeSet<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
/// let mut deps = BTreeMap::new();
/// deps.insert("a".to_string(), BTreeSet::from(["c".to_string()]));
///
/// let layers = layered_sort(&nodes, &deps).unwrap();
/// assert_eq!(layers, vec![vec!["b".to_string(), "c".to_string()], vec!["a".to_string()]]);
/// ```
pub fn layered_sort(
    nodes: &BTreeSet<String>,
    dependencies: &BTreeMap<String, BTreeSet<String>>,
) -> Result<Vec<Vec<String>>, Vec<String>> {
    let mut remaining = nodes.clone();
    let mut layers = Vec::new();

    while !remaining.is_empty() {
        let ready: Vec<String> = remaining
            .iter()
            .filter(|node| {
                dependencies
                    .get(*node)
                    .is_none_or(|deps| deps.iter().all(|d| !remaining.contains(d)))
            })
            .cloned()
            .collect();

        if ready.is_empty() {
            return Err(remaining.into_iter().collect());
        }
        for node in &ready {
            remaining.remove(node);
        }
        layers.push(ready);
    }
    Ok(layers)
}

/// Order items by the layered sort of their engine types, breaking ties
/// inside a layer by instance id.
fn sort_by_type<T>(
    registry: &EngineRegistry,
    items: Vec<T>,
    key: impl Fn(&T) -> (String, i32),
) -> MedialoomResult<Vec<T>> {
    let mut by_type: BTreeMap<String, Vec<(i32, T)>> = BTreeMap::new();
    for item in items {
        let (engine_type, id) = key(&item);
        by_type.entry(engine_type).or_default().push((id, item));
    }

    let types: BTreeSet<String> = by_type.keys().cloned().collect();
    let dependencies = registry.dependency_graph(&types);
    let layers = layered_sort(&types, &dependencies)
        .map_err(|stuck| EngineError::new(EngineErrorKind::CircularDependency(stuck)))?;

    let mut sorted = Vec::new();
    for layer in layers {
        let mut batch: Vec<(i32, T)> = layer
            .iter()
            .filter_map(|engine_type| by_type.remove(engine_type))
            .flatten()
            .collect();
        batch.sort_by_key(|(id, _)| *id);
        sorted.extend(batch.into_iter().map(|(_, item)| item));
    }
    Ok(sorted)
}

/// Order engines so that every try-before/try-after constraint between
/// their types holds.
///
/// The whole order is computed before anything is returned, so a cycle
/// never yields a partial list.
///
/// # Errors
///
/// Fails with `CircularDependency` naming the stuck types.
#[tracing::instrument(skip_all, fields(engines = engines.len()))]
pub fn sort_engines(
    registry: &EngineRegistry,
    engines: Vec<Arc<dyn StorageEngine>>,
) -> MedialoomResult<Vec<Arc<dyn StorageEngine>>> {
    let sorted = sort_by_type(registry, engines, |e| (e.engine_type().to_string(), e.id()))?;
    tracing::debug!(
        order = ?sorted.iter().map(|e| e.engine_type()).collect::<Vec<_>>(),
        "Sorted engines"
    );
    Ok(sorted)
}

/// [`sort_engines`] for stored instances that have not been built.
pub fn sort_instances(
    registry: &EngineRegistry,
    instances: Vec<EngineInstance>,
) -> MedialoomResult<Vec<EngineInstance>> {
    sort_by_type(registry, instances, |i| (i.engine_type().clone(), *i.id()))
}
