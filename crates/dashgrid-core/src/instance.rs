//! # Instance model
//!
//! A placed widget is identified by an [`InstanceId`]: either the bare
//! `type_id` (singleton types) or `"<type_id>:<n>"` for the n-th child of a
//! multi-instance type. [`Layout`] is the ordered sequence of placed
//! instances; every mutating operation returns a *fresh* `Layout` value so
//! observers see either the old sequence or the fully-updated one, never an
//! intermediate state.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::{Catalog, Category, Multiplicity, WidgetDefinition};
use crate::geometry::{GridPos, GridSize};

/// Composite widget instance identifier.
///
/// Any string is a valid id; resolution to a type is total and never fails.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstanceId(String);

impl InstanceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id of the n-th child of a multi-instance type.
    pub fn child(type_id: &str, ordinal: u32) -> Self {
        Self(format!("{type_id}:{ordinal}"))
    }

    /// Strips the optional `:<n>` suffix, yielding the widget type id.
    pub fn resolve_type(&self) -> &str {
        match self.0.split_once(':') {
            Some((type_id, _)) => type_id,
            None => &self.0,
        }
    }

    /// True for `"<type_id>:<n>"` ids, whose settings are keyed per
    /// instance rather than per type.
    pub fn is_child(&self) -> bool {
        self.0.contains(':')
    }

    /// The ordinal suffix, when present and numeric.
    pub fn ordinal(&self) -> Option<u32> {
        self.0.split_once(':').and_then(|(_, n)| n.parse().ok())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InstanceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One placed, possibly user-named, occurrence of a widget type.
///
/// `category` and `description` are denormalized from the definition at
/// creation time; a later catalog change does not rewrite existing
/// instances.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WidgetInstance {
    pub id: InstanceId,
    pub enabled: bool,
    pub position: GridPos,
    pub size: GridSize,
    pub display_name: Option<String>,
    pub category: Category,
    pub description: String,
}

impl WidgetInstance {
    fn from_definition(id: InstanceId, def: &WidgetDefinition) -> Self {
        Self {
            id,
            enabled: true,
            position: GridPos::default(),
            size: def.default_size,
            display_name: None,
            category: def.category,
            description: def.description.clone(),
        }
    }

    /// Title shown on the grid: the user override, or the definition title
    /// plus ordinal for multi-instance children. Falls back to the raw id
    /// when the type no longer exists in the catalog.
    pub fn title(&self, catalog: &Catalog) -> String {
        if let Some(name) = &self.display_name {
            return name.clone();
        }
        match catalog.get(self.id.resolve_type()) {
            Some(def) => match self.id.ordinal() {
                Some(n) => format!("{} {n}", def.title),
                None => def.title.clone(),
            },
            None => {
                log::warn!("instance {} references unknown type {:?}", self.id, self.id.resolve_type());
                self.id.as_str().to_string()
            }
        }
    }
}

/// Why an add was declined. All variants leave the layout unchanged; UIs
/// surface them as a disabled control, not a thrown error.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AddInstanceError {
    #[error("unknown widget type {0:?}")]
    UnknownType(String),
    #[error("widget type {0:?} allows a single instance and one already exists")]
    SingletonExists(String),
    #[error("widget type {type_id:?} is capped at {max} enabled instances")]
    CapacityReached { type_id: String, max: u32 },
}

/// Ordered sequence of placed instances. Cheap to clone; mutating
/// operations consume `&self` and return the updated value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layout {
    instances: Vec<WidgetInstance>,
}

impl Layout {
    pub fn new(instances: Vec<WidgetInstance>) -> Self {
        Self { instances }
    }

    pub fn iter(&self) -> impl Iterator<Item = &WidgetInstance> {
        self.instances.iter()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn get(&self, id: &InstanceId) -> Option<&WidgetInstance> {
        self.instances.iter().find(|w| &w.id == id)
    }

    pub fn contains(&self, id: &InstanceId) -> bool {
        self.get(id).is_some()
    }

    /// Enabled instances in sequence order; the grid renders exactly this.
    pub fn enabled(&self) -> impl Iterator<Item = &WidgetInstance> {
        self.instances.iter().filter(|w| w.enabled)
    }

    /// Count of enabled instances whose id resolves to `type_id`.
    pub fn count_enabled(&self, type_id: &str) -> usize {
        self.instances
            .iter()
            .filter(|w| w.enabled && w.id.resolve_type() == type_id)
            .count()
    }

    /// Whether another instance of `type_id` may be created right now.
    pub fn can_add(&self, catalog: &Catalog, type_id: &str) -> bool {
        self.check_add(catalog, type_id).is_ok()
    }

    fn check_add<'c>(
        &self,
        catalog: &'c Catalog,
        type_id: &str,
    ) -> Result<&'c WidgetDefinition, AddInstanceError> {
        let def = catalog
            .get(type_id)
            .ok_or_else(|| AddInstanceError::UnknownType(type_id.to_string()))?;
        match def.multiplicity {
            Multiplicity::Singleton => {
                let singleton_id = InstanceId::new(type_id);
                if self.contains(&singleton_id) {
                    return Err(AddInstanceError::SingletonExists(type_id.to_string()));
                }
            }
            Multiplicity::MultiInstance { max_instances } => {
                if let Some(max) = max_instances {
                    if self.count_enabled(type_id) >= max.get() as usize {
                        return Err(AddInstanceError::CapacityReached {
                            type_id: type_id.to_string(),
                            max: max.get(),
                        });
                    }
                }
            }
        }
        Ok(def)
    }

    /// Creates a fresh enabled instance of `type_id` and appends it.
    ///
    /// Singleton types get `id == type_id`; multi-instance types get the
    /// next free ordinal over *all* existing instances of the type, enabled
    /// or not, so ids never collide with a disabled sibling.
    pub fn create_instance(
        &self,
        catalog: &Catalog,
        type_id: &str,
    ) -> Result<(Layout, WidgetInstance), AddInstanceError> {
        let def = self.check_add(catalog, type_id)?;
        let id = match def.multiplicity {
            Multiplicity::Singleton => InstanceId::new(type_id),
            Multiplicity::MultiInstance { .. } => {
                let next = self
                    .instances
                    .iter()
                    .filter(|w| w.id.resolve_type() == type_id)
                    .filter_map(|w| w.id.ordinal())
                    .max()
                    .map_or(1, |n| n + 1);
                InstanceId::child(type_id, next)
            }
        };
        let instance = WidgetInstance::from_definition(id, def);
        let mut next = self.instances.clone();
        next.push(instance.clone());
        Ok((Layout::new(next), instance))
    }

    /// Removes exactly the instance with `id`. Sibling instances of the
    /// same type are untouched. Returns the removed instance, if any.
    pub fn remove_instance(&self, id: &InstanceId) -> (Layout, Option<WidgetInstance>) {
        let mut removed = None;
        let instances = self
            .instances
            .iter()
            .filter(|w| {
                if &w.id == id {
                    removed = Some((*w).clone());
                    false
                } else {
                    true
                }
            })
            .cloned()
            .collect();
        (Layout::new(instances), removed)
    }

    /// Single-element move within the *enabled* sequence (the order the
    /// grid renders): remove at enabled index `from`, insert at enabled
    /// index `to`. Disabled instances keep their relative positions.
    /// Out-of-range indices leave the layout unchanged.
    pub fn move_enabled(&self, from: usize, to: usize) -> Layout {
        let enabled_idx: Vec<usize> = self
            .instances
            .iter()
            .enumerate()
            .filter(|(_, w)| w.enabled)
            .map(|(i, _)| i)
            .collect();
        if from >= enabled_idx.len() || to >= enabled_idx.len() {
            log::warn!("move_enabled({from}, {to}) out of range for {} enabled instances", enabled_idx.len());
            return self.clone();
        }
        let mut next = self.instances.clone();
        let item = next.remove(enabled_idx[from]);
        let insert_at = next
            .iter()
            .enumerate()
            .filter(|(_, w)| w.enabled)
            .map(|(i, _)| i)
            .nth(to)
            .unwrap_or(next.len());
        next.insert(insert_at, item);
        Layout::new(next)
    }

    pub fn set_enabled(&self, id: &InstanceId, enabled: bool) -> Layout {
        self.map_instance(id, |w| w.enabled = enabled)
    }

    pub fn rename(&self, id: &InstanceId, display_name: Option<String>) -> Layout {
        self.map_instance(id, |w| w.display_name = display_name.clone())
    }

    pub fn resize(&self, id: &InstanceId, size: GridSize) -> Layout {
        self.map_instance(id, |w| w.size = size)
    }

    pub fn reposition(&self, id: &InstanceId, position: GridPos) -> Layout {
        self.map_instance(id, |w| w.position = position)
    }

    fn map_instance(&self, id: &InstanceId, f: impl Fn(&mut WidgetInstance)) -> Layout {
        let instances = self
            .instances
            .iter()
            .map(|w| {
                let mut w = w.clone();
                if &w.id == id {
                    f(&mut w);
                }
                w
            })
            .collect();
        Layout::new(instances)
    }
}

impl FromIterator<WidgetInstance> for Layout {
    fn from_iter<T: IntoIterator<Item = WidgetInstance>>(iter: T) -> Self {
        Layout::new(iter.into_iter().collect())
    }
}
