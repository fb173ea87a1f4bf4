//! # Draft layout store
//!
//! `DraftStore` owns the mutable working copy of the layout for one editing
//! session, plus the snapshot taken when the session opened. Nothing here
//! persists anything: the external "save" action reads [`DraftStore::layout`]
//! and the external "cancel" simply drops the store.
//!
//! Change detection compares *enabled-id sets*, not whole layouts: a pure
//! reorder or a resize does not light the unsaved-changes indicator, only
//! enablement differences do.

use std::collections::BTreeSet;
use std::rc::Rc;

use smallvec::SmallVec;

use crate::catalog::{Catalog, Multiplicity};
use crate::geometry::GridSize;
use crate::instance::{InstanceId, Layout, WidgetInstance};
use crate::settings::SettingsStore;

pub struct DraftStore {
    catalog: Rc<Catalog>,
    settings: Rc<dyn SettingsStore>,
    draft: Layout,
    initial: Layout,
    initial_enabled: BTreeSet<InstanceId>,
}

fn enabled_ids(layout: &Layout) -> BTreeSet<InstanceId> {
    layout.enabled().map(|w| w.id.clone()).collect()
}

impl DraftStore {
    pub fn new(catalog: Rc<Catalog>, layout: Layout, settings: Rc<dyn SettingsStore>) -> Self {
        let initial_enabled = enabled_ids(&layout);
        Self {
            catalog,
            settings,
            initial: layout.clone(),
            draft: layout,
            initial_enabled,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.draft
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Toggle a singleton type on or off.
    ///
    /// Re-enabling resets the size to the definition default: a stale manual
    /// resize from a previous session would otherwise come back, possibly as
    /// a degenerate zero-size widget.
    pub fn toggle_singleton(&mut self, type_id: &str) {
        let id = InstanceId::new(type_id);
        match self.draft.get(&id) {
            Some(existing) => {
                let enabling = !existing.enabled;
                let mut next = self.draft.set_enabled(&id, enabling);
                if enabling {
                    if let Some(def) = self.catalog.get(type_id) {
                        next = next.resize(&id, def.default_size);
                    }
                }
                self.draft = next;
            }
            None => {
                match self.draft.create_instance(&self.catalog, type_id) {
                    Ok((next, _)) => self.draft = next,
                    Err(err) => log::warn!("toggle_singleton({type_id:?}) declined: {err}"),
                }
            }
        }
    }

    /// Group-level switch for a multi-instance type: creates the first
    /// instance when none are enabled, otherwise disables every instance of
    /// the type in one atomic update. Distinct from per-instance removal.
    pub fn toggle_multi_group(&mut self, type_id: &str) {
        if self.draft.count_enabled(type_id) == 0 {
            match self.draft.create_instance(&self.catalog, type_id) {
                Ok((next, _)) => self.draft = next,
                Err(err) => log::warn!("toggle_multi_group({type_id:?}) declined: {err}"),
            }
            return;
        }
        let ids: SmallVec<[InstanceId; 4]> = self
            .draft
            .iter()
            .filter(|w| w.id.resolve_type() == type_id)
            .map(|w| w.id.clone())
            .collect();
        let mut next = self.draft.clone();
        for id in &ids {
            next = next.set_enabled(id, false);
        }
        self.draft = next;
    }

    /// Enable (creating when absent) or disable every id in the candidate
    /// set. Never removes instances.
    pub fn bulk_set_enabled<'a>(&mut self, ids: impl IntoIterator<Item = &'a InstanceId>, enabled: bool) {
        let mut next = self.draft.clone();
        for id in ids {
            next = self.apply_enablement(next, id, enabled);
        }
        self.draft = next;
    }

    /// Flip `enabled` for existing ids; absent ids are definitionally
    /// disabled, so inversion creates and enables them.
    pub fn invert<'a>(&mut self, ids: impl IntoIterator<Item = &'a InstanceId>) {
        let mut next = self.draft.clone();
        for id in ids {
            let target = match next.get(id) {
                Some(w) => !w.enabled,
                None => true,
            };
            next = self.apply_enablement(next, id, target);
        }
        self.draft = next;
    }

    fn apply_enablement(&self, layout: Layout, id: &InstanceId, enabled: bool) -> Layout {
        let type_id = id.resolve_type().to_string();
        let def = self.catalog.get(&type_id);
        // A bare id for a multi-instance type means "the first child".
        let id = match (def.map(|d| d.multiplicity), id.is_child()) {
            (Some(Multiplicity::MultiInstance { .. }), false) => InstanceId::child(&type_id, 1),
            _ => id.clone(),
        };
        match layout.get(&id) {
            Some(w) if w.enabled == enabled => layout,
            Some(_) => {
                if enabled && self.at_capacity(&layout, &type_id) {
                    log::debug!("not re-enabling {id}: type at capacity");
                    return layout;
                }
                layout.set_enabled(&id, enabled)
            }
            None if enabled => {
                let Some(def) = def else {
                    log::warn!("cannot enable {id}: unknown type {type_id:?}");
                    return layout;
                };
                if self.at_capacity(&layout, &type_id) {
                    log::debug!("not creating {id}: type at capacity");
                    return layout;
                }
                let instance = WidgetInstance {
                    id,
                    enabled: true,
                    position: Default::default(),
                    size: def.default_size,
                    display_name: None,
                    category: def.category,
                    description: def.description.clone(),
                };
                layout.iter().cloned().chain(std::iter::once(instance)).collect()
            }
            None => layout,
        }
    }

    fn at_capacity(&self, layout: &Layout, type_id: &str) -> bool {
        match self.catalog.get(type_id).map(|d| d.multiplicity) {
            Some(Multiplicity::MultiInstance { max_instances: Some(max) }) => {
                layout.count_enabled(type_id) >= max.get() as usize
            }
            _ => false,
        }
    }

    /// Remove exactly one instance, and its settings when it is a
    /// multi-instance child. Singleton settings are keyed by type and
    /// survive toggles and removals.
    pub fn remove_instance(&mut self, id: &InstanceId) {
        let (next, removed) = self.draft.remove_instance(id);
        if removed.is_some() {
            if id.is_child() {
                self.settings.delete_instance_settings(id);
            }
            self.draft = next;
        }
    }

    /// Reorder commit used by the drag gesture: single-element move within
    /// the enabled sequence.
    pub fn move_enabled(&mut self, from: usize, to: usize) {
        self.draft = self.draft.move_enabled(from, to);
    }

    pub fn resize(&mut self, id: &InstanceId, size: GridSize) {
        self.draft = self.draft.resize(id, size);
    }

    pub fn rename(&mut self, id: &InstanceId, display_name: Option<String>) {
        self.draft = self.draft.rename(id, display_name);
    }

    /// True iff the enabled-id set differs from the session-start snapshot.
    pub fn has_changes(&self) -> bool {
        enabled_ids(&self.draft) != self.initial_enabled
    }

    /// Discard the draft and restore the session-start layout.
    pub fn reset(&mut self) {
        self.draft = self.initial.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::MemorySettings;
    use serde_json::json;

    fn store() -> DraftStore {
        DraftStore::new(
            Rc::new(Catalog::standard()),
            Layout::default(),
            Rc::new(MemorySettings::new()),
        )
    }

    #[test]
    fn toggle_singleton_creates_then_flips() {
        let mut s = store();
        s.toggle_singleton("Clock");
        assert_eq!(s.layout().count_enabled("Clock"), 1);
        s.toggle_singleton("Clock");
        assert_eq!(s.layout().count_enabled("Clock"), 0);
        // Instance still exists, just disabled.
        assert!(s.layout().contains(&InstanceId::new("Clock")));
    }

    #[test]
    fn reenable_resets_stale_size() {
        let mut s = store();
        s.toggle_singleton("Clock");
        let id = InstanceId::new("Clock");
        s.resize(&id, GridSize::new(10, 10));
        s.toggle_singleton("Clock");
        s.toggle_singleton("Clock");
        let def_size = s.catalog().get("Clock").unwrap().default_size;
        assert_eq!(s.layout().get(&id).unwrap().size, def_size);
    }

    #[test]
    fn multi_group_disables_all_at_once() {
        let mut s = store();
        s.toggle_multi_group("Notes");
        assert_eq!(s.layout().count_enabled("Notes"), 1);
        // Add a second child directly through the instance model.
        let (next, _) = s.layout().create_instance(s.catalog(), "Notes").unwrap();
        s.draft = next;
        assert_eq!(s.layout().count_enabled("Notes"), 2);

        s.toggle_multi_group("Notes");
        assert_eq!(s.layout().count_enabled("Notes"), 0);
        // Group kill switch disables, it does not remove.
        assert_eq!(s.layout().len(), 2);

        // And back on from zero: creates a fresh instance.
        s.toggle_multi_group("Notes");
        assert_eq!(s.layout().count_enabled("Notes"), 1);
    }

    #[test]
    fn bulk_set_never_removes() {
        let mut s = store();
        let ids = [InstanceId::new("Clock"), InstanceId::new("Weather")];
        s.bulk_set_enabled(&ids, true);
        assert_eq!(s.layout().len(), 2);
        s.bulk_set_enabled(&ids, false);
        assert_eq!(s.layout().len(), 2);
        assert_eq!(s.layout().enabled().count(), 0);
    }

    #[test]
    fn bulk_enable_respects_capacity() {
        let mut s = store();
        // FanController is capped at 4 enabled instances.
        let ids: Vec<_> = (1..=6).map(|n| InstanceId::child("FanController", n)).collect();
        s.bulk_set_enabled(&ids, true);
        assert_eq!(s.layout().count_enabled("FanController"), 4);
    }

    #[test]
    fn invert_enables_absent_ids() {
        let mut s = store();
        s.toggle_singleton("Clock");
        let ids = [InstanceId::new("Clock"), InstanceId::new("Weather")];
        s.invert(&ids);
        assert_eq!(s.layout().count_enabled("Clock"), 0);
        assert_eq!(s.layout().count_enabled("Weather"), 1);
    }

    #[test]
    fn bare_multi_id_becomes_first_child() {
        let mut s = store();
        s.bulk_set_enabled(&[InstanceId::new("Notes")], true);
        assert!(s.layout().contains(&InstanceId::new("Notes:1")));
    }

    #[test]
    fn remove_deletes_child_settings_only() {
        let settings = Rc::new(MemorySettings::new());
        settings.set("FanController:1", json!({"speed": 3}));
        settings.set("Clock", json!({"format": "24h"}));
        let mut s = DraftStore::new(
            Rc::new(Catalog::standard()),
            Layout::default(),
            settings.clone(),
        );
        s.toggle_singleton("Clock");
        s.toggle_multi_group("FanController");

        s.remove_instance(&InstanceId::new("FanController:1"));
        assert!(settings.get("FanController:1").is_none());

        s.remove_instance(&InstanceId::new("Clock"));
        // Singleton settings are keyed by type and persist.
        assert_eq!(settings.get("Clock"), Some(json!({"format": "24h"})));
    }

    #[test]
    fn has_changes_tracks_enabled_set_only() {
        let cat = Rc::new(Catalog::standard());
        let (layout, _) = Layout::default().create_instance(&cat, "Clock").unwrap();
        let (layout, _) = layout.create_instance(&cat, "Weather").unwrap();
        let mut s = DraftStore::new(cat, layout, Rc::new(MemorySettings::new()));
        assert!(!s.has_changes());

        // Pure reorder: not a change.
        s.move_enabled(1, 0);
        assert!(!s.has_changes());

        s.toggle_singleton("Clock");
        assert!(s.has_changes());
        s.toggle_singleton("Clock");
        assert!(!s.has_changes());
    }

    #[test]
    fn reset_restores_snapshot() {
        let cat = Rc::new(Catalog::standard());
        let (layout, _) = Layout::default().create_instance(&cat, "Clock").unwrap();
        let mut s = DraftStore::new(cat, layout.clone(), Rc::new(MemorySettings::new()));
        s.toggle_singleton("Weather");
        s.toggle_singleton("Clock");
        assert!(s.has_changes());
        s.reset();
        assert!(!s.has_changes());
        assert_eq!(*s.layout(), layout);
    }
}
