#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::browser::{BrowserQuery, browse};
    use crate::catalog::Catalog;
    use crate::instance::{InstanceId, Layout};
    use crate::settings::MemorySettings;
    use crate::store::DraftStore;

    fn session() -> (Rc<Catalog>, Rc<MemorySettings>, DraftStore) {
        let catalog = Rc::new(Catalog::standard());
        let settings = Rc::new(MemorySettings::new());
        let store = DraftStore::new(catalog.clone(), Layout::default(), settings.clone());
        (catalog, settings, store)
    }

    #[test]
    fn capacity_cycle_with_cap_of_two() {
        use crate::catalog::{Category, Multiplicity, WidgetDefinition};
        let catalog = Catalog::new(vec![
            WidgetDefinition::new("FanController", "Fan Controller", Category::Climate, "")
                .multiplicity(Multiplicity::capped(2)),
        ]);

        let (layout, _) = Layout::default().create_instance(&catalog, "FanController").unwrap();
        let (layout, second) = layout.create_instance(&catalog, "FanController").unwrap();
        assert!(!layout.can_add(&catalog, "FanController"));
        assert!(layout.create_instance(&catalog, "FanController").is_err());

        let (layout, _) = layout.remove_instance(&second.id);
        assert!(layout.can_add(&catalog, "FanController"));
    }

    // Same cycle against the standard catalog, which caps FanController at
    // 4: fill the cap, get declined, free a slot, add again.
    #[test]
    fn capacity_cycle() {
        let (catalog, _, _) = session();
        let mut layout = Layout::default();
        for _ in 0..4 {
            let (next, _) = layout.create_instance(&catalog, "FanController").unwrap();
            layout = next;
        }
        assert!(!layout.can_add(&catalog, "FanController"));
        assert!(layout.create_instance(&catalog, "FanController").is_err());
        assert_eq!(layout.count_enabled("FanController"), 4);

        let (layout, _) = layout.remove_instance(&InstanceId::child("FanController", 2));
        assert!(layout.can_add(&catalog, "FanController"));
        let (layout, w) = layout.create_instance(&catalog, "FanController").unwrap();
        assert_eq!(w.id.as_str(), "FanController:5");
        assert_eq!(layout.count_enabled("FanController"), 4);
    }

    #[test]
    fn singleton_invariant_across_toggles() {
        let (_, _, mut store) = session();
        for _ in 0..7 {
            store.toggle_singleton("Clock");
        }
        let clocks = store
            .layout()
            .iter()
            .filter(|w| w.id.as_str() == "Clock")
            .count();
        assert_eq!(clocks, 1);
    }

    #[test]
    fn edit_session_end_to_end() {
        let (catalog, settings, mut store) = session();

        store.toggle_singleton("Clock");
        store.toggle_multi_group("GrowTent");
        store.toggle_multi_group("GrowTent"); // group off again
        store.toggle_multi_group("GrowTent"); // fresh instance
        assert!(store.has_changes());

        let result = browse(&catalog, store.layout(), |_| true, &BrowserQuery::default());
        assert_eq!(result.totals.enabled, 2);

        store.remove_instance(&InstanceId::child("GrowTent", 2));
        assert_eq!(store.layout().count_enabled("GrowTent"), 0);

        store.reset();
        assert!(!store.has_changes());
        assert!(store.layout().is_empty());
        assert!(settings.is_empty());
    }

    #[test]
    fn layout_round_trips_through_json() {
        let (catalog, _, _) = session();
        let (layout, _) = Layout::default().create_instance(&catalog, "CameraFeed").unwrap();
        let (layout, _) = layout.create_instance(&catalog, "Clock").unwrap();
        let json = serde_json::to_string(&layout).unwrap();
        let back: Layout = serde_json::from_str(&json).unwrap();
        assert_eq!(back, layout);
    }
}
