//! # Catalog browser
//!
//! Read-side composition of the catalog and the draft layout: what the
//! widget picker actually shows. The pipeline is permission filter →
//! category filter → search filter; search yields a flat list, otherwise
//! entries group by category in [`Category::ORDER`]. Nothing here mutates
//! anything.

use std::collections::HashMap;

use crate::catalog::{Catalog, Category, Multiplicity, WidgetDefinition};
use crate::instance::{InstanceId, Layout};

/// Access level of the original permission system, ordered weakest first.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum AccessLevel {
    #[default]
    View,
    Edit,
    Admin,
}

/// Per-user widget grants, turned into the opaque predicate `browse` takes.
/// Admins carry `all_access` and skip per-widget grants entirely.
#[derive(Clone, Debug, Default)]
pub struct Permissions {
    granted: HashMap<String, AccessLevel>,
    all_access: bool,
}

impl Permissions {
    pub fn all_access() -> Self {
        Self {
            granted: HashMap::new(),
            all_access: true,
        }
    }

    pub fn grant(mut self, type_id: impl Into<String>, level: AccessLevel) -> Self {
        self.granted.insert(type_id.into(), level);
        self
    }

    pub fn allows(&self, type_id: &str, required: AccessLevel) -> bool {
        self.all_access || self.granted.get(type_id).is_some_and(|&l| l >= required)
    }

    /// The capability predicate for [`browse`].
    pub fn can_view(&self) -> impl Fn(&WidgetDefinition) -> bool + '_ {
        move |def| self.allows(&def.type_id, AccessLevel::View)
    }
}

/// Browser filter state: free-text search and an optional category ("all"
/// when `None`).
#[derive(Clone, Debug, Default)]
pub struct BrowserQuery {
    pub search: String,
    pub category: Option<Category>,
}

/// `total` definitions visible and how many of them are switched on
/// (multi-instance types contribute their enabled-instance count).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counts {
    pub total: usize,
    pub enabled: usize,
}

/// One visible catalog entry with its enablement state.
#[derive(Clone, Debug)]
pub struct WidgetEntry<'a> {
    pub definition: &'a WidgetDefinition,
    pub enabled: bool,
    pub enabled_instances: usize,
    pub can_add: bool,
}

#[derive(Clone, Debug)]
pub struct CategoryGroup<'a> {
    pub category: Category,
    pub entries: Vec<WidgetEntry<'a>>,
    pub counts: Counts,
}

/// Browse output: flat while searching, grouped otherwise.
#[derive(Clone, Debug)]
pub enum BrowserView<'a> {
    Flat(Vec<WidgetEntry<'a>>),
    Grouped(Vec<CategoryGroup<'a>>),
}

#[derive(Clone, Debug)]
pub struct BrowserResult<'a> {
    pub view: BrowserView<'a>,
    pub totals: Counts,
}

/// Display-purpose enablement: any enabled instance for multi-instance
/// types, the exact-id instance for singletons.
pub fn is_widget_enabled(catalog: &Catalog, layout: &Layout, type_id: &str) -> bool {
    match catalog.get(type_id).map(|d| d.multiplicity) {
        Some(Multiplicity::MultiInstance { .. }) => layout.count_enabled(type_id) > 0,
        Some(Multiplicity::Singleton) => layout
            .get(&InstanceId::new(type_id))
            .is_some_and(|w| w.enabled),
        None => false,
    }
}

fn matches_search(def: &WidgetDefinition, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    def.title.to_lowercase().contains(&needle)
        || def.description.to_lowercase().contains(&needle)
        || def.category.label().to_lowercase().contains(&needle)
}

fn entry<'a>(catalog: &Catalog, layout: &Layout, def: &'a WidgetDefinition) -> WidgetEntry<'a> {
    let enabled_instances = layout.count_enabled(&def.type_id);
    WidgetEntry {
        definition: def,
        enabled: is_widget_enabled(catalog, layout, &def.type_id),
        enabled_instances,
        can_add: layout.can_add(catalog, &def.type_id),
    }
}

fn count(entries: &[WidgetEntry<'_>]) -> Counts {
    Counts {
        total: entries.len(),
        enabled: entries
            .iter()
            .map(|e| match e.definition.multiplicity {
                Multiplicity::Singleton => usize::from(e.enabled),
                Multiplicity::MultiInstance { .. } => e.enabled_instances,
            })
            .sum(),
    }
}

pub fn browse<'a>(
    catalog: &'a Catalog,
    layout: &Layout,
    permitted: impl Fn(&WidgetDefinition) -> bool,
    query: &BrowserQuery,
) -> BrowserResult<'a> {
    let visible: Vec<WidgetEntry<'a>> = catalog
        .iter()
        .filter(|def| permitted(def))
        .filter(|def| query.category.is_none_or(|c| def.category == c))
        .filter(|def| query.search.is_empty() || matches_search(def, &query.search))
        .map(|def| entry(catalog, layout, def))
        .collect();

    let totals = count(&visible);

    // Search results stay flat; grouping only applies when browsing.
    if !query.search.is_empty() {
        return BrowserResult {
            view: BrowserView::Flat(visible),
            totals,
        };
    }

    let groups = Category::ORDER
        .iter()
        .filter_map(|&category| {
            let entries: Vec<_> = visible
                .iter()
                .filter(|e| e.definition.category == category)
                .cloned()
                .collect();
            if entries.is_empty() {
                return None;
            }
            let counts = count(&entries);
            Some(CategoryGroup {
                category,
                entries,
                counts,
            })
        })
        .collect();

    BrowserResult {
        view: BrowserView::Grouped(groups),
        totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn layout_with(catalog: &Catalog, type_ids: &[&str]) -> Layout {
        let mut layout = Layout::default();
        for t in type_ids {
            let (next, _) = layout.create_instance(catalog, t).unwrap();
            layout = next;
        }
        layout
    }

    #[test]
    fn groups_follow_category_order() {
        let cat = Catalog::standard();
        let layout = Layout::default();
        let result = browse(&cat, &layout, |_| true, &BrowserQuery::default());
        let BrowserView::Grouped(groups) = result.view else {
            panic!("expected grouped view");
        };
        let order: Vec<_> = groups.iter().map(|g| g.category).collect();
        let mut expected: Vec<_> = Category::ORDER.to_vec();
        expected.retain(|c| order.contains(c));
        assert_eq!(order, expected);
    }

    #[test]
    fn search_is_flat_and_case_insensitive() {
        let cat = Catalog::standard();
        let layout = Layout::default();
        let query = BrowserQuery {
            search: "fan".into(),
            category: None,
        };
        let result = browse(&cat, &layout, |_| true, &query);
        let BrowserView::Flat(entries) = result.view else {
            panic!("expected flat view while searching");
        };
        assert!(entries.iter().any(|e| e.definition.type_id == "FanController"));
    }

    #[test]
    fn search_matches_category_label() {
        let cat = Catalog::standard();
        let result = browse(
            &cat,
            &Layout::default(),
            |_| true,
            &BrowserQuery {
                search: "camera".into(),
                category: None,
            },
        );
        let BrowserView::Flat(entries) = result.view else {
            panic!("expected flat view");
        };
        assert!(!entries.is_empty());
    }

    #[test]
    fn category_filter_retains_one_group() {
        let cat = Catalog::standard();
        let result = browse(
            &cat,
            &Layout::default(),
            |_| true,
            &BrowserQuery {
                search: String::new(),
                category: Some(Category::Climate),
            },
        );
        let BrowserView::Grouped(groups) = result.view else {
            panic!("expected grouped view");
        };
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].category, Category::Climate);
    }

    #[test]
    fn counters_weigh_multi_instances() {
        let cat = Catalog::standard();
        let layout = layout_with(&cat, &["Clock", "Notes", "Notes", "Notes"]);
        let result = browse(&cat, &layout, |_| true, &BrowserQuery::default());
        // Clock counts 1, each Notes child counts 1.
        assert_eq!(result.totals.enabled, 4);
        assert_eq!(result.totals.total, cat.len());
    }

    #[test]
    fn permission_predicate_filters() {
        let cat = Catalog::standard();
        let perms = Permissions::default().grant("Clock", AccessLevel::View);
        let result = browse(&cat, &Layout::default(), perms.can_view(), &BrowserQuery::default());
        assert_eq!(result.totals.total, 1);

        let admin = Permissions::all_access();
        let result = browse(&cat, &Layout::default(), admin.can_view(), &BrowserQuery::default());
        assert_eq!(result.totals.total, cat.len());
    }

    #[test]
    fn access_levels_are_ordered() {
        let perms = Permissions::default().grant("Clock", AccessLevel::Edit);
        assert!(perms.allows("Clock", AccessLevel::View));
        assert!(perms.allows("Clock", AccessLevel::Edit));
        assert!(!perms.allows("Clock", AccessLevel::Admin));
        assert!(!perms.allows("Weather", AccessLevel::View));
    }

    #[test]
    fn enablement_predicate_per_multiplicity() {
        let cat = Catalog::standard();
        let layout = layout_with(&cat, &["Notes"]);
        assert!(is_widget_enabled(&cat, &layout, "Notes"));
        assert!(!is_widget_enabled(&cat, &layout, "Clock"));
        assert!(!is_widget_enabled(&cat, &layout, "NoSuchWidget"));

        // A disabled singleton instance is not "enabled" for display.
        let layout = layout_with(&cat, &["Clock"]).set_enabled(&InstanceId::new("Clock"), false);
        assert!(!is_widget_enabled(&cat, &layout, "Clock"));
    }
}
