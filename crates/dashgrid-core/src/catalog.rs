//! # Widget catalog
//!
//! The catalog is the static registry of widget *definitions*: what types
//! exist, which category they belong to, how big they are by default, and
//! whether more than one copy may be placed. It is built once per session
//! and read-only afterwards — placed widgets denormalize the definition
//! fields they need at creation time, so later catalog changes never
//! retroactively alter an existing layout.

use std::collections::HashMap;
use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::geometry::GridSize;

/// Widget category. Display order is fixed by [`Category::ORDER`],
/// independent of definition ordering.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Climate,
    Security,
    Cameras,
    Markets,
    System,
    Utility,
}

impl Category {
    pub const ORDER: [Category; 6] = [
        Category::Climate,
        Category::Security,
        Category::Cameras,
        Category::Markets,
        Category::System,
        Category::Utility,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Climate => "Climate",
            Category::Security => "Security",
            Category::Cameras => "Cameras",
            Category::Markets => "Markets",
            Category::System => "System",
            Category::Utility => "Utility",
        }
    }
}

/// Whether a widget type may be placed more than once.
///
/// Consumers pattern-match on this once instead of re-checking a boolean
/// flag at every call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Multiplicity {
    Singleton,
    MultiInstance { max_instances: Option<NonZeroU32> },
}

impl Multiplicity {
    pub fn capped(max: u32) -> Self {
        Multiplicity::MultiInstance {
            max_instances: NonZeroU32::new(max),
        }
    }

    pub fn uncapped() -> Self {
        Multiplicity::MultiInstance {
            max_instances: None,
        }
    }
}

/// Immutable catalog entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetDefinition {
    pub type_id: String,
    pub title: String,
    pub category: Category,
    pub description: String,
    pub default_size: GridSize,
    pub beta: bool,
    pub multiplicity: Multiplicity,
}

impl WidgetDefinition {
    pub fn new(
        type_id: impl Into<String>,
        title: impl Into<String>,
        category: Category,
        description: impl Into<String>,
    ) -> Self {
        Self {
            type_id: type_id.into(),
            title: title.into(),
            category,
            description: description.into(),
            default_size: GridSize::default(),
            beta: false,
            multiplicity: Multiplicity::Singleton,
        }
    }

    pub fn size(mut self, w: u32, h: u32) -> Self {
        self.default_size = GridSize::new(w, h);
        self
    }

    pub fn beta(mut self) -> Self {
        self.beta = true;
        self
    }

    pub fn multiplicity(mut self, m: Multiplicity) -> Self {
        self.multiplicity = m;
        self
    }
}

/// Read-only registry of widget definitions, iterated in insertion order.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    defs: Vec<WidgetDefinition>,
    by_type: HashMap<String, usize>,
}

impl Catalog {
    pub fn new(defs: Vec<WidgetDefinition>) -> Self {
        let mut by_type = HashMap::with_capacity(defs.len());
        for (i, def) in defs.iter().enumerate() {
            if by_type.insert(def.type_id.clone(), i).is_some() {
                log::warn!("duplicate widget definition {:?}, keeping the later one", def.type_id);
            }
        }
        Self { defs, by_type }
    }

    pub fn get(&self, type_id: &str) -> Option<&WidgetDefinition> {
        self.by_type.get(type_id).map(|&i| &self.defs[i])
    }

    pub fn contains(&self, type_id: &str) -> bool {
        self.by_type.contains_key(type_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &WidgetDefinition> {
        self.defs.iter()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// The stock widget roster of the dashboard product.
    pub fn standard() -> Self {
        use Category::*;
        Self::new(vec![
            WidgetDefinition::new("Clock", "Clock", Utility, "Local time and date").size(2, 1),
            WidgetDefinition::new("Weather", "Weather", Climate, "Current conditions and forecast")
                .size(2, 2),
            WidgetDefinition::new(
                "FanController",
                "Fan Controller",
                Climate,
                "AC Infinity fan port control",
            )
            .size(2, 2)
            .multiplicity(Multiplicity::capped(4)),
            WidgetDefinition::new(
                "GrowTent",
                "Grow Tent",
                Climate,
                "Tent temperature, humidity, and VPD",
            )
            .size(2, 2)
            .multiplicity(Multiplicity::uncapped()),
            WidgetDefinition::new(
                "DoorAccess",
                "Door Access",
                Security,
                "UniFi Access door state and unlock",
            )
            .size(2, 1),
            WidgetDefinition::new(
                "CameraFeed",
                "Camera Feed",
                Cameras,
                "Live camera stream",
            )
            .size(3, 2)
            .multiplicity(Multiplicity::capped(6)),
            WidgetDefinition::new(
                "MarketReport",
                "Market Report",
                Markets,
                "USDA livestock price summary",
            )
            .size(3, 2)
            .beta(),
            WidgetDefinition::new("SystemStatus", "System Status", System, "Service health at a glance")
                .size(2, 1),
            WidgetDefinition::new("Notes", "Notes", Utility, "Free-form sticky notes")
                .size(2, 2)
                .multiplicity(Multiplicity::uncapped()),
        ])
    }
}
