//! # dashgrid-core
//!
//! The headless core of the dashboard customizer: which widgets exist, how
//! many copies of each may be placed, and the draft layout the user edits
//! before an external save commits it.
//!
//! Layers, leaves first:
//!
//! - [`catalog`] — static registry of widget definitions.
//! - [`instance`] — composite instance ids and the [`instance::Layout`]
//!   allocation model.
//! - [`store`] — the draft working copy plus the session-start snapshot
//!   used for change detection and reset.
//! - [`browser`] — read-side filtering/search/grouping over catalog and
//!   draft.
//!
//! Everything is synchronous and in-memory. Persistence, permission
//! evaluation, and per-widget settings storage are injected collaborators:
//!
//! ```rust
//! use std::rc::Rc;
//! use dashgrid_core::*;
//!
//! let catalog = Rc::new(Catalog::standard());
//! let mut store = DraftStore::new(catalog, Layout::default(), Rc::new(MemorySettings::new()));
//!
//! store.toggle_singleton("Clock");
//! assert!(store.has_changes());
//! ```

pub mod browser;
pub mod catalog;
pub mod geometry;
pub mod instance;
pub mod settings;
pub mod store;
pub mod tests;

pub use browser::*;
pub use catalog::*;
pub use geometry::*;
pub use instance::*;
pub use settings::*;
pub use store::*;
