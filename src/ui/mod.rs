pub mod catalog;
pub mod watch;
pub mod widgets;

pub use catalog::{CatalogViewState, render_catalog_view};
pub use watch::render_watch_view;
