//! Application services
//!
//! Concrete service implementations that orchestrate domain logic.
//! Services depend on I/O boundary traits (MapService, LegendSource, MenuAnchor)
//! but are themselves concrete structs, not traits.

mod menu;
mod toc;

pub use menu::MenuBuilder;
pub use toc::{CheckOutcome, TocService};
