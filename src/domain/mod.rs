//! Domain layer: layer hierarchy, visibility state and the toggle engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod menu;
pub mod toggle;
pub mod visibility;

pub use entities::*;
pub use error::{DomainError, DomainResult};
pub use menu::{MenuEntry, MenuItem, MenuNode, MenuTree, ToggleBinding};
pub use toggle::{toggle, ToggleOutcome};
pub use visibility::{VisibilitySet, NO_LAYER};
