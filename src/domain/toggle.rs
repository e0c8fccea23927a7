//! Visibility toggle engine.
//!
//! Computes the visible sub-layer set after one check/uncheck on a layer node,
//! propagating to the node's group parent and to its own sub-layers.
//!
//! The self toggle flips on current membership and ignores `checked`; the
//! parent step uses `checked`. Callers rely on this asymmetry.

use tracing::{debug, instrument};

use crate::domain::entities::LayerNode;
use crate::domain::visibility::VisibilitySet;

/// Result of a toggle: the new set and what changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub visible: VisibilitySet,
    /// Ids present after but not before, in insertion order
    pub added: Vec<i64>,
    /// Ids present before but not after
    pub removed: Vec<i64>,
}

impl ToggleOutcome {
    /// Sentinel-adjusted list for the map service.
    pub fn published(&self) -> Vec<i64> {
        self.visible.publish()
    }

    pub fn changed(&self, id: i64) -> bool {
        self.added.contains(&id) || self.removed.contains(&id)
    }
}

/// Apply one toggle event on `node` to `visible`.
#[instrument(level = "debug", skip(node, visible), fields(node = node.id))]
pub fn toggle(node: &LayerNode, checked: bool, visible: &VisibilitySet) -> ToggleOutcome {
    let mut next = visible.clone();

    let own = node.toggle_id();
    let was_absent = next.flip(own);
    debug!(own, shown = was_absent, "self toggle");

    propagate_to_parent(node, checked, &mut next);

    if node.is_group() {
        propagate_to_sub_layers(node, &mut next);
    }

    let added = next.iter().filter(|&id| !visible.contains(id)).collect();
    let removed = visible.iter().filter(|&id| !next.contains(id)).collect();
    debug!(before = %visible, after = %next, "toggled");

    ToggleOutcome {
        visible: next,
        added,
        removed,
    }
}

fn propagate_to_parent(node: &LayerNode, checked: bool, visible: &mut VisibilitySet) {
    let Some(parent) = node.parent() else {
        return;
    };
    if !visible.contains(parent) {
        return;
    }
    if checked {
        // set semantics: re-inserting a present parent changes nothing
        visible.insert(parent);
    } else {
        visible.remove(parent);
        debug!(parent, "parent hidden");
    }
}

fn propagate_to_sub_layers(node: &LayerNode, visible: &mut VisibilitySet) {
    let mut last_was_absent = true;
    for &sub in &node.sub_layer_ids {
        last_was_absent = visible.flip(sub);
        debug!(sub, shown = last_was_absent, "sub-layer toggle");
    }

    // Only the last sub-layer decides whether the header id is stripped as well.
    if !last_was_absent && visible.remove(node.id) {
        debug!(header = node.id, "group header hidden");
    }
}
