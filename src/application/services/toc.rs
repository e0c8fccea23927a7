//! Table-of-contents service
//!
//! Owns the built menu and one visibility set per service, turns check events
//! into toggle engine runs and forwards the results to the map service.

use std::collections::BTreeMap;

use tracing::{debug, info, instrument, warn};

use crate::application::services::MenuBuilder;
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::config::Settings;
use crate::domain::{
    toggle, DomainError, MenuItem, MenuTree, ServiceLayer, ToggleBinding, ToggleOutcome,
    VisibilitySet,
};
use crate::infrastructure::traits::{LegendSource, MapService, MenuAnchor};

/// What a check event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckOutcome {
    /// A service header was toggled
    Service { service: String, visible: bool },
    /// A sub-layer entry was toggled; `outcome.published()` went to the map service
    Layer {
        service: String,
        outcome: ToggleOutcome,
    },
}

/// Legend menu session over a map service.
pub struct TocService {
    map: Box<dyn MapService>,
    legends: Box<dyn LegendSource>,
    settings: Settings,
    menu: MenuTree,
    visible: BTreeMap<String, VisibilitySet>,
}

impl TocService {
    /// Create a session; call [`TocService::build_menu`] before dispatching events.
    pub fn new(map: Box<dyn MapService>, legends: Box<dyn LegendSource>, settings: Settings) -> Self {
        let menu = MenuTree::new(settings.menu.anchor.clone());
        Self {
            map,
            legends,
            settings,
            menu,
            visible: BTreeMap::new(),
        }
    }

    /// Services shown in the menu: the configured ids in order, or all services.
    fn operational(&self) -> Vec<ServiceLayer> {
        let services = self.map.services();
        if self.settings.operational.is_empty() {
            return services.to_vec();
        }
        self.settings
            .operational
            .iter()
            .filter_map(|id| {
                let found = services.iter().find(|s| &s.id == id).cloned();
                if found.is_none() {
                    warn!("operational service not in map document: {}", id);
                }
                found
            })
            .collect()
    }

    /// Fetch legends and build the menu. A failed fetch leaves that service's popup empty.
    #[instrument(skip(self))]
    pub fn build_menu(&mut self) -> ApplicationResult<&MenuTree> {
        let services = self.operational();
        if services.is_empty() {
            return Err(ApplicationError::NoServices);
        }

        let builder = MenuBuilder::new(&self.settings.menu);
        let (mut menu, toc) = builder.start();
        let mut visible = BTreeMap::new();

        for service in &services {
            let seeded = VisibilitySet::from_published(&service.visible_layers);
            let header = builder.add_service(&mut menu, toc, service);

            match self.legends.fetch(service) {
                Ok(legend) => {
                    let added = builder.add_layers(&mut menu, header, service, &legend, &seeded);
                    debug!("service {}: {} entries", service.id, added);
                }
                Err(e) => {
                    warn!("legend unavailable for {}: {}", service.id, e);
                }
            }
            visible.insert(service.id.clone(), seeded);
        }

        info!("menu built: {} services, {} entries", services.len(), menu.len());
        self.menu = menu;
        self.visible = visible;
        Ok(&self.menu)
    }

    pub fn menu(&self) -> &MenuTree {
        &self.menu
    }

    pub fn map(&self) -> &dyn MapService {
        self.map.as_ref()
    }

    /// Current visible set of a service.
    pub fn visible(&self, service: &str) -> Option<&VisibilitySet> {
        self.visible.get(service)
    }

    /// Dispatch a check/uncheck on a menu entry.
    #[instrument(skip(self))]
    pub fn check(&mut self, entry: MenuItem, checked: bool) -> ApplicationResult<CheckOutcome> {
        let menu_entry = self.menu.entry(entry)?;
        let binding = menu_entry
            .binding()
            .cloned()
            .ok_or_else(|| DomainError::NotCheckable(menu_entry.label().to_string()))?;

        match binding {
            ToggleBinding::Service { service } => {
                self.map.set_visibility(&service, checked)?;
                self.menu.set_checked(entry, checked)?;
                Ok(CheckOutcome::Service {
                    service,
                    visible: checked,
                })
            }
            ToggleBinding::Layer { service, node } => {
                let current = self
                    .visible
                    .get(&service)
                    .ok_or_else(|| DomainError::UnknownService(service.clone()))?;
                let outcome = toggle(&node, checked, current);
                debug!(
                    "toggle {} on {}: +{:?} -{:?}",
                    node.toggle_id(),
                    service,
                    outcome.added,
                    outcome.removed
                );

                self.map.set_visible_layers(&service, &outcome.published())?;
                self.sync_check_marks(&service, entry, checked, &outcome)?;
                self.visible.insert(service.clone(), outcome.visible.clone());

                Ok(CheckOutcome::Layer { service, outcome })
            }
        }
    }

    /// The clicked entry takes the new flag; entries whose id changed membership follow the set.
    fn sync_check_marks(
        &mut self,
        service: &str,
        clicked: MenuItem,
        checked: bool,
        outcome: &ToggleOutcome,
    ) -> ApplicationResult<()> {
        let updates: Vec<(MenuItem, bool)> = self
            .menu
            .layer_entries(service)
            .filter_map(|(idx, node)| {
                let id = node.toggle_id();
                if idx == clicked {
                    Some((idx, checked))
                } else if outcome.changed(id) {
                    Some((idx, outcome.visible.contains(id)))
                } else {
                    None
                }
            })
            .collect();

        for (idx, value) in updates {
            self.menu.set_checked(idx, value)?;
        }
        Ok(())
    }

    /// Check/uncheck the entry bound to sub-layer `layer` of `service`.
    pub fn toggle_layer(
        &mut self,
        service: &str,
        layer: i64,
        checked: bool,
    ) -> ApplicationResult<CheckOutcome> {
        let entry = self
            .menu
            .find_layer(service, layer)
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::UnknownLayer {
                service: service.to_string(),
                layer,
            })?;
        self.check(entry, checked)
    }

    /// Check/uncheck the header entry of `service`.
    pub fn toggle_service(&mut self, service: &str, checked: bool) -> ApplicationResult<CheckOutcome> {
        let entry = self
            .menu
            .find_service(service)
            .ok_or_else(|| DomainError::UnknownService(service.to_string()))?;
        self.check(entry, checked)
    }

    /// Hand the menu to the configured anchor.
    pub fn attach(&self, anchor: &dyn MenuAnchor) -> ApplicationResult<()> {
        let name = &self.settings.menu.anchor;
        anchor
            .attach(name, &self.menu)
            .with_context(|| format!("attach menu to {}", name))
    }
}
