//! Menu construction from service layer infos and legend responses.

use std::collections::HashSet;

use tracing::{debug, instrument};

use crate::config::MenuSettings;
use crate::domain::{
    LayerInfo, LayerNode, LegendLayer, LegendResponse, MenuEntry, MenuItem, MenuTree,
    ServiceLayer, ToggleBinding, VisibilitySet,
};

/// Builds the legend menu: bar → TOC popup → one checkable popup per service.
pub struct MenuBuilder<'a> {
    settings: &'a MenuSettings,
}

/// State of one pass over a service's layer infos.
struct LayerPass<'a> {
    service: &'a ServiceLayer,
    legend: &'a LegendResponse,
    visible: &'a VisibilitySet,
    /// Ids nested in some group; kept out of the top level
    consumed: HashSet<i64>,
    /// Groups on the current nesting path
    ancestors: Vec<i64>,
}

impl<'a> LayerPass<'a> {
    fn binding(&self, node: LayerNode) -> ToggleBinding {
        ToggleBinding::Layer {
            service: self.service.id.clone(),
            node,
        }
    }
}

impl<'a> MenuBuilder<'a> {
    pub fn new(settings: &'a MenuSettings) -> Self {
        Self { settings }
    }

    /// Empty menu bar with the TOC popup. Returns the menu and the popup to add services to.
    pub fn start(&self) -> (MenuTree, MenuItem) {
        let mut menu = MenuTree::new(self.settings.anchor.clone());
        let toc = menu.add_child(
            menu.root(),
            MenuEntry::Popup {
                label: self.settings.title.clone(),
            },
        );
        (menu, toc)
    }

    /// Service header entry: checks show or hide the whole service.
    pub fn add_service(
        &self,
        menu: &mut MenuTree,
        toc: MenuItem,
        service: &ServiceLayer,
    ) -> MenuItem {
        let label = if service.title.is_empty() {
            service.id.clone()
        } else {
            service.title.clone()
        };
        menu.add_child(
            toc,
            MenuEntry::CheckablePopup {
                label,
                checked: service.visible,
                binding: ToggleBinding::Service {
                    service: service.id.clone(),
                },
            },
        )
    }

    /// Add the sub-layer entries of `service` below `parent`.
    ///
    /// Group headers nest their sub-layers; sub-layers consumed by a group are
    /// not repeated at the top level, but a sub-layer listed by several groups
    /// appears under each of them. Returns the number of entries this call added
    /// directly below `parent`.
    #[instrument(level = "debug", skip_all, fields(service = %service.id))]
    pub fn add_layers(
        &self,
        menu: &mut MenuTree,
        parent: MenuItem,
        service: &ServiceLayer,
        legend: &LegendResponse,
        visible: &VisibilitySet,
    ) -> usize {
        let mut pass = LayerPass {
            service,
            legend,
            visible,
            consumed: HashSet::new(),
            ancestors: Vec::new(),
        };
        let before = menu.children(parent).len();

        for info in &service.layer_infos {
            if pass.consumed.contains(&info.id) {
                debug!(layer = info.id, "already nested in a group");
                continue;
            }
            if info.is_group() {
                self.add_group(menu, parent, info, &mut pass);
                continue;
            }
            match legend.find(info.id) {
                Some(record) if record.legend.len() > 1 => {
                    self.add_swatch_popup(menu, parent, info, record, &pass);
                }
                Some(record) => {
                    let node = LayerNode::from_legend_layer(record);
                    self.add_checkable(menu, parent, record, node, &pass);
                }
                None => debug!(layer = info.id, "no legend record, skipped"),
            }
        }

        menu.children(parent).len() - before
    }

    fn add_group(
        &self,
        menu: &mut MenuTree,
        parent: MenuItem,
        info: &LayerInfo,
        pass: &mut LayerPass<'_>,
    ) {
        let (service, legend) = (pass.service, pass.legend);
        pass.consumed.insert(info.id);
        pass.ancestors.push(info.id);
        let header = menu.add_child(
            parent,
            MenuEntry::CheckablePopup {
                label: info.name.clone(),
                checked: pass.visible.contains(info.id),
                binding: pass.binding(LayerNode::from_layer_info(info)),
            },
        );

        for &sub in &info.sub_layer_ids {
            if pass.ancestors.contains(&sub) {
                debug!(layer = sub, "group cycle, skipped");
                continue;
            }
            pass.consumed.insert(sub);
            match service.layer_info(sub) {
                Some(sub_info) if sub_info.is_group() => {
                    self.add_group(menu, header, sub_info, pass);
                }
                Some(sub_info) => match legend.find(sub_info.id) {
                    Some(record) => {
                        let node = LayerNode::from_layer_info(sub_info);
                        self.add_checkable(menu, header, record, node, pass);
                    }
                    None => debug!(layer = sub, "no legend record for sub-layer, skipped"),
                },
                None => match legend.find(sub) {
                    Some(record) => {
                        let node = LayerNode::from_legend_layer(record).with_parent(info.id);
                        self.add_checkable(menu, header, record, node, pass);
                    }
                    None => debug!(layer = sub, "unknown sub-layer, skipped"),
                },
            }
        }
        pass.ancestors.pop();
    }

    fn add_checkable(
        &self,
        menu: &mut MenuTree,
        parent: MenuItem,
        record: &LegendLayer,
        node: LayerNode,
        pass: &LayerPass<'_>,
    ) -> MenuItem {
        menu.add_child(
            parent,
            MenuEntry::Checkable {
                label: record.layer_name.clone(),
                image: record
                    .legend
                    .first()
                    .map(|entry| entry.data_uri(&self.settings.image_mime)),
                checked: pass.visible.contains(record.layer_id),
                binding: pass.binding(node),
            },
        )
    }

    fn add_swatch_popup(
        &self,
        menu: &mut MenuTree,
        parent: MenuItem,
        info: &LayerInfo,
        record: &LegendLayer,
        pass: &LayerPass<'_>,
    ) -> MenuItem {
        let popup = menu.add_child(
            parent,
            MenuEntry::CheckablePopup {
                label: record.layer_name.clone(),
                checked: pass.visible.contains(record.layer_id),
                binding: pass.binding(LayerNode::from_layer_info(info)),
            },
        );
        for entry in &record.legend {
            menu.add_child(
                popup,
                MenuEntry::Leaf {
                    label: entry.display_label(&self.settings.empty_label).to_string(),
                    image: Some(entry.data_uri(&self.settings.image_mime)),
                },
            );
        }
        popup
    }
}
