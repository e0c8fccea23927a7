//! Tests for MenuBuilder

use std::path::PathBuf;

use legendtoc::application::services::MenuBuilder;
use legendtoc::config::MenuSettings;
use legendtoc::domain::{
    LayerInfo, LegendEntry, LegendLayer, LegendResponse, MapDocument, MenuEntry, MenuItem,
    MenuTree, ServiceLayer, ToggleBinding, VisibilitySet, NO_LAYER,
};
use legendtoc::util::testing;

fn resource(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/resources")
        .join(name)
}

fn parcels() -> (ServiceLayer, LegendResponse) {
    let map: MapDocument =
        serde_json::from_str(&std::fs::read_to_string(resource("map.json")).unwrap()).unwrap();
    let legend: LegendResponse = serde_json::from_str(
        &std::fs::read_to_string(resource("legends/parcels.json")).unwrap(),
    )
    .unwrap();
    (map.service("parcels").unwrap().clone(), legend)
}

fn info(id: i64, parent: i64, subs: &[i64]) -> LayerInfo {
    LayerInfo {
        id,
        name: format!("info {}", id),
        parent_layer_id: parent,
        sub_layer_ids: subs.to_vec(),
    }
}

fn record(id: i64, swatches: usize) -> LegendLayer {
    LegendLayer {
        layer_id: id,
        layer_name: format!("layer {}", id),
        legend: (0..swatches)
            .map(|i| LegendEntry {
                label: format!("swatch {}", i),
                image_data: "AAA".into(),
                content_type: None,
            })
            .collect(),
        parent_layer_id: NO_LAYER,
        sub_layer_ids: Vec::new(),
    }
}

fn service(infos: Vec<LayerInfo>) -> ServiceLayer {
    ServiceLayer {
        id: "svc".into(),
        title: "Service".into(),
        url: String::new(),
        visible: true,
        visible_layers: vec![NO_LAYER],
        layer_infos: infos,
    }
}

/// Build the menu for one service, returning the menu and its service header.
fn build(service: &ServiceLayer, legend: &LegendResponse, settings: &MenuSettings) -> (MenuTree, MenuItem) {
    let builder = MenuBuilder::new(settings);
    let (mut menu, toc) = builder.start();
    let header = builder.add_service(&mut menu, toc, service);
    let visible = VisibilitySet::from_published(&service.visible_layers);
    builder.add_layers(&mut menu, header, service, legend, &visible);
    (menu, header)
}

fn labels(menu: &MenuTree, parent: MenuItem) -> Vec<String> {
    menu.children(parent)
        .iter()
        .map(|&c| menu.entry(c).unwrap().to_string())
        .collect()
}

fn child_by_label(menu: &MenuTree, parent: MenuItem, label: &str) -> MenuItem {
    *menu
        .children(parent)
        .iter()
        .find(|&&c| menu.entry(c).unwrap().label() == label)
        .unwrap_or_else(|| panic!("no entry {}", label))
}

#[test]
fn given_fresh_builder_when_started_then_bar_holds_toc_popup() {
    let settings = MenuSettings::default();
    let (menu, toc) = MenuBuilder::new(&settings).start();

    assert_eq!(
        menu.entry(menu.root()).unwrap(),
        &MenuEntry::Bar {
            label: "tools-menu".into()
        }
    );
    assert_eq!(menu.children(menu.root()), &[toc]);
    assert_eq!(menu.entry(toc).unwrap().label(), "Layers");
    assert!(!menu.is_empty());
}

#[test]
fn given_parcels_fixture_when_building_then_groups_consume_their_sub_layers() {
    testing::init_test_setup();
    let (service, legend) = parcels();
    let (menu, header) = build(&service, &legend, &MenuSettings::default());

    assert_eq!(menu.entry(header).unwrap().to_string(), "[x] Parcels ▸");
    assert_eq!(
        labels(&menu, header),
        vec!["[x] Parcel Lines", "[ ] Zoning ▸", "[ ] Land Use ▸"]
    );

    let zoning = child_by_label(&menu, header, "Zoning");
    assert_eq!(
        labels(&menu, zoning),
        vec!["[x] Residential", "[ ] Commercial"]
    );

    // sub-layers appear once, nested under the group
    assert_eq!(menu.find_layer("parcels", 2).len(), 1);
    assert_eq!(menu.find_layer("parcels", 3).len(), 1);
}

#[test]
fn given_multi_swatch_layer_when_building_then_popup_of_rows_with_placeholder() {
    let (service, legend) = parcels();
    let (menu, header) = build(&service, &legend, &MenuSettings::default());

    let land_use = child_by_label(&menu, header, "Land Use");
    assert_eq!(
        labels(&menu, land_use),
        vec!["· Agricultural", "· ...", "· Urban"]
    );
    for &row in menu.children(land_use) {
        match menu.entry(row).unwrap() {
            MenuEntry::Leaf { image: Some(uri), .. } => {
                assert!(uri.starts_with("data:image/png;base64,"))
            }
            other => panic!("expected swatch row, got {:?}", other),
        }
    }

    // the popup itself is checkable and bound to layer 4
    match menu.entry(land_use).unwrap().binding() {
        Some(ToggleBinding::Layer { service, node }) => {
            assert_eq!(service, "parcels");
            assert_eq!(node.toggle_id(), 4);
        }
        other => panic!("unexpected binding {:?}", other),
    }
}

#[test]
fn given_swatch_with_content_type_when_building_then_its_mime_wins() {
    let (service, legend) = parcels();
    let (menu, _) = build(&service, &legend, &MenuSettings::default());

    let commercial = menu.find_layer("parcels", 3)[0];
    match menu.entry(commercial).unwrap() {
        MenuEntry::Checkable { image, .. } => assert_eq!(
            image.as_deref(),
            Some("data:image/gif;base64,R0lGODlhFAAUAIAAAP")
        ),
        other => panic!("expected checkable, got {:?}", other),
    }
}

#[test]
fn given_custom_menu_settings_when_building_then_labels_follow() {
    let (service, legend) = parcels();
    let settings = MenuSettings {
        title: "Legend".into(),
        anchor: "map-tools".into(),
        empty_label: "(unnamed)".into(),
        image_mime: "image/webp".into(),
    };
    let (menu, header) = build(&service, &legend, &settings);

    let rendered = menu.to_tree_string().to_string();
    assert!(rendered.starts_with("map-tools"));
    assert!(rendered.contains("Legend ▸"));

    let land_use = child_by_label(&menu, header, "Land Use");
    assert!(labels(&menu, land_use).contains(&"· (unnamed)".to_string()));
}

#[test]
fn given_layer_without_legend_record_when_building_then_skipped() {
    let service = service(vec![info(0, NO_LAYER, &[]), info(9, NO_LAYER, &[])]);
    let legend = LegendResponse {
        layers: vec![record(0, 1)],
    };

    let (menu, header) = build(&service, &legend, &MenuSettings::default());

    assert_eq!(labels(&menu, header), vec!["[ ] layer 0"]);
    assert!(menu.find_layer("svc", 9).is_empty());
}

#[test]
fn given_nested_groups_when_building_then_nested_popups() {
    let service = service(vec![
        info(1, NO_LAYER, &[2]),
        info(2, 1, &[3]),
        info(3, 2, &[]),
    ]);
    let legend = LegendResponse {
        layers: vec![record(3, 1)],
    };

    let (menu, header) = build(&service, &legend, &MenuSettings::default());

    assert_eq!(labels(&menu, header), vec!["[ ] info 1 ▸"]);
    let outer = menu.children(header)[0];
    assert_eq!(labels(&menu, outer), vec!["[ ] info 2 ▸"]);
    let inner = menu.children(outer)[0];
    assert_eq!(labels(&menu, inner), vec!["[ ] layer 3"]);
}

#[test]
fn given_cyclic_groups_when_building_then_terminates() {
    let service = service(vec![info(1, NO_LAYER, &[2]), info(2, 1, &[1])]);
    let legend = LegendResponse { layers: vec![] };

    let (menu, header) = build(&service, &legend, &MenuSettings::default());

    assert_eq!(menu.children(header).len(), 1);
    let outer = menu.children(header)[0];
    assert_eq!(menu.children(outer).len(), 1);
}

#[test]
fn given_sub_layer_missing_from_layer_infos_when_building_then_record_node_gets_group_parent() {
    let service = service(vec![info(1, NO_LAYER, &[7])]);
    let legend = LegendResponse {
        layers: vec![record(7, 1)],
    };

    let (menu, _) = build(&service, &legend, &MenuSettings::default());

    let entry = menu.find_layer("svc", 7)[0];
    match menu.entry(entry).unwrap().binding() {
        Some(ToggleBinding::Layer { node, .. }) => {
            assert_eq!(node.parent(), Some(1));
            assert_eq!(node.layer_id, Some(7));
        }
        other => panic!("unexpected binding {:?}", other),
    }
}

#[test]
fn given_service_without_title_when_adding_then_id_is_label() {
    let settings = MenuSettings::default();
    let builder = MenuBuilder::new(&settings);
    let (mut menu, toc) = builder.start();
    let mut svc = service(vec![]);
    svc.title.clear();
    svc.visible = false;

    let header = builder.add_service(&mut menu, toc, &svc);

    assert_eq!(menu.entry(header).unwrap().to_string(), "[ ] svc ▸");
    assert_eq!(menu.find_service("svc"), Some(header));
}

#[test]
fn given_sub_layer_listed_by_two_groups_when_building_then_under_both() {
    let service = service(vec![
        info(1, NO_LAYER, &[3]),
        info(2, NO_LAYER, &[3]),
        info(3, 1, &[]),
    ]);
    let legend = LegendResponse {
        layers: vec![record(3, 1)],
    };

    let (menu, header) = build(&service, &legend, &MenuSettings::default());

    assert_eq!(labels(&menu, header), vec!["[ ] info 1 ▸", "[ ] info 2 ▸"]);
    let first = child_by_label(&menu, header, "info 1");
    let second = child_by_label(&menu, header, "info 2");
    assert_eq!(labels(&menu, first), vec!["[ ] layer 3"]);
    assert_eq!(labels(&menu, second), vec!["[ ] layer 3"]);
    assert_eq!(menu.find_layer("svc", 3).len(), 2);
}

#[test]
fn given_populated_parent_when_adding_layers_again_then_counts_only_new_entries() {
    let (service, legend) = parcels();
    let settings = MenuSettings::default();
    let builder = MenuBuilder::new(&settings);
    let (mut menu, toc) = builder.start();
    let header = builder.add_service(&mut menu, toc, &service);
    let visible = VisibilitySet::from_published(&service.visible_layers);

    let first = builder.add_layers(&mut menu, header, &service, &legend, &visible);
    let second = builder.add_layers(&mut menu, header, &service, &legend, &visible);

    assert_eq!(first, 3);
    assert_eq!(second, 3);
    assert_eq!(menu.children(header).len(), 6);
}
