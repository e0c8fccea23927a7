//! Domain entities: core data structures

use serde::{Deserialize, Serialize};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::visibility::NO_LAYER;

fn no_parent() -> i64 {
    NO_LAYER
}

/// One legend swatch: a label and its base64 image payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendEntry {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub image_data: String,
    /// MIME type of `image_data`; falls back to the configured default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl LegendEntry {
    /// Label to display, substituting `empty_label` for blank labels.
    pub fn display_label<'a>(&'a self, empty_label: &'a str) -> &'a str {
        if self.label.is_empty() {
            empty_label
        } else {
            &self.label
        }
    }

    /// `data:` URI for the swatch image.
    pub fn data_uri(&self, default_mime: &str) -> String {
        let mime = self.content_type.as_deref().unwrap_or(default_mime);
        format!("data:{};base64,{}", mime, self.image_data)
    }
}

/// Legend record of one sub-layer, as returned by the legend endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendLayer {
    pub layer_id: i64,
    #[serde(default)]
    pub layer_name: String,
    #[serde(default)]
    pub legend: Vec<LegendEntry>,
    #[serde(default = "no_parent")]
    pub parent_layer_id: i64,
    #[serde(default, deserialize_with = "nullable_ids")]
    pub sub_layer_ids: Vec<i64>,
}

/// Legend endpoint response for one service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendResponse {
    #[serde(default)]
    pub layers: Vec<LegendLayer>,
}

impl LegendResponse {
    /// Find the legend record for a sub-layer id.
    pub fn find(&self, layer_id: i64) -> Option<&LegendLayer> {
        self.layers.iter().find(|l| l.layer_id == layer_id)
    }
}

/// The service's own description of one sub-layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerInfo {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default = "no_parent")]
    pub parent_layer_id: i64,
    #[serde(default, deserialize_with = "nullable_ids")]
    pub sub_layer_ids: Vec<i64>,
}

impl LayerInfo {
    pub fn is_group(&self) -> bool {
        !self.sub_layer_ids.is_empty()
    }
}

/// A map service layer with its sub-layer hierarchy and current visibility.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLayer {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub visible_layers: Vec<i64>,
    #[serde(default)]
    pub layer_infos: Vec<LayerInfo>,
}

fn default_true() -> bool {
    true
}

impl ServiceLayer {
    pub fn layer_info(&self, id: i64) -> Option<&LayerInfo> {
        self.layer_infos.iter().find(|info| info.id == id)
    }
}

/// All operational services of a map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapDocument {
    #[serde(default)]
    pub services: Vec<ServiceLayer>,
}

impl MapDocument {
    /// Reject documents that address two services with the same id.
    pub fn validate(&self) -> DomainResult<()> {
        let mut seen = std::collections::HashSet::new();
        for service in &self.services {
            if !seen.insert(service.id.as_str()) {
                return Err(DomainError::InvalidDocument(format!(
                    "duplicate service id: {}",
                    service.id
                )));
            }
        }
        Ok(())
    }

    pub fn service(&self, id: &str) -> Option<&ServiceLayer> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn service_mut(&mut self, id: &str) -> Option<&mut ServiceLayer> {
        self.services.iter_mut().find(|s| s.id == id)
    }
}

/// A node of a service's layer hierarchy, as seen by the toggle engine.
///
/// Built either from the service's [`LayerInfo`] (group headers and
/// multi-swatch layers) or from a [`LegendLayer`] record (plain checkable
/// layers); the latter carries `layer_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayerNode {
    pub id: i64,
    pub layer_id: Option<i64>,
    pub parent_layer_id: i64,
    pub sub_layer_ids: Vec<i64>,
    pub legend: Vec<LegendEntry>,
}

impl LayerNode {
    /// Leaf node without parent, children or legend.
    pub fn leaf(id: i64) -> Self {
        Self {
            id,
            layer_id: None,
            parent_layer_id: NO_LAYER,
            sub_layer_ids: Vec::new(),
            legend: Vec::new(),
        }
    }

    pub fn with_parent(mut self, parent_layer_id: i64) -> Self {
        self.parent_layer_id = parent_layer_id;
        self
    }

    pub fn with_sub_layers(mut self, sub_layer_ids: impl Into<Vec<i64>>) -> Self {
        self.sub_layer_ids = sub_layer_ids.into();
        self
    }

    pub fn with_layer_id(mut self, layer_id: i64) -> Self {
        self.layer_id = Some(layer_id);
        self
    }

    pub fn from_layer_info(info: &LayerInfo) -> Self {
        Self {
            id: info.id,
            layer_id: None,
            parent_layer_id: info.parent_layer_id,
            sub_layer_ids: info.sub_layer_ids.clone(),
            legend: Vec::new(),
        }
    }

    pub fn from_legend_layer(layer: &LegendLayer) -> Self {
        Self {
            id: layer.layer_id,
            layer_id: Some(layer.layer_id),
            parent_layer_id: layer.parent_layer_id,
            sub_layer_ids: layer.sub_layer_ids.clone(),
            legend: layer.legend.clone(),
        }
    }

    /// Identifier flipped by a self toggle: `layer_id`, then `id`, then `0`.
    /// A zero value counts as unset.
    pub fn toggle_id(&self) -> i64 {
        self.layer_id
            .filter(|&id| id != 0)
            .or(Some(self.id).filter(|&id| id != 0))
            .unwrap_or(0)
    }

    pub fn is_group(&self) -> bool {
        !self.sub_layer_ids.is_empty()
    }

    pub fn parent(&self) -> Option<i64> {
        (self.parent_layer_id >= 0).then_some(self.parent_layer_id)
    }
}

/// `subLayerIds` may be `null` in service metadata.
fn nullable_ids<'de, D>(deserializer: D) -> Result<Vec<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<i64>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_null_sub_layer_ids_when_decoding_then_empty() {
        let info: LayerInfo =
            serde_json::from_str(r#"{"id": 3, "name": "Roads", "parentLayerId": -1, "subLayerIds": null}"#)
                .unwrap();
        assert!(info.sub_layer_ids.is_empty());
        assert!(!info.is_group());
    }

    #[test]
    fn given_legend_record_without_hierarchy_when_decoding_then_defaults_apply() {
        let layer: LegendLayer = serde_json::from_str(
            r#"{"layerId": 4, "layerName": "Parcels", "legend": [{"label": "", "imageData": "AAA"}]}"#,
        )
        .unwrap();
        assert_eq!(layer.parent_layer_id, NO_LAYER);
        assert!(layer.sub_layer_ids.is_empty());
        assert_eq!(layer.legend[0].display_label("..."), "...");
        assert_eq!(layer.legend[0].data_uri("image/png"), "data:image/png;base64,AAA");
    }

    #[test]
    fn given_zero_layer_id_when_resolving_toggle_id_then_falls_back_to_id() {
        assert_eq!(LayerNode::leaf(5).with_layer_id(0).toggle_id(), 5);
        assert_eq!(LayerNode::leaf(5).with_layer_id(8).toggle_id(), 8);
        assert_eq!(LayerNode::leaf(0).toggle_id(), 0);
    }

    #[test]
    fn given_duplicate_service_ids_when_validating_then_rejects() {
        let service: ServiceLayer = serde_json::from_str(r#"{"id": "a"}"#).unwrap();
        let doc = MapDocument {
            services: vec![service.clone(), service],
        };
        assert!(matches!(doc.validate(), Err(DomainError::InvalidDocument(_))));
    }
}
