//! I/O boundary traits for testability
//!
//! These traits abstract the external collaborators of the legend menu: the
//! filesystem, the legend-metadata fetch, the map service mutators and the
//! place the menu gets attached to. Services are tested with mock implementations.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::{DomainError, DomainResult, LegendResponse, MapDocument, MenuTree, ServiceLayer};

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;
}

/// Legend-metadata fetch for one service.
pub trait LegendSource {
    /// Fetch and decode the legend response of `service`.
    fn fetch(&self, service: &ServiceLayer) -> io::Result<LegendResponse>;
}

/// The map side: owns the operational services and receives visibility updates.
pub trait MapService {
    /// Current state of all services.
    fn services(&self) -> &[ServiceLayer];

    /// Replace the visible sub-layer list of a service.
    fn set_visible_layers(&mut self, service: &str, ids: &[i64]) -> DomainResult<()>;

    /// Show or hide a whole service.
    fn set_visibility(&mut self, service: &str, visible: bool) -> DomainResult<()>;
}

/// Attachment point for a built menu.
pub trait MenuAnchor {
    /// Place `menu` under the anchor named `anchor`.
    fn attach(&self, anchor: &str, menu: &MenuTree) -> io::Result<()>;
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }
}

fn invalid_data(path: &Path, e: serde_json::Error) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("{}: {}", path.display(), e),
    )
}

/// Legend source reading pre-fetched responses from `<dir>/<service id>.json`.
pub struct FileLegendSource {
    fs: Arc<dyn FileSystem>,
    dir: PathBuf,
}

impl FileLegendSource {
    pub fn new(fs: Arc<dyn FileSystem>, dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            dir: dir.into(),
        }
    }

    pub fn path_for(&self, service: &ServiceLayer) -> PathBuf {
        self.dir.join(format!("{}.json", service.id))
    }
}

impl LegendSource for FileLegendSource {
    fn fetch(&self, service: &ServiceLayer) -> io::Result<LegendResponse> {
        let path = self.path_for(service);
        debug!("fetch legend: service={} path={}", service.id, path.display());
        let content = self.fs.read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| invalid_data(&path, e))
    }
}

/// Map service backed by an in-memory map document.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMap {
    document: MapDocument,
}

impl InMemoryMap {
    pub fn new(document: MapDocument) -> Self {
        Self { document }
    }

    /// Load a map document from JSON.
    pub fn load(fs: &dyn FileSystem, path: &Path) -> io::Result<Self> {
        let content = fs.read_to_string(path)?;
        let document: MapDocument =
            serde_json::from_str(&content).map_err(|e| invalid_data(path, e))?;
        Ok(Self::new(document))
    }

    pub fn document(&self) -> &MapDocument {
        &self.document
    }

    fn service_mut(&mut self, service: &str) -> DomainResult<&mut ServiceLayer> {
        self.document
            .service_mut(service)
            .ok_or_else(|| DomainError::UnknownService(service.to_string()))
    }
}

impl MapService for InMemoryMap {
    fn services(&self) -> &[ServiceLayer] {
        &self.document.services
    }

    fn set_visible_layers(&mut self, service: &str, ids: &[i64]) -> DomainResult<()> {
        info!("set_visible_layers: service={} ids={:?}", service, ids);
        self.service_mut(service)?.visible_layers = ids.to_vec();
        Ok(())
    }

    fn set_visibility(&mut self, service: &str, visible: bool) -> DomainResult<()> {
        info!("set_visibility: service={} visible={}", service, visible);
        self.service_mut(service)?.visible = visible;
        Ok(())
    }
}

/// Anchor that renders the menu as a text tree on stdout.
#[derive(Debug, Default)]
pub struct TerminalAnchor;

impl MenuAnchor for TerminalAnchor {
    fn attach(&self, anchor: &str, menu: &MenuTree) -> io::Result<()> {
        use std::io::Write;

        debug!("attach menu: anchor={} entries={}", anchor, menu.len());
        let mut out = io::stdout().lock();
        write!(out, "{}", menu.to_tree_string())?;
        out.flush()
    }
}
