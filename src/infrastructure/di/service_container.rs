//! Service container for dependency injection
//!
//! Wires up the TOC service with its collaborators.

use std::sync::Arc;

use tracing::debug;

use crate::application::services::TocService;
use crate::config::Settings;
use crate::infrastructure::traits::{FileLegendSource, FileSystem, InMemoryMap, RealFileSystem};
use crate::infrastructure::{InfraError, InfraResult};

/// Container holding settings and I/O implementations.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(settings: Settings, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            settings: Arc::new(settings),
            fs,
        }
    }

    /// Load the configured map document.
    pub fn load_map(&self) -> InfraResult<InMemoryMap> {
        let path = &self.settings.map_file;
        debug!("load map document: {}", path.display());
        let map = InMemoryMap::load(self.fs.as_ref(), path)
            .map_err(|e| InfraError::io(format!("load map document {}", path.display()), e))?;
        map.document().validate()?;
        Ok(map)
    }

    /// Legend source reading from the configured legend directory.
    pub fn legend_source(&self) -> FileLegendSource {
        FileLegendSource::new(self.fs.clone(), self.settings.legend_dir.clone())
    }

    /// TOC session over the configured map, menu already built.
    pub fn toc_service(&self) -> InfraResult<TocService> {
        let map = self.load_map()?;
        let mut toc = TocService::new(
            Box::new(map),
            Box::new(self.legend_source()),
            self.settings.as_ref().clone(),
        );
        toc.build_menu()?;
        Ok(toc)
    }
}
