//! Service container for dependency injection
//!
//! Wires up the family tree service with its I/O boundaries.

use std::sync::Arc;

use crate::application::services::FamilyTreeService;
use crate::config::Settings;
use crate::infrastructure::traits::{FileSystem, RealFileSystem, Selector, SkimSelector};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Interactive file selector
    pub selector: Arc<dyn Selector>,

    pub family: FamilyTreeService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        Self::with_deps(settings, Arc::new(RealFileSystem), Arc::new(SkimSelector))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        selector: Arc<dyn Selector>,
    ) -> Self {
        let family = FamilyTreeService::new(fs, settings.parse_options());
        let settings = Arc::new(settings);

        Self {
            settings,
            selector,
            family,
        }
    }
}
