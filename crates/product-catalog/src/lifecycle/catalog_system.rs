use crate::config::CatalogConfig;
use crate::model::Product;
use crate::product_service::ProductService;
use json_repository::{JsonFileRepository, RepositoryActor, RepositoryClient, RepositoryError};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{error, info};

/// The product service as wired by [`CatalogSystem`].
pub type CatalogService = ProductService<RepositoryClient<Product>>;

/// The single [`CatalogService`] of a system. Lock it to run an operation.
pub type SharedCatalog = Arc<Mutex<CatalogService>>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to open catalog file: {0}")]
    Open(#[from] RepositoryError),
    #[error("Repository actor task failed: {0}")]
    ActorFailed(String),
}

/// The runtime orchestrator for the catalog.
///
/// `CatalogSystem` is responsible for:
/// - **Storage**: Opening (and if needed creating) the catalog file
/// - **Lifecycle Management**: Starting and stopping the repository actor
/// - **Dependency Wiring**: Owning the one [`ProductService`] every caller shares
///
/// There is exactly one service per system, so one cache writes the file.
/// Its lock orders the callers' operations.
///
/// # Example
///
/// ```ignore
/// let system = CatalogSystem::start(&CatalogConfig::from_env()?)?;
/// let mut products = system.service().lock_owned().await;
///
/// products.create(ProductRequest::new("Widget")).await;
///
/// drop(products);
/// system.shutdown().await?;
/// ```
pub struct CatalogSystem {
    client: RepositoryClient<Product>,
    service: SharedCatalog,
    handle: tokio::task::JoinHandle<()>,
}

impl CatalogSystem {
    /// Opens the catalog file and spawns its repository actor.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let repository = JsonFileRepository::<Product>::new(config.file_path())?;
        let (actor, client) = RepositoryActor::new(repository, config.channel_buffer);
        let handle = tokio::spawn(actor.run());
        let service = Arc::new(Mutex::new(ProductService::new(client.clone())));

        info!(path = %config.file_path().display(), buffer = config.channel_buffer, "Catalog started");
        Ok(Self {
            client,
            service,
            handle,
        })
    }

    /// A handle to the system's product service.
    ///
    /// Every handle, lock guard, and client clone keeps the actor alive; drop
    /// them all before [`shutdown`](Self::shutdown) or it will wait for them.
    pub fn service(&self) -> SharedCatalog {
        self.service.clone()
    }

    /// A raw client for the product file, for callers that bypass the service.
    pub fn repository(&self) -> RepositoryClient<Product> {
        self.client.clone()
    }

    /// Releases the system's own service handle and client, then waits for the actor to drain its
    /// mailbox and stop.
    pub async fn shutdown(self) -> Result<(), CatalogError> {
        info!("Shutting down catalog...");

        // The actor stops once the last sender is gone.
        drop(self.service);
        drop(self.client);

        if let Err(e) = self.handle.await {
            error!("Repository actor task failed: {:?}", e);
            return Err(CatalogError::ActorFailed(e.to_string()));
        }

        info!("Catalog shutdown complete.");
        Ok(())
    }
}
