//! # System Lifecycle & Orchestration
//!
//! This module manages the runtime lifecycle of the catalog: opening the data
//! file, starting the repository actor, wiring product services to it, and
//! shutting it down.
//!
//! ## The CatalogSystem Pattern
//!
//! ```rust,ignore
//! impl CatalogSystem {
//!     pub fn start(config: &CatalogConfig) -> Result<Self, CatalogError> {
//!         // 1. Open the file (created with `[]` if absent)
//!         let repository = JsonFileRepository::<Product>::new(config.file_path())?;
//!
//!         // 2. Create the actor and start it
//!         let (actor, client) = RepositoryActor::new(repository, config.channel_buffer);
//!         let handle = tokio::spawn(actor.run());
//!
//!         // 3. Build the one product service over the actor's client
//!         let service = Arc::new(Mutex::new(ProductService::new(client.clone())));
//!
//!         Ok(Self { client, service, handle })
//!     }
//! }
//! ```
//!
//! [`CatalogSystem::service`] hands out handles to that one service. Callers
//! take turns through its lock, so they all see one cache, and a create can
//! never write back a stale copy of the file that drops another caller's
//! product. The actor below serializes the file operations themselves.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop all service handles and clients** - Closes the sender side of the channel
//! 2. **Actor detects closure** - `receiver.recv()` returns `None` after the queue drains
//! 3. **Await completion** - [`CatalogSystem::shutdown`] waits for the actor task
//!
//! Requests already queued are still answered, so no write is lost on exit.
//!
//! ## Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging; see the
//! [`tracing`](self::tracing) module for levels and sample output.

pub mod catalog_system;
pub mod tracing;

pub use catalog_system::*;
pub use self::tracing::setup_tracing;
