//! # Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging with the
//! `tracing` crate for the whole catalog.
//!
//! ## Configuration
//!
//! - **Log levels** from the `RUST_LOG` environment variable
//! - **Compact format** with span names inline (`create{name="Widget"}: Created`)
//! - **No module targets**: the repository actor logs an `entity_type` field instead
//! - **stderr output**, so the console menu on stdout stays readable
//!
//! ## What Gets Traced
//!
//! - **Actor lifecycle**: start, shutdown, and the number of requests handled
//! - **Repository I/O**: reads and writes at `debug`, updates and deletes at `info`,
//!   failures at `warn` with their status code
//! - **Service operations**: one span per `list`/`create`/`update`/`delete` call
//!
//! ## Usage Examples
//!
//! ```bash
//! # Lifecycle and mutations
//! RUST_LOG=info cargo run -p product-catalog
//!
//! # Every request the actor receives, with record sizes
//! RUST_LOG=debug cargo run -p product-catalog
//!
//! # Only the repository crate
//! RUST_LOG=json_repository=debug cargo run -p product-catalog
//! ```
//!
//! With `RUST_LOG=info`, adding one product looks like:
//!
//! ```text
//! INFO Repository actor started entity_type="Product" path=data/data.json
//! INFO create: Created name="Widget" id="pr-6f1c..." size=1
//! ```

pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // entity_type and path identify the source
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
