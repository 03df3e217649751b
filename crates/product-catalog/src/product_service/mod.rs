//! # Product Service
//!
//! The business layer of the catalog. It keeps an in-memory cache of the
//! products on disk, enforces that names are unique, and runs each operation
//! under its own cancellation scope.
//!
//! ## Structure
//!
//! - [`ProductService`] - Cache, validation, and the list/create/update/delete operations
//! - [`error`] - [`ProductError`] and its status code mapping
//! - [`cancellation`] - [`CancelHandle`] for cancelling the operation in flight
//!
//! ## Cache rules
//!
//! | Operation | Cache effect |
//! |-----------|--------------|
//! | `ensure_loaded` / `list` | Loaded from the repository once, then served from memory |
//! | `create` | Appended, then the whole cache is written; rolled back if the write fails |
//! | `update` | Reloaded from the repository after a successful update |
//! | `delete` | Reloaded from the repository after a successful delete |
//!
//! Once the repository has applied an update or delete, the operation
//! succeeds even if the reload after it fails; the cache is then left
//! unloaded and the next operation reads the file again.
//!
//! ## Usage
//!
//! ```rust
//! use json_repository::mock::MockRepository;
//! use json_repository::StatusCode;
//! use product_catalog::model::{Product, ProductRequest};
//! use product_catalog::product_service::ProductService;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut mock = MockRepository::<Product>::new();
//! mock.expect_read().return_ok(vec![]);
//! mock.expect_write().return_ok(());
//!
//! let mut service = ProductService::new(mock.client());
//! let created = service.create(ProductRequest::new("Widget")).await;
//! assert_eq!(created.status_code, StatusCode::Ok);
//!
//! let duplicate = service.create(ProductRequest::new("widget ")).await;
//! assert_eq!(duplicate.status_code, StatusCode::Conflict);
//! # }
//! ```

pub mod cancellation;
pub mod error;

pub use cancellation::CancelHandle;
pub use error::ProductError;

use crate::id;
use crate::model::{Product, ProductRequest};
use crate::validators::{validate_name, validate_price};
use json_repository::{FileRepository, ResponseResult};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Product operations over any [`FileRepository`] of products.
///
/// Mutating methods take `&mut self`; share a service between tasks only
/// behind your own synchronization. Use [`ProductService::cancel_handle`] to
/// cancel from elsewhere while an operation holds the borrow.
pub struct ProductService<R> {
    repository: R,
    products: Vec<Product>,
    loaded: bool,
    cancel: CancelHandle,
}

impl<R: FileRepository<Product>> ProductService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            products: Vec::new(),
            loaded: false,
            cancel: CancelHandle::new(),
        }
    }

    /// Cancels the operation in flight. Returns `false` when nothing was running.
    pub fn cancel(&self) -> bool {
        let cancelled = self.cancel.cancel();
        if cancelled {
            info!("Cancellation requested");
        }
        cancelled
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The cache as it stands, without loading.
    pub fn cached(&self) -> &[Product] {
        &self.products
    }

    /// Loads the cache on first use; afterwards returns it as is.
    #[instrument(skip(self))]
    pub async fn ensure_loaded(&mut self) -> ResponseResult<Vec<Product>> {
        let scope = self.cancel.arm();
        let loaded = self.try_ensure_loaded(scope.token()).await;
        loaded.map(|()| self.products.clone()).into()
    }

    /// All products, in file order. A failed load is reported, never an empty list.
    #[instrument(skip(self))]
    pub async fn list(&mut self) -> ResponseResult<Vec<Product>> {
        self.ensure_loaded().await
    }

    #[instrument(skip(self, request), fields(name = %request.name))]
    pub async fn create(&mut self, request: ProductRequest) -> ResponseResult<Product> {
        let scope = self.cancel.arm();
        self.try_create(request, scope.token()).await.into()
    }

    /// Replaces the product with the same id. Name and price are validated
    /// as for [`create`](Self::create); the name is stored trimmed.
    #[instrument(skip(self, product), fields(id = %product.id))]
    pub async fn update(&mut self, product: Product) -> ResponseResult<Product> {
        let scope = self.cancel.arm();
        self.try_update(product, scope.token()).await.into()
    }

    /// Removes the product with `id` and returns how many records went (0 or 1).
    #[instrument(skip(self))]
    pub async fn delete(&mut self, id: &str) -> ResponseResult<usize> {
        let scope = self.cancel.arm();
        self.try_delete(id, scope.token()).await.into()
    }

    async fn try_ensure_loaded(&mut self, cancel: &CancellationToken) -> Result<(), ProductError> {
        if self.loaded {
            return Ok(());
        }
        self.refresh(cancel).await
    }

    async fn refresh(&mut self, cancel: &CancellationToken) -> Result<(), ProductError> {
        self.loaded = false;
        let products = self.repository.read(cancel).await.into_result()?;
        debug!(size = products.len(), "Loaded products");
        self.products = products;
        self.loaded = true;
        Ok(())
    }

    /// Reloads after a committed change. A failure leaves the cache unloaded.
    async fn refresh_after_change(&mut self, cancel: &CancellationToken) {
        if let Err(e) = self.refresh(cancel).await {
            warn!(error = %e, "Reload after change failed, cache marked unloaded");
        }
    }

    async fn try_create(
        &mut self,
        request: ProductRequest,
        cancel: &CancellationToken,
    ) -> Result<Product, ProductError> {
        let name = validate_name(Some(request.name.as_str()))?;
        let price = validate_price(request.price)?;
        self.try_ensure_loaded(cancel).await?;

        if self.products.iter().any(|existing| existing.has_name(&name)) {
            return Err(ProductError::DuplicateName);
        }

        let product = Product::from_request(
            id::product_id(None),
            ProductRequest {
                name,
                price,
                ..request
            },
        );
        self.products.push(product.clone());

        let written = self.repository.write(self.products.clone(), cancel).await;
        if let Err(failure) = written.into_result() {
            self.products.pop();
            warn!(error = %failure, "Write failed, cache rolled back");
            return Err(failure.into());
        }

        info!(id = %product.id, size = self.products.len(), "Created");
        Ok(product)
    }

    async fn try_update(
        &mut self,
        product: Product,
        cancel: &CancellationToken,
    ) -> Result<Product, ProductError> {
        let name = validate_name(Some(product.name.as_str()))?;
        let price = validate_price(product.price)?;
        self.try_ensure_loaded(cancel).await?;

        let taken = self
            .products
            .iter()
            .any(|existing| existing.id != product.id && existing.has_name(&name));
        if taken {
            return Err(ProductError::NameTaken);
        }

        let updated = Product {
            name,
            price,
            ..product
        };
        let id = updated.id.clone();
        self.repository
            .update(Box::new(move |p: &Product| p.id == id), updated.clone(), cancel)
            .await
            .into_result()?;
        self.refresh_after_change(cancel).await;

        info!(id = %updated.id, "Updated");
        Ok(updated)
    }

    async fn try_delete(
        &mut self,
        id: &str,
        cancel: &CancellationToken,
    ) -> Result<usize, ProductError> {
        let target = id.to_string();
        let removed = self
            .repository
            .delete(Box::new(move |p: &Product| p.id == target), cancel)
            .await
            .into_result()?;
        self.refresh_after_change(cancel).await;

        info!(id, removed, size = self.products.len(), "Deleted");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use json_repository::mock::{create_mock_client, expect_read, MockRepository};
    use json_repository::StatusCode;
    use rust_decimal::Decimal;

    fn product(id: &str, name: &str, price: i64) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            price: Some(Decimal::new(price, 0)),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_ensure_loaded_returns_cache_when_already_loaded() {
        let mut mock = MockRepository::<Product>::new();
        mock.expect_read().return_ok(vec![product("1", "Cached", 1)]);
        let mut service = ProductService::new(mock.client());

        service.ensure_loaded().await;
        // Second call must not reach the repository.
        let result = service.ensure_loaded().await;

        assert!(result.success);
        assert_eq!(result.content.unwrap()[0].name, "Cached");
        mock.verify();
    }

    #[tokio::test]
    async fn test_ensure_loaded_loads_from_repository() {
        let mut mock = MockRepository::<Product>::new();
        mock.expect_read().return_ok(vec![product("1", "Loaded", 10)]);
        let mut service = ProductService::new(mock.client());

        let result = service.ensure_loaded().await;

        assert!(result.success);
        assert!(service.is_loaded());
        assert_eq!(result.content.unwrap().len(), 1);
        mock.verify();
    }

    #[tokio::test]
    async fn test_list_propagates_load_failure() {
        let mut mock = MockRepository::<Product>::new();
        mock.expect_read()
            .return_err(StatusCode::InternalServerError, "Serialization error: bad");
        let mut service = ProductService::new(mock.client());

        let result = service.list().await;

        assert!(!result.success);
        assert_eq!(result.status_code, StatusCode::InternalServerError);
        assert!(!service.is_loaded());
        assert!(service.cached().is_empty());
    }

    #[tokio::test]
    async fn test_create_new_product_succeeds() {
        let mut mock = MockRepository::<Product>::new();
        mock.expect_read().return_ok(vec![]);
        mock.expect_write().return_ok(());
        let mut service = ProductService::new(mock.client());

        let request = ProductRequest::new("  New ").with_price(Decimal::new(99, 0));
        let result = service.create(request).await;

        assert!(result.success);
        let created = result.content.unwrap();
        assert!(created.id.starts_with("pr-"));
        assert_eq!(created.name, "New");
        assert_eq!(mock.written(), vec![vec![created.clone()]]);
        assert_eq!(service.cached(), &[created]);
        mock.verify();
    }

    #[tokio::test]
    async fn test_create_duplicate_name_returns_conflict() {
        let mut mock = MockRepository::<Product>::new();
        mock.expect_read().return_ok(vec![product("1", "Duplicate", 10)]);
        let mut service = ProductService::new(mock.client());

        let result = service.create(ProductRequest::new(" duplicate")).await;

        assert!(!result.success);
        assert_eq!(result.status_code, StatusCode::Conflict);
        assert_eq!(result.error.as_deref(), Some("Product name already exists."));
        assert!(mock.written().is_empty());
        assert_eq!(service.cached().len(), 1);
        mock.verify();
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input_before_io() {
        let mock = MockRepository::<Product>::new();
        let mut service = ProductService::new(mock.client());

        let blank = service.create(ProductRequest::new("   ")).await;
        assert_eq!(blank.status_code, StatusCode::BadRequest);
        assert_eq!(blank.error.as_deref(), Some("Please enter a Name."));

        let negative = ProductRequest::new("Widget").with_price(Decimal::new(-1, 0));
        let result = service.create(negative).await;
        assert_eq!(result.status_code, StatusCode::BadRequest);

        assert!(!service.is_loaded());
        mock.verify();
    }

    #[tokio::test]
    async fn test_create_rolls_back_cache_when_write_fails() {
        let mut mock = MockRepository::<Product>::new();
        mock.expect_read().return_ok(vec![product("1", "Existing", 1)]);
        mock.expect_write()
            .return_err(StatusCode::InternalServerError, "I/O error: disk full");
        let mut service = ProductService::new(mock.client());

        let result = service.create(ProductRequest::new("Widget")).await;

        assert_eq!(result.status_code, StatusCode::InternalServerError);
        assert_eq!(result.error.as_deref(), Some("I/O error: disk full"));
        assert_eq!(service.cached(), &[product("1", "Existing", 1)]);
        mock.verify();
    }

    #[tokio::test]
    async fn test_update_new_name_succeeds() {
        let mut mock = MockRepository::<Product>::new();
        mock.expect_read().return_ok(vec![product("1", "Original", 5)]);
        mock.expect_update().return_ok(());
        mock.expect_read().return_ok(vec![product("1", "Updated", 5)]);
        let mut service = ProductService::new(mock.client());

        let result = service.update(product("1", "Updated ", 5)).await;

        assert!(result.success);
        assert_eq!(result.content.unwrap().name, "Updated");
        assert_eq!(mock.updated(), vec![product("1", "Updated", 5)]);
        assert_eq!(service.cached()[0].name, "Updated");
        mock.verify();
    }

    #[tokio::test]
    async fn test_update_keeping_own_name_succeeds() {
        let mut mock = MockRepository::<Product>::new();
        mock.expect_read().return_ok(vec![product("1", "Widget", 5)]);
        mock.expect_update().return_ok(());
        mock.expect_read().return_ok(vec![product("1", "Widget", 7)]);
        let mut service = ProductService::new(mock.client());

        let result = service.update(product("1", "WIDGET", 7)).await;

        assert!(result.success);
        mock.verify();
    }

    #[tokio::test]
    async fn test_update_duplicate_name_returns_conflict() {
        let mut mock = MockRepository::<Product>::new();
        mock.expect_read().return_ok(vec![product("2", "Existing", 1)]);
        let mut service = ProductService::new(mock.client());

        let result = service.update(product("3", "Existing", 5)).await;

        assert!(!result.success);
        assert_eq!(result.status_code, StatusCode::Conflict);
        assert_eq!(result.error.as_deref(), Some("Product name is already taken."));
        assert!(mock.updated().is_empty());
        mock.verify();
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_not_found() {
        let mut mock = MockRepository::<Product>::new();
        mock.expect_read().return_ok(vec![]);
        mock.expect_update().return_err(StatusCode::NotFound, "Item not found");
        let mut service = ProductService::new(mock.client());

        let result = service.update(product("9", "Ghost", 1)).await;

        assert_eq!(result.status_code, StatusCode::NotFound);
        assert!(service.is_loaded());
        mock.verify();
    }

    #[tokio::test]
    async fn test_delete_succeeds_and_refreshes() {
        let mut mock = MockRepository::<Product>::new();
        mock.expect_delete().return_ok(1);
        mock.expect_read().return_ok(vec![product("2", "Bob", 1)]);
        let mut service = ProductService::new(mock.client());

        let result = service.delete("1").await;

        assert!(result.success);
        assert_eq!(result.content, Some(1));
        assert_eq!(service.cached(), &[product("2", "Bob", 1)]);
        mock.verify();
    }

    #[tokio::test]
    async fn test_update_reports_success_when_reload_fails() {
        let mut mock = MockRepository::<Product>::new();
        mock.expect_read().return_ok(vec![product("1", "A", 5)]);
        mock.expect_update().return_ok(());
        mock.expect_read()
            .return_err(StatusCode::InternalServerError, "Operation cancelled");
        let mut service = ProductService::new(mock.client());

        let result = service.update(product("1", "B", 5)).await;

        assert!(result.success);
        assert_eq!(result.content.unwrap().name, "B");
        assert_eq!(mock.updated(), vec![product("1", "B", 5)]);
        assert!(!service.is_loaded());
        mock.verify();
    }

    #[tokio::test]
    async fn test_delete_reports_success_when_reload_fails() {
        let mut mock = MockRepository::<Product>::new();
        mock.expect_delete().return_ok(1);
        mock.expect_read()
            .return_err(StatusCode::InternalServerError, "I/O error: busy");
        mock.expect_read().return_ok(vec![]);
        let mut service = ProductService::new(mock.client());

        let result = service.delete("1").await;

        assert!(result.success);
        assert_eq!(result.content, Some(1));
        assert!(!service.is_loaded());

        // The next operation reloads the cache.
        let listed = service.list().await;
        assert_eq!(listed.content, Some(vec![]));
        assert!(service.is_loaded());
        mock.verify();
    }

    #[tokio::test]
    async fn test_cancel_without_operation_is_noop() {
        let mock = MockRepository::<Product>::new();
        let service = ProductService::new(mock.client());

        assert!(!service.cancel());
        assert!(!service.cancel_handle().is_armed());
    }

    #[tokio::test]
    async fn test_cancel_reaches_operation_in_flight() {
        let (client, mut receiver) = create_mock_client::<Product>(10);
        let mut service = ProductService::new(client);
        let handle = service.cancel_handle();

        let list_task = tokio::spawn(async move {
            let result = service.list().await;
            (service, result)
        });

        let (token, responder) = expect_read(&mut receiver)
            .await
            .expect("Expected Read request");
        assert!(handle.is_armed());
        assert!(handle.cancel());
        assert!(token.is_cancelled());
        responder
            .send(ResponseResult::fail(
                StatusCode::InternalServerError,
                "Operation cancelled",
            ))
            .unwrap();

        let (service, result) = list_task.await.unwrap();
        assert_eq!(result.status_code, StatusCode::InternalServerError);
        assert_eq!(result.error.as_deref(), Some("Operation cancelled"));
        assert!(!service.is_loaded());
        assert!(!handle.is_armed());
    }
}
