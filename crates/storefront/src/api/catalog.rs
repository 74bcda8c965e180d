//! Product and category endpoints.
//!
//! Reads are cached (5-minute TTL); admin mutations invalidate the affected
//! entries. Search results are never cached - the query space is unbounded
//! and stale search results are more confusing than slow ones.

use reqwest::Method;
use tracing::{debug, instrument};

use easybuy_core::{CategoryId, ProductId};

use crate::error::ApiError;

use super::ApiClient;
use super::types::{
    Category, CategoryPatch, CategoryRecord, NewCategory, NewProduct, Product, ProductPatch,
    ProductRecord, convert_category, convert_product,
};

/// Cache keys for catalog reads.
mod cache_keys {
    pub const PRODUCTS: &str = "products";
    pub const CATEGORIES: &str = "categories";

    pub fn product(id: easybuy_core::ProductId) -> String {
        format!("product:{id}")
    }
}

/// Cached catalog values.
#[derive(Clone)]
pub(super) enum CacheValue {
    Product(Box<Product>),
    Products(Vec<Product>),
    Categories(Vec<Category>),
}

impl ApiClient {
    // =========================================================================
    // Product Methods
    // =========================================================================

    /// `GET /api/product` - the full product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        if let Some(CacheValue::Products(products)) = self.cache_get(cache_keys::PRODUCTS).await {
            debug!("cache hit for products");
            return Ok(products);
        }

        let records: Vec<ProductRecord> = self
            .execute(self.request(Method::GET, "/api/product"))
            .await?;
        let products = records
            .into_iter()
            .map(convert_product)
            .collect::<Result<Vec<_>, _>>()?;

        self.cache_put(
            cache_keys::PRODUCTS.to_owned(),
            CacheValue::Products(products.clone()),
        )
        .await;

        Ok(products)
    }

    /// `GET /api/product/get/:id` - one product.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] when the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        let cache_key = cache_keys::product(id);
        if let Some(CacheValue::Product(product)) = self.cache_get(&cache_key).await {
            debug!("cache hit for product");
            return Ok(*product);
        }

        let record: ProductRecord = self
            .execute(self.request(Method::GET, &format!("/api/product/get/{id}")))
            .await?;
        let product = convert_product(record)?;

        self.cache_put(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// `GET /api/product/search?query=` - name search. Uncached.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>, ApiError> {
        let records: Vec<ProductRecord> = self
            .execute(
                self.request(Method::GET, "/api/product/search")
                    .query(&[("query", query)]),
            )
            .await?;

        records.into_iter().map(convert_product).collect()
    }

    /// `POST /api/product` - create a product (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, new), fields(name = %new.name))]
    pub async fn create_product(&self, new: &NewProduct) -> Result<Product, ApiError> {
        let record: ProductRecord = self
            .execute(
                self.request(Method::POST, "/api/product")
                    .json(&new.to_body()),
            )
            .await?;
        let product = convert_product(record)?;

        self.cache_invalidate(cache_keys::PRODUCTS).await;

        Ok(product)
    }

    /// `PUT /api/product/:id` - update a product (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, patch), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, ApiError> {
        let record: ProductRecord = self
            .execute(
                self.request(Method::PUT, &format!("/api/product/{id}"))
                    .json(&patch.to_body()),
            )
            .await?;
        let product = convert_product(record)?;

        self.cache_invalidate(cache_keys::PRODUCTS).await;
        self.cache_invalidate(&cache_keys::product(id)).await;

        Ok(product)
    }

    /// `DELETE /api/product/:id` - delete a product (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        self.execute_unit(self.request(Method::DELETE, &format!("/api/product/{id}")))
            .await?;

        self.cache_invalidate(cache_keys::PRODUCTS).await;
        self.cache_invalidate(&cache_keys::product(id)).await;

        Ok(())
    }

    // =========================================================================
    // Category Methods
    // =========================================================================

    /// `GET /api/category/list` - all categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_categories(&self) -> Result<Vec<Category>, ApiError> {
        if let Some(CacheValue::Categories(categories)) =
            self.cache_get(cache_keys::CATEGORIES).await
        {
            debug!("cache hit for categories");
            return Ok(categories);
        }

        let records: Vec<CategoryRecord> = self
            .execute(self.request(Method::GET, "/api/category/list"))
            .await?;
        let categories: Vec<Category> = records.into_iter().map(convert_category).collect();

        self.cache_put(
            cache_keys::CATEGORIES.to_owned(),
            CacheValue::Categories(categories.clone()),
        )
        .await;

        Ok(categories)
    }

    /// `POST /api/category/create` - create a category (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, new), fields(name = %new.name))]
    pub async fn create_category(&self, new: &NewCategory) -> Result<Category, ApiError> {
        let record: CategoryRecord = self
            .execute(self.request(Method::POST, "/api/category/create").json(new))
            .await?;

        self.cache_invalidate(cache_keys::CATEGORIES).await;

        Ok(convert_category(record))
    }

    /// `PATCH /api/category/update/:id` - update a category (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, patch), fields(category_id = %id))]
    pub async fn update_category(
        &self,
        id: CategoryId,
        patch: &CategoryPatch,
    ) -> Result<Category, ApiError> {
        let record: CategoryRecord = self
            .execute(
                self.request(Method::PATCH, &format!("/api/category/update/{id}"))
                    .json(patch),
            )
            .await?;

        self.cache_invalidate(cache_keys::CATEGORIES).await;

        Ok(convert_category(record))
    }

    /// `PATCH /api/category/delete/soft/:id` - archive a category (admin).
    ///
    /// The category stays in the backend for existing products but drops
    /// out of listings.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn archive_category(&self, id: CategoryId) -> Result<(), ApiError> {
        self.execute_unit(
            self.request(Method::PATCH, &format!("/api/category/delete/soft/{id}")),
        )
        .await?;

        self.cache_invalidate(cache_keys::CATEGORIES).await;

        Ok(())
    }

    /// `DELETE /api/category/delete/hard/:id` - permanently delete a
    /// category (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete_category(&self, id: CategoryId) -> Result<(), ApiError> {
        self.execute_unit(
            self.request(Method::DELETE, &format!("/api/category/delete/hard/{id}")),
        )
        .await?;

        self.cache_invalidate(cache_keys::CATEGORIES).await;

        Ok(())
    }
}
