//! Product image upload endpoint.

use reqwest::Method;
use reqwest::multipart::{Form, Part};
use tracing::instrument;

use easybuy_core::ProductId;

use crate::error::ApiError;

use super::ApiClient;
use super::types::{ProductImage, UploadResponseBody};

impl ApiClient {
    /// `GET /api/product-images/:product_id` - stored images for a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn list_product_images(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<ProductImage>, ApiError> {
        self.execute(self.request(Method::GET, &format!("/api/product-images/{product_id}")))
            .await
    }

    /// `POST /api/product-images` - multipart upload of one product image.
    ///
    /// The request carries the binary under the `image` field plus the
    /// owning `product_id` and an `is_primary` flag. The backend answers
    /// with either `{image_url}` or `{images: [...]}`; both are normalized
    /// to a list of stored URLs.
    ///
    /// # Errors
    ///
    /// [`ApiError::Upload`] when the backend rejects the file;
    /// [`ApiError::Unauthorized`] / [`ApiError::Network`] /
    /// [`ApiError::Server`] pass through unchanged.
    #[instrument(skip(self, bytes), fields(product_id = %product_id, filename, size = bytes.len()))]
    pub async fn upload_product_image(
        &self,
        product_id: ProductId,
        filename: &str,
        bytes: Vec<u8>,
        is_primary: bool,
    ) -> Result<Vec<String>, ApiError> {
        let image = Part::bytes(bytes).file_name(filename.to_owned());
        let form = Form::new()
            .text("product_id", product_id.to_string())
            .text("is_primary", is_primary.to_string())
            .part("image", image);

        let response: UploadResponseBody = self
            .execute(
                self.request(Method::POST, "/api/product-images")
                    .multipart(form),
            )
            .await
            .map_err(|err| match err {
                ApiError::Rejected { status, message } => {
                    ApiError::Upload(format!("HTTP {status}: {message}"))
                }
                ApiError::Decode(err) => ApiError::Upload(format!("unreadable response: {err}")),
                other => other,
            })?;

        Ok(response.into_urls())
    }
}
