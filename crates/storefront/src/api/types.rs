//! Request, response, and domain types for the backend API.
//!
//! Wire structs mirror the backend's JSON exactly (UUID strings, float
//! prices, free-form role strings) and stay private to this module tree.
//! Conversion into domain types happens once, at the boundary, so the rest
//! of the crate never sees a float price or an unnormalized role.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use easybuy_core::{CategoryId, Email, ImageId, Price, ProductId, Role, UserId};

use crate::error::ApiError;
use crate::session::CurrentUser;

// =============================================================================
// Domain Types
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Long-form description.
    pub description: Option<String>,
    /// Unit price.
    pub price: Price,
    /// Units in stock, per the backend. Stock checks are a presentation
    /// concern; the cart does not consult this.
    pub stock_quantity: i32,
    /// Owning category, if assigned.
    pub category_id: Option<CategoryId>,
    /// Primary image URL, if any.
    pub image_url: Option<String>,
    /// Backend creation timestamp.
    pub created_at: Option<NaiveDateTime>,
    /// Backend update timestamp.
    pub updated_at: Option<NaiveDateTime>,
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category ID.
    pub id: CategoryId,
    /// Display name.
    pub name: String,
    /// Long-form description.
    pub description: Option<String>,
    /// Backend creation timestamp.
    pub created_at: Option<NaiveDateTime>,
    /// Backend update timestamp.
    pub updated_at: Option<NaiveDateTime>,
}

/// A stored product image.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductImage {
    /// Image ID, when the backend reports one.
    #[serde(default)]
    pub id: Option<ImageId>,
    /// The product this image belongs to.
    pub product_id: ProductId,
    /// Public URL of the stored image.
    pub image_url: String,
    /// Whether this is the product's primary image.
    #[serde(default)]
    pub is_primary: bool,
}

/// A successful login or registration: the new bearer token plus the
/// verified user it belongs to.
#[derive(Debug, Clone)]
pub struct AuthSuccess {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// The authenticated user, role already normalized.
    pub user: CurrentUser,
}

// =============================================================================
// Request Types
// =============================================================================

/// Fields for creating a product (admin).
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Display name.
    pub name: String,
    /// Long-form description.
    pub description: Option<String>,
    /// Unit price.
    pub price: Price,
    /// Initial stock level.
    pub stock_quantity: i32,
    /// Owning category.
    pub category_id: Option<CategoryId>,
}

/// Partial update of a product (admin). `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    /// New display name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New unit price.
    pub price: Option<Price>,
    /// New stock level.
    pub stock_quantity: Option<i32>,
    /// New owning category.
    pub category_id: Option<CategoryId>,
}

/// Fields for creating a category (admin).
#[derive(Debug, Clone, Serialize)]
pub struct NewCategory {
    /// Display name.
    pub name: String,
    /// Long-form description.
    pub description: Option<String>,
}

/// Partial update of a category (admin).
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryPatch {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// =============================================================================
// Wire Types
// =============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct LoginBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterBody<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AuthResponseBody {
    pub token: String,
    pub user: UserRecord,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    // Some backend builds omit the role for fresh registrations
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProductRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock_quantity: i32,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Debug, Serialize)]
pub(crate) struct NewProductBody<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub stock_quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProductPatchBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
}

/// The upload endpoint answers with either a single URL or a list,
/// depending on how many files the request carried.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum UploadResponseBody {
    Many { images: Vec<String> },
    Single { image_url: String },
}

impl UploadResponseBody {
    pub(crate) fn into_urls(self) -> Vec<String> {
        match self {
            Self::Many { images } => images,
            Self::Single { image_url } => vec![image_url],
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

pub(crate) fn convert_user(record: UserRecord) -> Result<CurrentUser, ApiError> {
    let email = Email::parse(&record.email)
        .map_err(|err| ApiError::InvalidData(format!("user email: {err}")))?;
    Ok(CurrentUser {
        id: UserId::new(record.id),
        name: record.name,
        email,
        role: Role::from_wire(&record.role),
    })
}

pub(crate) fn convert_product(record: ProductRecord) -> Result<Product, ApiError> {
    let price = Price::new(record.price)
        .map_err(|err| ApiError::InvalidData(format!("product price: {err}")))?;
    Ok(Product {
        id: ProductId::new(record.id),
        name: record.name,
        description: record.description,
        price,
        stock_quantity: record.stock_quantity,
        category_id: record.category_id.map(CategoryId::new),
        image_url: record.image_url,
        created_at: record.created_at,
        updated_at: record.updated_at,
    })
}

pub(crate) fn convert_category(record: CategoryRecord) -> Category {
    Category {
        id: CategoryId::new(record.id),
        name: record.name,
        description: record.description,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

impl NewProduct {
    pub(crate) fn to_body(&self) -> NewProductBody<'_> {
        NewProductBody {
            name: &self.name,
            description: self.description.as_deref(),
            price: self.price.amount(),
            stock_quantity: self.stock_quantity,
            category_id: self.category_id.map(|c| c.as_uuid()),
        }
    }
}

impl ProductPatch {
    pub(crate) fn to_body(&self) -> ProductPatchBody<'_> {
        ProductPatchBody {
            name: self.name.as_deref(),
            description: self.description.as_deref(),
            price: self.price.map(|p| p.amount()),
            stock_quantity: self.stock_quantity,
            category_id: self.category_id.map(|c| c.as_uuid()),
        }
    }
}
