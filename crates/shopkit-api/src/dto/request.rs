//! Request DTOs with validation.
//!
//! Structural checks live here; business rules (password policy, email
//! normalization, stock) are enforced again by the services.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use shopkit_core::types::{CategoryId, PermissionId, ProductId, RoleId, UserId};
use shopkit_entity::catalog::CreateProduct;
use shopkit_entity::user::UserStatus;
use shopkit_service::{OrderLineInput, PlaceOrderInput, RegisterInput};

/// Registration request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(max = 100))]
    pub middle_name: Option<String>,
    #[validate(length(min = 1, max = 100, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "Email is invalid"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(length(max = 32))]
    pub phone: Option<String>,
}

impl From<RegisterRequest> for RegisterInput {
    fn from(req: RegisterRequest) -> Self {
        Self {
            first_name: req.first_name,
            middle_name: req.middle_name,
            last_name: req.last_name,
            email: req.email,
            password: req.password,
            phone: req.phone,
        }
    }
}

/// Login request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Password change request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[validate(length(min = 1, message = "New password is required"))]
    pub new_password: String,
}

/// Body of `PUT /admin/users/{user_id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: UserStatus,
}

/// Assign or remove a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleGrantRequest {
    pub user_id: UserId,
    pub role_id: RoleId,
    /// Ignored on removal.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Grant or revoke a direct permission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionGrantRequest {
    pub user_id: UserId,
    pub permission_id: PermissionId,
    /// Ignored on revocation.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// New catalog product.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProductRequest {
    pub category_id: Option<CategoryId>,
    #[validate(length(min = 1, max = 200, message = "Name is required"))]
    pub name: String,
    /// Derived from the name when omitted.
    #[serde(default)]
    #[validate(length(max = 200))]
    pub slug: String,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: f64,
    #[serde(default)]
    #[validate(range(min = 0, message = "Stock must not be negative"))]
    pub stock_quantity: i32,
}

impl From<CreateProductRequest> for CreateProduct {
    fn from(req: CreateProductRequest) -> Self {
        Self {
            category_id: req.category_id,
            name: req.name,
            slug: req.slug,
            description: req.description,
            price: req.price,
            stock_quantity: req.stock_quantity,
        }
    }
}

/// One line of an order request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
pub struct OrderLineRequest {
    pub product_id: ProductId,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

/// Order placement request.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PlaceOrderRequest {
    #[validate(length(min = 1, max = 50, message = "Payment method is required"))]
    pub payment_method: String,
    #[validate(length(min = 1, message = "Shipping address is required"))]
    pub shipping_address: String,
    #[validate(length(min = 1, message = "At least one item is required"), nested)]
    pub items: Vec<OrderLineRequest>,
}

impl From<PlaceOrderRequest> for PlaceOrderInput {
    fn from(req: PlaceOrderRequest) -> Self {
        Self {
            payment_method: req.payment_method,
            shipping_address: req.shipping_address,
            items: req
                .items
                .into_iter()
                .map(|line| OrderLineInput {
                    product_id: line.product_id,
                    quantity: line.quantity,
                })
                .collect(),
        }
    }
}
