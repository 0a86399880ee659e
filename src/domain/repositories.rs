//! Repository trait definitions
//!
//! These traits define the contract for data access.
//! Implementations live in the infrastructure layer.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::validation;
use super::DomainError;
use crate::models::{Membership, PaymentStatus};

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: i32,
    pub title: String,
    pub featured_product_id: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCollectionInput {
    pub title: String,
    pub featured_product_id: Option<i32>,
}

impl CreateCollectionInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        validation::text("title", &self.title)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCollectionInput {
    pub title: Option<String>,
    pub featured_product_id: Option<Option<i32>>,
}

impl UpdateCollectionInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(title) = &self.title {
            validation::text("title", title)?;
        }
        Ok(())
    }
}

/// Repository trait for Collection entity
#[async_trait]
pub trait CollectionRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Collection>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Collection>, DomainError>;

    async fn create(&self, input: CreateCollectionInput) -> Result<Collection, DomainError>;

    async fn update(&self, id: i32, input: UpdateCollectionInput)
        -> Result<Collection, DomainError>;

    /// Fails with `Protected` while any product belongs to the collection
    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    /// Products belonging to a collection
    async fn products(&self, collection_id: i32) -> Result<Vec<Product>, DomainError>;
}

// ---------------------------------------------------------------------------
// Products
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub unit_price: Decimal,
    pub inventory: i32,
    pub last_update: DateTime<Utc>,
    pub collection_id: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductInput {
    pub title: String,
    /// Defaults to the placeholder slug when absent
    pub slug: Option<String>,
    pub description: String,
    pub unit_price: Decimal,
    pub inventory: i32,
    pub collection_id: i32,
}

impl CreateProductInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        validation::text("title", &self.title)?;
        if let Some(slug) = &self.slug {
            validation::slug(slug)?;
        }
        validation::price("unit_price", self.unit_price)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductInput {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub unit_price: Option<Decimal>,
    pub inventory: Option<i32>,
    pub collection_id: Option<i32>,
}

impl UpdateProductInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(title) = &self.title {
            validation::text("title", title)?;
        }
        if let Some(slug) = &self.slug {
            validation::slug(slug)?;
        }
        if let Some(price) = self.unit_price {
            validation::price("unit_price", price)?;
        }
        Ok(())
    }
}

/// Repository trait for Product entity
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Product>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Product>, DomainError>;

    /// Slugs are not unique, so several products may match
    async fn find_by_slug(&self, slug: &str) -> Result<Vec<Product>, DomainError>;

    async fn create(&self, input: CreateProductInput) -> Result<Product, DomainError>;

    async fn update(&self, id: i32, input: UpdateProductInput) -> Result<Product, DomainError>;

    /// Clears featured references and removes cart lines and promotion links;
    /// fails with `Protected` while order lines reference the product
    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    async fn promotions(&self, product_id: i32) -> Result<Vec<Promotion>, DomainError>;

    /// Idempotent
    async fn add_promotion(&self, product_id: i32, promotion_id: i32) -> Result<(), DomainError>;

    /// NotFound when the product and promotion are not linked
    async fn remove_promotion(&self, product_id: i32, promotion_id: i32)
        -> Result<(), DomainError>;
}

// ---------------------------------------------------------------------------
// Promotions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promotion {
    pub id: i32,
    pub description: String,
    pub discount: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePromotionInput {
    pub description: String,
    pub discount: f64,
}

impl CreatePromotionInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        validation::text("description", &self.description)?;
        if !self.discount.is_finite() {
            return Err(DomainError::Validation("discount must be a finite number".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePromotionInput {
    pub description: Option<String>,
    pub discount: Option<f64>,
}

impl UpdatePromotionInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(description) = &self.description {
            validation::text("description", description)?;
        }
        if matches!(self.discount, Some(d) if !d.is_finite()) {
            return Err(DomainError::Validation("discount must be a finite number".into()));
        }
        Ok(())
    }
}

/// Repository trait for Promotion entity
#[async_trait]
pub trait PromotionRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Promotion>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Promotion>, DomainError>;

    async fn create(&self, input: CreatePromotionInput) -> Result<Promotion, DomainError>;

    async fn update(&self, id: i32, input: UpdatePromotionInput)
        -> Result<Promotion, DomainError>;

    /// Removes the promotion and its product links, never the products
    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    async fn products(&self, promotion_id: i32) -> Result<Vec<Product>, DomainError>;
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i32,
    pub title: String,
}

/// Repository trait for Item entity
#[async_trait]
pub trait ItemRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Item>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Item>, DomainError>;

    async fn create(&self, title: String) -> Result<Item, DomainError>;

    async fn update(&self, id: i32, title: String) -> Result<Item, DomainError>;

    async fn delete(&self, id: i32) -> Result<(), DomainError>;
}

// ---------------------------------------------------------------------------
// Customers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i32,
    pub given_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    pub membership: Membership,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCustomerInput {
    pub given_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: Option<NaiveDate>,
    /// Bronze when absent
    pub membership: Option<Membership>,
}

impl CreateCustomerInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        validation::text("given_name", &self.given_name)?;
        validation::text("last_name", &self.last_name)?;
        validation::email(&self.email)?;
        validation::text("phone", &self.phone)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCustomerInput {
    pub given_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub birth_date: Option<Option<NaiveDate>>,
    pub membership: Option<Membership>,
}

impl UpdateCustomerInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(given_name) = &self.given_name {
            validation::text("given_name", given_name)?;
        }
        if let Some(last_name) = &self.last_name {
            validation::text("last_name", last_name)?;
        }
        if let Some(email) = &self.email {
            validation::email(email)?;
        }
        if let Some(phone) = &self.phone {
            validation::text("phone", phone)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    /// Also the address's own id
    pub customer_id: i32,
    pub street: String,
    pub city: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddressInput {
    pub street: String,
    pub city: String,
}

impl AddressInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        validation::text("street", &self.street)?;
        validation::text("city", &self.city)
    }
}

/// Repository trait for Customer entity and its single address
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Customer>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Customer>, DomainError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>, DomainError>;

    /// Fails with `Conflict` when the email is already taken
    async fn create(&self, input: CreateCustomerInput) -> Result<Customer, DomainError>;

    async fn update(&self, id: i32, input: UpdateCustomerInput) -> Result<Customer, DomainError>;

    /// Deletes the address along with the customer; fails with `Protected`
    /// while orders reference the customer
    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    async fn address(&self, customer_id: i32) -> Result<Option<Address>, DomainError>;

    /// Create or replace the customer's address
    async fn set_address(
        &self,
        customer_id: i32,
        input: AddressInput,
    ) -> Result<Address, DomainError>;

    async fn remove_address(&self, customer_id: i32) -> Result<(), DomainError>;
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: i32,
    pub placed_at: DateTime<Utc>,
    pub payment_status: PaymentStatus,
    pub customer_id: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i32,
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: i16,
    /// Copied at order time
    pub unit_price: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewOrderItem {
    pub product_id: i32,
    pub quantity: i16,
    /// Defaults to the product's price at the time the line is added
    pub unit_price: Option<Decimal>,
}

impl NewOrderItem {
    pub fn validate(&self) -> Result<(), DomainError> {
        validation::quantity(self.quantity)?;
        if let Some(price) = self.unit_price {
            validation::price("unit_price", price)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderInput {
    pub customer_id: i32,
    /// Pending when absent
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub items: Vec<NewOrderItem>,
}

impl CreateOrderInput {
    pub fn validate(&self) -> Result<(), DomainError> {
        self.items.iter().try_for_each(NewOrderItem::validate)
    }
}

/// Repository trait for Order entity and its lines
#[async_trait]
pub trait OrderRepository: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Order>, DomainError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Order>, DomainError>;

    async fn find_by_customer(&self, customer_id: i32) -> Result<Vec<Order>, DomainError>;

    /// Creates the order and its lines atomically
    async fn create(&self, input: CreateOrderInput) -> Result<Order, DomainError>;

    async fn update_payment_status(
        &self,
        id: i32,
        status: PaymentStatus,
    ) -> Result<Order, DomainError>;

    /// Fails with `Protected` while the order has lines
    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    async fn items(&self, order_id: i32) -> Result<Vec<OrderItem>, DomainError>;

    async fn add_item(&self, order_id: i32, item: NewOrderItem) -> Result<OrderItem, DomainError>;

    async fn remove_item(&self, item_id: i32) -> Result<(), DomainError>;
}

// ---------------------------------------------------------------------------
// Carts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub id: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: i32,
    pub cart_id: i32,
    pub product_id: i32,
    pub quantity: i16,
}

/// Repository trait for Cart entity and its lines
#[async_trait]
pub trait CartRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Cart>, DomainError>;

    async fn create(&self) -> Result<Cart, DomainError>;

    /// Deletes the cart's lines with it
    async fn delete(&self, id: i32) -> Result<(), DomainError>;

    async fn items(&self, cart_id: i32) -> Result<Vec<CartItem>, DomainError>;

    /// Adding a product already in the cart increases that line's quantity
    async fn add_item(
        &self,
        cart_id: i32,
        product_id: i32,
        quantity: i16,
    ) -> Result<CartItem, DomainError>;

    async fn update_item_quantity(
        &self,
        item_id: i32,
        quantity: i16,
    ) -> Result<CartItem, DomainError>;

    async fn remove_item(&self, item_id: i32) -> Result<(), DomainError>;
}
