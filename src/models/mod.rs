pub mod address;
pub mod cart;
pub mod cart_item;
pub mod collection;
pub mod customer;
pub mod item;
pub mod order;
pub mod order_item;
pub mod product;
pub mod product_promotion;
pub mod promotion;

pub use customer::Membership;
pub use order::PaymentStatus;
