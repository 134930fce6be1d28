//! Core types for Vetrina.
//!
//! Wire types mirror the JSON the backend speaks (camelCase field names).

pub mod account;
pub mod alert;
pub mod category;
pub mod id;
pub mod local_time;
pub mod money;
pub mod order;
pub mod page;
pub mod product;
pub mod promotion;
pub mod query;
pub mod status;

pub use account::{
    ChangePasswordRequest, LoginRequest, LoginResponse, MessageResponse, Profile, RegisterRequest,
    UpdateProfileRequest,
};
pub use alert::StockAlert;
pub use category::ProductCategory;
pub use id::*;
pub use money::{format_euro, format_money};
pub use order::{CreateOrderRequest, Order, OrderItem, OrderLine};
pub use page::Page;
pub use product::{
    CreateProductRequest, PLACEHOLDER_IMAGE, Product, ProductSalesView, RestockRequest,
    UpdateProductRequest,
};
pub use promotion::{
    CreatePromotionRequest, Promotion, PromotionItem, PromotionItemRequest, PromotionPhase,
    UpdatePromotionRequest,
};
pub use query::ProductQuery;
pub use status::{AlertStatus, Role};
