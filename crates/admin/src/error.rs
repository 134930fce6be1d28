//! Validation errors raised before a request is sent.

use thiserror::Error;

/// A date range that cannot be turned into search bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RangeError {
    #[error("Invalid date range: end is before start")]
    EndBeforeStart,
}

/// A stock adjustment refused before any request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StockAdjustmentError {
    #[error("Invalid quantity. Enter an integer > 0")]
    InvalidQuantity,

    #[error("Operation not allowed: stock would go below 0 (current {current})")]
    BelowZero { current: i32 },
}

/// A field of the product form that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ProductFieldError {
    #[error("Name is required.")]
    MissingName,

    #[error("Price is required.")]
    MissingPrice,

    #[error("Invalid price. Examples: 199,99 or 1299.50 or 1.299,50")]
    InvalidPrice,

    #[error("Price must be greater than 0.")]
    NonPositivePrice,

    #[error("Quantity is required.")]
    MissingQuantity,

    #[error("Invalid quantity.")]
    InvalidQuantity,

    #[error("Quantity must be >= 0.")]
    NegativeQuantity,

    #[error("Image URL is required.")]
    MissingImageUrl,

    #[error("Category is required.")]
    MissingCategory,
}

/// A promotion draft that cannot be submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PromotionDraftError {
    #[error("Promotion name is required")]
    MissingName,

    #[error("Select a complete period (start and end).")]
    IncompletePeriod,

    #[error("Invalid period: end is before start.")]
    EndBeforeStart,

    #[error("Select at least one product and set a valid discount (1-90%).")]
    NoValidItems,
}
