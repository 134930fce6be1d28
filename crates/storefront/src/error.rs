//! Shopper-facing error types.

use thiserror::Error;
use vetrina_client::ApiError;

/// Why a checkout did not produce an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Nothing to order. No request was sent.
    #[error("Cart is empty.")]
    EmptyCart,

    /// Only a signed-in shopper may check out.
    #[error("Only a signed-in USER can place orders.")]
    NotAllowed,

    /// The backend rejected the order or could not be reached.
    #[error("{}", .0.user_message("Order creation failed"))]
    Api(#[from] ApiError),
}

/// Why a password change was refused.
#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("Fill in all password fields.")]
    MissingField,

    #[error("The new password must be at least {0} characters long.")]
    TooShort(usize),

    #[error("The new passwords do not match.")]
    Mismatch,

    #[error("{}", .0.user_message("Password change failed"))]
    Api(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(CheckoutError::EmptyCart.to_string(), "Cart is empty.");
        assert_eq!(
            PasswordError::TooShort(4).to_string(),
            "The new password must be at least 4 characters long."
        );
    }
}
