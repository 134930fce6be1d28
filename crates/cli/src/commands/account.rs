//! Shopper account: registration, orders, profile and password.

use vetrina_client::auth;
use vetrina_core::{ChangePasswordRequest, OrderId, RegisterRequest, UpdateProfileRequest};
use vetrina_storefront::profile::profile_error_message;

use super::Context;
use crate::output;

pub async fn register(
    ctx: &Context,
    request: &RegisterRequest,
) -> Result<(), Box<dyn std::error::Error>> {
    let response = auth::register(ctx.api(), request)
        .await
        .map_err(|e| e.user_message("Registration failed"))?;
    let username = ctx
        .api()
        .session()
        .snapshot()
        .username()
        .unwrap_or_else(|| request.username.trim().to_string());
    output::emit(&format!("Registered and signed in as {username} ({})", response.role));
    Ok(())
}

pub async fn my_orders(ctx: &Context, page: u32, size: u32) -> Result<(), Box<dyn std::error::Error>> {
    ctx.sign_in().await?;
    let orders = ctx
        .storefront()
        .my_orders(page, size)
        .await
        .map_err(|e| e.user_message("Failed to load orders"))?;
    output::emit(&output::orders(&orders));
    Ok(())
}

pub async fn my_order(ctx: &Context, id: i64) -> Result<(), Box<dyn std::error::Error>> {
    ctx.sign_in().await?;
    let order = ctx
        .storefront()
        .my_order(OrderId::new(id))
        .await
        .map_err(|e| e.user_message("Failed to load order"))?;
    output::emit(&output::order(&order));
    Ok(())
}

pub async fn show_profile(ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    ctx.sign_in().await?;
    let profile = ctx
        .storefront()
        .profile()
        .await
        .map_err(|e| e.user_message("Failed to load profile"))?;
    output::emit(&output::profile(&profile));
    Ok(())
}

pub async fn update_profile(
    ctx: &Context,
    request: &UpdateProfileRequest,
) -> Result<(), Box<dyn std::error::Error>> {
    ctx.sign_in().await?;
    let profile = ctx
        .storefront()
        .update_profile(request)
        .await
        .map_err(|e| profile_error_message(&e))?;
    output::emit("Profile saved.");
    output::emit(&output::profile(&profile));
    Ok(())
}

pub async fn change_password(
    ctx: &Context,
    request: &ChangePasswordRequest,
) -> Result<(), Box<dyn std::error::Error>> {
    ctx.sign_in().await?;
    let message = ctx.storefront().change_password(request).await?;
    output::emit(&message);
    Ok(())
}
