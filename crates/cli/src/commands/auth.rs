//! Session commands.

use mlk_shop_storefront::AppState;
use mlk_shop_storefront::models::RegisterRequest;
use mlk_shop_storefront::routes::Route;

use super::CliError;

/// Log in and report the role.
pub async fn login(state: &AppState, username: &str, password: &str) -> Result<(), CliError> {
    let user = state.auth().login(username, password).await?;
    state.navigator().navigate(Route::Home);
    state
        .notifications()
        .success(format!("Logged in as {} ({})", user.username, user.role));
    Ok(())
}

/// Register a new account and log in as it.
pub async fn register(
    state: &AppState,
    username: String,
    email: String,
    password: String,
    confirm_password: String,
) -> Result<(), CliError> {
    let user = state
        .auth()
        .register(RegisterRequest {
            username,
            email,
            password,
            confirm_password,
        })
        .await?;
    state
        .notifications()
        .success(format!("Account created. Logged in as {}", user.username));
    Ok(())
}

pub fn logout(state: &AppState) {
    state.auth().logout();
    state.notifications().info("Logged out");
}

pub fn whoami(state: &AppState) {
    match state.session().user() {
        Some(user) => {
            let email = user.email.as_deref().unwrap_or("-");
            println!("{} <{email}> role={}", user.username, user.role);
        }
        None => println!("Not logged in"),
    }
}
