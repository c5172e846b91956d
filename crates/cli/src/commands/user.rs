//! User management command.
//!
//! Accounts created through the API always start as `basic`; elevated roles
//! are assigned here.

use tracing::info;

use akubata_api::db::{self, users::UserRepository};
use akubata_api::services::auth::AuthService;
use akubata_core::Role;

/// Create a user with the given role and password.
///
/// # Errors
///
/// Returns an error if the role or email is invalid, the email is already
/// registered, or the database operation fails.
pub async fn create(
    email: &str,
    first_name: &str,
    last_name: &str,
    role: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let role: Role = role.parse()?;
    let database_url = super::database_url()?;

    let pool = db::create_pool(&database_url).await?;

    let user = AuthService::new(&pool)
        .signup(akubata_api::services::auth::Signup {
            first_name,
            last_name,
            email,
            phone_number: None,
            password,
            confirm_password: password,
        })
        .await?;

    if role != Role::Basic {
        UserRepository::new(&pool).set_role(user.id, role).await?;
    }

    info!(user_id = %user.id, email = %user.email, %role, "User created");
    Ok(())
}
