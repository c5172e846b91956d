//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness check
//! GET  /health/ready                    - Readiness check (database ping)
//!
//! # Auth
//! POST /api/auth/signup                 - Register
//! POST /api/auth/login                  - Login, returns bearer token
//! POST /api/auth/logout                 - Stateless logout acknowledgment
//! GET  /api/auth/me                     - Current user
//! PUT  /api/auth/profile                - Update profile
//! POST /api/auth/change-password        - Change password
//! POST /api/auth/forgot-password        - Start password reset
//! POST /api/auth/reset-password/{token} - Complete password reset
//!
//! # Addresses (requires auth, owner-scoped)
//! GET    /api/addresses                 - List
//! POST   /api/addresses                 - Create
//! GET    /api/addresses/default         - The default address, if set
//! GET    /api/addresses/{id}            - Fetch one
//! PUT    /api/addresses/{id}            - Partial update
//! DELETE /api/addresses/{id}            - Delete
//! PATCH  /api/addresses/{id}/default    - Make this the single default
//!
//! # Catalog
//! GET    /api/products                  - List (any authenticated user)
//! POST   /api/products                  - Create (admin/manager)
//! GET    /api/products/{id}             - Fetch one
//! PUT    /api/products/{id}             - Update (admin/manager)
//! DELETE /api/products/{id}             - Delete (admin/manager)
//! GET    /api/products/by-supplier/{id} - List by supplier
//! GET    /api/suppliers                 - List
//! POST   /api/suppliers                 - Create (admin/manager)
//! GET    /api/suppliers/{id}            - Fetch one
//! PUT    /api/suppliers/{id}            - Update (admin/manager)
//! DELETE /api/suppliers/{id}            - Delete (admin/manager)
//!
//! # Orders
//! POST   /api/orders                    - Place an order
//! GET    /api/orders                    - List (admin/manager: all; others: own)
//! GET    /api/orders/{id}               - Fetch one with items
//! PUT    /api/orders/{id}/status/{status} - Update status (admin/manager)
//! POST   /api/orders/{id}/items         - Append an item
//! DELETE /api/orders/{id}               - Delete and restore stock
//!
//! # Messaging
//! POST /api/conversations               - Open (or reuse) a conversation
//! GET  /api/conversations               - Inbox with unread counts
//! GET  /api/conversations/{id}/messages - Messages, marks received ones read
//! POST /api/conversations/{id}/messages - Send a message
//! PUT  /api/conversations/{id}/read     - Mark received messages read
//!
//! # Notifications
//! POST   /api/notifications             - Create
//! GET    /api/notifications             - List with unread count
//! DELETE /api/notifications/{id}        - Delete
//! PUT    /api/notifications/{id}/read   - Mark one read
//! PUT    /api/notifications/read/all    - Mark all read
//! ```

pub mod addresses;
pub mod auth;
pub mod messages;
pub mod notifications;
pub mod orders;
pub mod products;
pub mod suppliers;

use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
        .route("/profile", put(auth::update_profile))
        .route("/change-password", post(auth::change_password))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password/{token}", post(auth::reset_password))
}

/// Create the address routes router.
pub fn address_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(addresses::list).post(addresses::create))
        .route("/default", get(addresses::get_default))
        .route(
            "/{id}",
            get(addresses::get)
                .put(addresses::update)
                .delete(addresses::remove),
        )
        .route("/{id}/default", patch(addresses::set_default))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list).post(products::create))
        .route(
            "/{id}",
            get(products::get)
                .put(products::update)
                .delete(products::remove),
        )
        .route("/by-supplier/{id}", get(products::list_by_supplier))
}

/// Create the supplier routes router.
pub fn supplier_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(suppliers::list).post(suppliers::create))
        .route(
            "/{id}",
            get(suppliers::get)
                .put(suppliers::update)
                .delete(suppliers::remove),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list).post(orders::create))
        .route("/{id}", get(orders::get).delete(orders::remove))
        .route("/{id}/status/{status}", put(orders::update_status))
        .route("/{id}/items", post(orders::add_item))
}

/// Create the conversation routes router.
pub fn conversation_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(messages::inbox).post(messages::create_conversation))
        .route(
            "/{id}/messages",
            get(messages::list_messages).post(messages::send_message),
        )
        .route("/{id}/read", put(messages::mark_read))
}

/// Create the notification routes router.
pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(notifications::list).post(notifications::create),
        )
        .route("/{id}", delete(notifications::remove))
        .route("/{id}/read", put(notifications::mark_read))
        .route("/read/all", put(notifications::mark_all_read))
}

/// Assemble the `/api` router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/addresses", address_routes())
        .nest("/products", product_routes())
        .nest("/suppliers", supplier_routes())
        .nest("/orders", order_routes())
        .nest("/conversations", conversation_routes())
        .nest("/notifications", notification_routes())
}
