//! HTTP route handlers for the store API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                         - Liveness check
//!
//! # Users & loyalty
//! POST   /api/users/login                - Log in with email or display name
//! POST   /api/users/register             - Self-service registration
//! GET    /api/users                      - List every account
//! POST   /api/users                      - Create an account (admin)
//! PUT    /api/users/{id}                 - Update an account (admin)
//! PUT    /api/users/{id}/profile         - Self-service profile update
//! PUT    /api/users/{id}/points          - Adjust the point balance
//! GET    /api/users/{id}/points/history  - Point ledger, oldest first
//! GET    /api/users/{id}/redemptions     - Reward redemptions
//! PUT    /api/users/{id}/status          - Activate / deactivate
//! DELETE /api/users/{id}                 - Delete an account
//!
//! # Orders
//! POST   /api/orders                     - Place an order
//! POST   /api/orders/quote               - Price a cart without committing
//! GET    /api/orders                     - List every order
//! GET    /api/orders/myorders?userId=    - List one user's orders
//! PUT    /api/orders/{id}/status         - Advance the fulfillment status
//!
//! # Rewards
//! GET    /api/rewards                    - Active rewards
//! GET    /api/rewards/admin              - All rewards
//! POST   /api/rewards/admin              - Create a reward
//! PUT    /api/rewards/{id}/admin         - Update a reward
//! DELETE /api/rewards/{id}/admin         - Delete a reward
//! POST   /api/rewards/{id}/redeem        - Redeem a reward for points
//!
//! # Products
//! GET    /api/products                   - Product catalog
//! GET    /api/products/top               - Top-selling strip
//! GET    /api/products/{id}              - Product detail
//! POST   /api/products/admin             - Create a product
//! PUT    /api/products/{id}/admin        - Update a product
//! DELETE /api/products/{id}/admin        - Delete a product
//!
//! # Events, blog & videos
//! GET    /api/events                     - Events, soonest first
//! POST   /api/events/admin               - Create an event
//! PUT    /api/events/{id}/admin          - Update an event
//! DELETE /api/events/{id}/admin          - Delete an event
//! GET    /api/blog                       - Blog posts, newest first
//! GET    /api/blog/{id}                  - Post detail
//! POST   /api/blog/admin                 - Create a post
//! PUT    /api/blog/{id}/admin            - Update a post
//! DELETE /api/blog/{id}/admin            - Delete a post
//! GET    /api/videos                     - All videos
//! GET    /api/videos/featured            - Featured videos (at most two)
//! POST   /api/videos/admin               - Create a video
//! PUT    /api/videos/{id}/admin          - Update a video
//! DELETE /api/videos/{id}/admin          - Delete a video
//! ```

pub mod blog;
pub mod events;
pub mod orders;
pub mod products;
pub mod rewards;
pub mod users;
pub mod videos;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the user and loyalty routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(users::login))
        .route("/register", post(users::register))
        .route("/", get(users::list).post(users::create_by_admin))
        .route(
            "/{id}",
            put(users::update_by_admin).delete(users::delete_user),
        )
        .route("/{id}/profile", put(users::update_profile))
        .route("/{id}/points", put(users::adjust_points))
        .route("/{id}/points/history", get(users::points_history))
        .route("/{id}/redemptions", get(users::redemptions))
        .route("/{id}/status", put(users::set_status))
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::list).post(orders::create))
        .route("/quote", post(orders::quote))
        .route("/myorders", get(orders::my_orders))
        .route("/{id}/status", put(orders::update_status))
}

/// Create the reward routes router.
pub fn reward_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(rewards::list_active))
        .route("/admin", get(rewards::list_all).post(rewards::create))
        .route(
            "/{id}/admin",
            put(rewards::update).delete(rewards::delete_reward),
        )
        .route("/{id}/redeem", post(rewards::redeem))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::list))
        .route("/top", get(products::list_top_selling))
        .route("/{id}", get(products::show))
        .route("/admin", post(products::create))
        .route(
            "/{id}/admin",
            put(products::update).delete(products::delete_product),
        )
}

/// Create the event routes router.
pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(events::list))
        .route("/admin", post(events::create))
        .route(
            "/{id}/admin",
            put(events::update).delete(events::delete_event),
        )
}

/// Create the blog routes router.
pub fn blog_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(blog::list))
        .route("/{id}", get(blog::show))
        .route("/admin", post(blog::create))
        .route("/{id}/admin", put(blog::update).delete(blog::delete_post))
}

/// Create the video routes router.
pub fn video_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(videos::list))
        .route("/featured", get(videos::list_featured))
        .route("/admin", post(videos::create))
        .route(
            "/{id}/admin",
            put(videos::update).delete(videos::delete_video),
        )
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api/users", user_routes())
        .nest("/api/orders", order_routes())
        .nest("/api/rewards", reward_routes())
        .nest("/api/products", product_routes())
        .nest("/api/events", event_routes())
        .nest("/api/blog", blog_routes())
        .nest("/api/videos", video_routes())
}
