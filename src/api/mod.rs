//! HTTP surface. Every route is served at the root and again under `/api`.

pub mod error;
pub mod extractor;
pub mod handlers;

use crate::app::AppServices;
use axum::routing::{get, patch, post};
use axum::Router;
use handlers::{
    auth, certificates, comments, donations, foundations, health, notifications, participation, ratings,
    social_actions, suggestions, users,
};
use tower_http::cors::CorsLayer;

pub fn router(app: AppServices) -> Router {
    Router::new()
        .merge(routes())
        .nest("/api", routes())
        .layer(CorsLayer::permissive())
        .with_state(app)
}

fn routes() -> Router<AppServices> {
    Router::new()
        .route("/health", get(health::health))
        .merge(account_routes())
        .merge(foundation_routes())
        .merge(donation_routes())
        .merge(social_action_routes("/social-actions"))
        .merge(social_action_routes("/opportunities"))
        .merge(participation_routes())
        .merge(comment_routes())
        .merge(rating_routes())
        .merge(certificate_routes())
        .merge(notification_routes())
        .merge(suggestion_routes())
}

fn account_routes() -> Router<AppServices> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/users", post(auth::register).get(users::list))
        .route(
            "/users/:id",
            get(users::get).patch(users::update).put(users::update).delete(users::delete),
        )
        .route("/users/:id/favorites", get(users::list_favorites).post(users::add_favorite))
        .route("/users/:id/favorites/:item_id", axum::routing::delete(users::remove_favorite))
}

fn foundation_routes() -> Router<AppServices> {
    Router::new()
        .route("/foundations", post(foundations::create).get(foundations::list))
        .route("/foundations/user/:user_id", get(foundations::get_by_user))
        .route(
            "/foundations/:id",
            get(foundations::get)
                .patch(foundations::update)
                .put(foundations::update)
                .delete(foundations::delete),
        )
}

fn donation_routes() -> Router<AppServices> {
    Router::new()
        .route("/donations", post(donations::create).get(donations::list))
        .route("/donations/user/:user_id", get(donations::list_by_user))
        .route("/donations/foundation/:foundation_id", get(donations::list_by_foundation))
        .route(
            "/donations/:id",
            get(donations::get)
                .patch(donations::update)
                .put(donations::update)
                .delete(donations::delete),
        )
}

/// Social actions are also published under their older name, opportunities.
fn social_action_routes(prefix: &str) -> Router<AppServices> {
    Router::new()
        .route(prefix, post(social_actions::create).get(social_actions::list))
        .route(&format!("{}/upcoming", prefix), get(social_actions::list_upcoming))
        .route(&format!("{}/active", prefix), get(social_actions::list_active))
        .route(&format!("{}/foundation/:foundation_id", prefix), get(social_actions::list_by_foundation))
        .route(
            &format!("{}/:id", prefix),
            get(social_actions::get)
                .patch(social_actions::update)
                .put(social_actions::update)
                .delete(social_actions::delete),
        )
        .route(&format!("{}/:id/apply", prefix), post(social_actions::apply))
}

fn participation_routes() -> Router<AppServices> {
    Router::new()
        .route("/participation-requests", post(participation::create).get(participation::list))
        .route("/participation-requests/user/:user_id", get(participation::list_by_user))
        .route(
            "/participation-requests/social-action/:social_action_id",
            get(participation::list_by_social_action),
        )
        .route(
            "/participation-requests/social-action/:social_action_id/pending",
            get(participation::list_pending),
        )
        .route("/opportunities/:id/applications", get(participation::list_applications))
        .route("/opportunities/:id/pending-applications", get(participation::list_pending))
        .route(
            "/participation-requests/:id",
            get(participation::get)
                .patch(participation::update)
                .put(participation::update)
                .delete(participation::delete),
        )
}

fn comment_routes() -> Router<AppServices> {
    Router::new()
        .route("/comments", post(comments::create).get(comments::list))
        .route("/foundation-detail/comment", post(comments::create_on_foundation))
        .route("/comments/user/:user_id", get(comments::list_by_user))
        .route("/comments/donation/:id", get(comments::list_by_donation))
        .route("/comments/social-action/:id", get(comments::list_by_social_action))
        .route("/comments/opportunity/:id", get(comments::list_by_social_action))
        .route("/comments/foundation/:id", get(comments::list_by_foundation))
        .route(
            "/comments/:id",
            get(comments::get).patch(comments::update).put(comments::update).delete(comments::delete),
        )
}

fn rating_routes() -> Router<AppServices> {
    Router::new()
        .route("/ratings", post(ratings::create).get(ratings::list))
        .route("/ratings/user/:user_id", get(ratings::list_by_user))
        .route("/ratings/donation/:id", get(ratings::list_by_donation))
        .route("/ratings/donation/:id/average", get(ratings::donation_average))
        .route("/ratings/social-action/:id", get(ratings::list_by_social_action))
        .route("/ratings/social-action/:id/average", get(ratings::social_action_average))
        .route("/ratings/opportunity/:id", get(ratings::list_by_social_action))
        .route("/ratings/opportunity/:id/average", get(ratings::social_action_average))
        .route(
            "/ratings/:id",
            get(ratings::get).patch(ratings::update).put(ratings::update).delete(ratings::delete),
        )
}

fn certificate_routes() -> Router<AppServices> {
    Router::new()
        .route("/certificates", post(certificates::create).get(certificates::list))
        .route("/certificates/participation", post(certificates::create_for_participation))
        .route("/certificates/user/:user_id", get(certificates::list_by_user))
        .route(
            "/certificates/:id",
            get(certificates::get)
                .patch(certificates::update)
                .put(certificates::update)
                .delete(certificates::delete),
        )
        .route("/certificates/:id/download", get(certificates::download))
}

fn notification_routes() -> Router<AppServices> {
    Router::new()
        .route("/notifications", get(notifications::list_mine).post(notifications::create))
        .route("/notifications/unread", get(notifications::list_mine_unread))
        .route("/notifications/mark-all-read", post(notifications::mark_mine_read))
        .route("/notifications/all", get(notifications::list_all))
        .route("/notifications/user/:user_id", get(notifications::list_by_user))
        .route("/notifications/user/:user_id/unread", get(notifications::list_unread_by_user))
        .route("/notifications/user/:user_id/mark-all-read", post(notifications::mark_user_read))
        .route(
            "/notifications/:id",
            get(notifications::get)
                .patch(notifications::update)
                .put(notifications::update)
                .delete(notifications::delete),
        )
        .route("/notifications/:id/read", patch(notifications::mark_read))
}

fn suggestion_routes() -> Router<AppServices> {
    Router::new()
        .route("/suggestions", post(suggestions::create).get(suggestions::list))
        .route("/suggestions/unprocessed", get(suggestions::list_unprocessed))
        .route("/suggestions/user/:user_id", get(suggestions::list_by_user))
        .route(
            "/suggestions/:id",
            get(suggestions::get)
                .patch(suggestions::update)
                .put(suggestions::update)
                .delete(suggestions::delete),
        )
        .route("/suggestions/:id/process", patch(suggestions::process))
}
