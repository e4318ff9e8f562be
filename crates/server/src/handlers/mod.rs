mod ai;
mod applications;
mod auth;
mod careers;
mod contacts;
mod donations;
mod events;
mod health;
mod payments;
mod programs;
mod subscribers;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{
  delete,
  get,
  patch,
  post,
  put
};

use crate::app_state::AppState;

/// Resumes travel inside the multipart
/// body.
pub const MAX_BODY_BYTES: usize =
  6 * 1024 * 1024;

pub fn router(
  state: AppState
) -> Router {
  Router::new()
        .route("/health", get(health::health))
        .route("/api/auth/login", post(auth::login))
        .route("/api/contact", post(contacts::create_contact))
        .route("/api/contacts", get(contacts::list_contacts))
        .route("/api/contacts/export", get(contacts::export_contacts))
        .route("/api/donations", post(donations::create_donation))
        .route("/api/donations", get(donations::list_donations))
        .route("/api/donations/export", get(donations::export_donations))
        .route("/api/programs", get(programs::list_programs))
        .route("/api/programs", post(programs::create_program))
        .route("/api/programs/:id", put(programs::update_program))
        .route("/api/programs/:id", delete(programs::delete_program))
        .route("/api/careers", get(careers::list_careers))
        .route("/api/careers", post(careers::create_career))
        .route("/api/careers/:id", get(careers::career_detail))
        .route("/api/careers/:id", put(careers::update_career))
        .route("/api/careers/:id", delete(careers::delete_career))
        .route("/api/careers/:id/apply", post(applications::apply))
        .route("/api/applications", get(applications::list_applications))
        .route("/api/applications/export", get(applications::export_applications))
        .route("/api/applications/:id/status", patch(applications::update_status))
        .route("/api/applications/:id/resume", get(applications::download_resume))
        .route("/api/events", get(events::list_events))
        .route("/api/events", post(events::create_event))
        .route("/api/events/:id", put(events::update_event))
        .route("/api/events/:id", delete(events::delete_event))
        .route("/api/events/:id/register", post(events::register))
        .route("/api/events/:id/registrations", get(events::list_registrations))
        .route("/api/subscribe", post(subscribers::subscribe))
        .route("/api/subscribers", get(subscribers::list_subscribers))
        .route("/api/payments/payu/hash", post(payments::payu_hash))
        .route("/api/payments/payu/verify", post(payments::payu_verify))
        .route("/api/ai/chat", post(ai::chat))
        .route("/api/ai/impact-story", post(ai::impact_story))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(state)
}
