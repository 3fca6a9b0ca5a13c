// HTTP request handlers
use crate::application::alert_feed::FeedState;
use crate::domain::dashboard::Dashboard;
use crate::domain::navigation::NavLink;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use futures::stream::Stream;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Deserialize)]
pub struct SearchQuery {
    pub search: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AlertView {
    pub damage: Option<String>,
    pub state: FeedState,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(health_check))
        .route("/navigation", get(navigation))
        .route("/alerts/latest", get(latest_alert))
        .route("/alerts/stream", get(alert_stream))
        .route("/dashboard", get(dashboard))
        .route("/dashboard/refresh", post(refresh_dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn navigation(State(state): State<Arc<AppState>>) -> Json<Vec<NavLink>> {
    Json(state.navigation.clone())
}

/// Most recent box damage alert, if any
pub async fn latest_alert(State(state): State<Arc<AppState>>) -> Json<AlertView> {
    Json(AlertView {
        damage: state.alerts.latest_alert(),
        state: state.alerts.state(),
    })
}

/// Server-sent events: the current state (and alert, if any) on connect,
/// then `alert` on every new alert and `state` on feed state changes. The
/// stream ends when the server begins shutting down.
pub async fn alert_stream(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let mut alerts = state.alerts.subscribe();
    let mut feed_state = state.alerts.subscribe_state();
    let mut shutdown = state.shutdown.subscribe();

    let stream = async_stream::stream! {
        let current = *feed_state.borrow_and_update();
        if let Some(event) = state_event(current) {
            yield Ok::<Event, Infallible>(event);
        }
        let current = alerts.borrow_and_update().clone();
        if let Some(damage) = current {
            yield Ok(alert_event(damage));
        }

        loop {
            let event = tokio::select! {
                _ = async { let _ = shutdown.wait_for(|stopping| *stopping).await; } => break,
                changed = alerts.changed() => match changed {
                    Ok(()) => alerts.borrow_and_update().clone().map(alert_event),
                    Err(_) => break,
                },
                changed = feed_state.changed() => match changed {
                    Ok(()) => {
                        let current = *feed_state.borrow_and_update();
                        state_event(current)
                    }
                    Err(_) => break,
                },
            };

            if let Some(event) = event {
                yield Ok(event);
            }
        }
    };

    Sse::new(stream).keep_alive(KeepAlive::default())
}

fn alert_event(damage: String) -> Event {
    Event::default().event("alert").data(damage)
}

fn state_event(state: FeedState) -> Option<Event> {
    match Event::default().event("state").json_data(state) {
        Ok(event) => Some(event),
        Err(e) => {
            tracing::error!(error = %e, "failed to encode feed state");
            None
        }
    }
}

/// Dashboard view; `search` replaces the current product filter when given
pub async fn dashboard(
    Query(query): Query<SearchQuery>,
    State(state): State<Arc<AppState>>,
) -> Json<Dashboard> {
    let dashboard = match query.search {
        Some(search) => state.dashboard.set_search(search),
        None => state.dashboard.snapshot(),
    };
    Json(dashboard)
}

/// Re-run the dashboard's data fetches
pub async fn refresh_dashboard(State(state): State<Arc<AppState>>) -> Json<Dashboard> {
    state.dashboard.activate().await;
    Json(state.dashboard.snapshot())
}
