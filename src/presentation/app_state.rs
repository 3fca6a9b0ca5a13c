// Application state for HTTP handlers
use crate::application::alert_feed::AlertFeedService;
use crate::application::dashboard_service::DashboardService;
use crate::application::view_state::ViewState;
use crate::domain::navigation::NavLink;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: DashboardService,
    pub alerts: AlertFeedService,
    pub navigation: Vec<NavLink>,
    /// Set once the server starts draining; long-lived responses end on it
    pub shutdown: ViewState<bool>,
}

impl AppState {
    pub fn new(
        dashboard: DashboardService,
        alerts: AlertFeedService,
        navigation: Vec<NavLink>,
    ) -> Self {
        Self {
            dashboard,
            alerts,
            navigation,
            shutdown: ViewState::new(false),
        }
    }

    /// End open event streams and release the broker connection.
    pub async fn begin_shutdown(&self) {
        self.shutdown.set(true);
        self.alerts.deactivate().await;
    }
}
