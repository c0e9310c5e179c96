use crate::gui_bridge::model::VisualizationModel;
use aurafuse::interface::TickReport;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};
use warp::Filter;

pub fn gui_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

/// Holds the latest published state and serves it to renderers over HTTP.
#[derive(Clone, Default)]
pub struct GuiBridge {
    state: Arc<RwLock<VisualizationModel>>,
}

impl GuiBridge {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_model(state: &RwLock<VisualizationModel>) -> VisualizationModel {
        state.read().map(|guard| guard.clone()).unwrap_or_default()
    }

    /// `GET /scene` and `GET /events`.
    pub fn routes(
        &self,
    ) -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone + Send + Sync + 'static
    {
        let state = self.state.clone();
        let state_filter = warp::any().map(move || state.clone());

        let scene_route = warp::path("scene")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: Arc<RwLock<VisualizationModel>>| {
                warp::reply::json(&Self::read_model(&state).snapshot)
            });

        let events_route = warp::path("events")
            .and(warp::get())
            .and(state_filter)
            .map(|state: Arc<RwLock<VisualizationModel>>| {
                warp::reply::json(&Self::read_model(&state).recent_events)
            });

        scene_route.or(events_route)
    }

    pub fn serve(&self, address: SocketAddr) -> impl Future<Output = ()> {
        warp::serve(self.routes()).run(address)
    }

    pub fn publish(&self, report: &TickReport) {
        if let Ok(mut guard) = self.state.write() {
            guard.apply(report);
        }
        for event in &report.intrusion_events {
            println!(
                "[GUI] {:?} at t={:.1} point={:?}",
                event.kind, event.timestamp, event.relevant_point
            );
        }
    }

    pub fn publish_status(&self, message: &str) {
        println!("[GUI] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> VisualizationModel {
        Self::read_model(&self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::config::WorkflowConfig;
    use aurafuse::interface::{IntrusionEvent, IntrusionKind, SceneSnapshot};
    use aurafuse::processing::FusionEngine;

    fn report_with_events(count: usize) -> TickReport {
        let mut engine = FusionEngine::new(WorkflowConfig::default().fusion);
        let mut report = engine.tick(Vec::new(), 1.0);
        let region = report.snapshot.region;
        report.intrusion_events = (0..count)
            .map(|i| IntrusionEvent {
                kind: IntrusionKind::ObjectLeft,
                region,
                timestamp: i as f64,
                relevant_point: None,
            })
            .collect();
        report
    }

    #[test]
    fn gui_bridge_updates_state() {
        let gui = GuiBridge::new();
        gui.publish(&report_with_events(2));
        let model = gui.snapshot();
        assert_eq!(model.recent_events.len(), 2);
        assert_eq!(model.snapshot.map(|s| s.timestamp), Some(1.0));
    }

    #[test]
    fn event_history_is_bounded() {
        let gui = GuiBridge::new();
        gui.publish(&report_with_events(100));
        let model = gui.snapshot();
        assert_eq!(model.recent_events.len(), crate::gui_bridge::model::EVENT_HISTORY);
        assert_eq!(model.recent_events[0].timestamp, 36.0);
    }

    #[tokio::test]
    async fn scene_route_serves_latest_snapshot() {
        let gui = GuiBridge::new();
        gui.publish(&report_with_events(1));
        let response = warp::test::request()
            .method("GET")
            .path("/scene")
            .reply(&gui.routes())
            .await;
        assert_eq!(response.status(), 200);
        let scene: SceneSnapshot = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(scene.timestamp, 1.0);

        let response = warp::test::request()
            .method("GET")
            .path("/events")
            .reply(&gui.routes())
            .await;
        let events: Vec<IntrusionEvent> = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(events.len(), 1);
    }
}
