use crate::bridge::model::DashboardModel;
use crate::bridge::results::{GameResult, ResultLog};
use crate::workflow::runner::{Runner, ViewRequest};
use anyhow::Result;
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{http::StatusCode, Filter};

fn bridge_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

#[derive(Debug)]
struct WarpError;

impl warp::reject::Reject for WarpError {}

/// Hosts the dashboard HTTP endpoints and holds the published model.
pub struct DashboardBridge {
    state: Arc<RwLock<DashboardModel>>,
}

impl DashboardBridge {
    pub fn new(runner: Arc<Runner>, results: ResultLog) -> Self {
        let state = Arc::new(RwLock::new(DashboardModel::default()));
        let state_for_filter = state.clone();
        let state_filter = warp::any().map(move || state_for_filter.clone());
        let runner_filter = warp::any().map(move || runner.clone());
        let results_for_filter = results.clone();
        let results_filter = warp::any().map(move || results_for_filter.clone());

        let payload_route = warp::path("payload")
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: Arc<RwLock<DashboardModel>>| {
                warp::reply::json(&*state.read().unwrap())
            });

        let view_route = warp::path("view")
            .and(warp::post())
            .and(warp::body::json())
            .and(state_filter.clone())
            .and(runner_filter)
            .and_then(
                |view: ViewRequest,
                 state: Arc<RwLock<DashboardModel>>,
                 runner: Arc<Runner>| async move {
                    match runner.execute(&view).await {
                        Ok(result) => {
                            let model = DashboardModel::from(&result);
                            let filtered = model.filtered_networks;
                            let mut guard = state.write().unwrap();
                            *guard = model;
                            Ok::<_, warp::Rejection>(warp::reply::with_status(
                                warp::reply::json(&json!({
                                    "status": "ok",
                                    "filtered": filtered
                                })),
                                StatusCode::OK,
                            ))
                        }
                        Err(err) => {
                            eprintln!("view rebuild error: {}", err);
                            Err(warp::reject::custom(WarpError))
                        }
                    }
                },
            );

        let save_result_route = warp::path!("game" / "result")
            .and(warp::post())
            .and(warp::body::json())
            .and(results_filter.clone())
            .and_then(|result: GameResult, results: ResultLog| async move {
                match results.append(result).await {
                    Ok(total) => Ok::<_, warp::Rejection>(warp::reply::with_status(
                        warp::reply::json(&json!({"status": "ok", "total": total})),
                        StatusCode::OK,
                    )),
                    Err(err) => {
                        eprintln!("result append error: {}", err);
                        Err(warp::reject::custom(WarpError))
                    }
                }
            });

        let list_results_route = warp::path!("game" / "results")
            .and(warp::get())
            .and(results_filter)
            .and_then(|results: ResultLog| async move {
                // A missing log is an empty list, matching the original
                // endpoint.
                let all = results.read_all().await.unwrap_or_default();
                Ok::<_, warp::Rejection>(warp::reply::json(&all))
            });

        thread::spawn(move || {
            let routes = payload_route
                .or(view_route)
                .or(save_result_route)
                .or(list_results_route);
            let runtime = Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime");
            runtime.block_on(async move {
                warp::serve(routes).run(bridge_bind_address()).await;
            });
        });

        Self { state }
    }

    pub fn publish(&self, model: &DashboardModel) -> Result<()> {
        let mut guard = self.state.write().unwrap();
        *guard = model.clone();
        println!(
            "[BRIDGE] networks: {} ({} on map), clusters: {}",
            guard.total_networks,
            guard.filtered_networks,
            guard.plan.glyphs.len()
        );
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        println!("[BRIDGE] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> DashboardModel {
        self.state.read().unwrap().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::profile::{build_survey, GeneratorConfig};
    use crate::workflow::config::DashboardConfig;
    use tempfile::tempdir;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn bridge_publishes_workflow_state() {
        let dir = tempdir().unwrap();
        let runner = Arc::new(Runner::new(DashboardConfig::default()));
        runner.seed(build_survey(&GeneratorConfig {
            count: 40,
            ..Default::default()
        }));
        let bridge = DashboardBridge::new(
            runner.clone(),
            ResultLog::new(dir.path().join("result.json")),
        );

        let view = ViewRequest::default();
        let result = runner.execute(&view).await.unwrap();
        bridge.publish(&DashboardModel::from(&result)).unwrap();

        let snapshot = bridge.snapshot();
        assert_eq!(snapshot.total_networks, 40);
        assert!(snapshot.has_data());
    }
}
