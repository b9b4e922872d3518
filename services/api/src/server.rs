use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryScoringRepository};
use crate::routes::with_scoring_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;
use worksim::config::AppConfig;
use worksim::error::AppError;
use worksim::scoring::SimulationScoringService;
use worksim::telemetry;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.rubric.take() {
        config.scoring.rubric_path = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    let rubric = config.scoring.rubric()?;
    let rubric_source = config
        .scoring
        .rubric_path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "built-in".to_string());
    info!(
        tasks = rubric.tasks.len(),
        skills = rubric.skills.len(),
        source = %rubric_source,
        "rubric loaded"
    );

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        rubric: Arc::new(rubric.clone()),
    };

    let repository = Arc::new(InMemoryScoringRepository::default());
    let scoring_service = Arc::new(SimulationScoringService::new(repository, rubric));

    let app = with_scoring_routes(scoring_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "simulation scoring service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
