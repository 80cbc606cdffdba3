use crate::cli::ServeArgs;
use crate::infra::{demo_campaigns, AppState, InMemoryFundraisingStore};
use crate::routes::with_workflow_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use fundraise_review::config::AppConfig;
use fundraise_review::error::AppError;
use fundraise_review::telemetry;
use fundraise_review::workflows::fundraising::{FundraisingStatusService, TracingNotifier};
use fundraise_review::workflows::review::ReviewService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(if args.empty {
        InMemoryFundraisingStore::default()
    } else {
        InMemoryFundraisingStore::with_records(demo_campaigns())
    });
    let notifier = Arc::new(TracingNotifier);
    let status_service = Arc::new(FundraisingStatusService::new(
        store.clone(),
        notifier.clone(),
    ));
    let review_service = Arc::new(ReviewService::new(
        store.clone(),
        store,
        notifier,
        &config.review,
    ));

    let app = with_workflow_routes(status_service, review_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        queue_page_size = config.review.queue_page_size,
        "fundraising review engine ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
