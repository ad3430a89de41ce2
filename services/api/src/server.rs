use crate::cli::ServeArgs;
use crate::infra::{load_alias_table, AppState, InMemoryLeadStore, ScoringContext, TracingNotifier};
use crate::routes::with_lead_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use fetti_leads::config::AppConfig;
use fetti_leads::error::AppError;
use fetti_leads::leads::capture::{
    CsvLeadStore, LeadCaptureService, LeadStore, UnconfiguredSummarizer,
};
use fetti_leads::telemetry;
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

    let aliases = load_alias_table(&config.storage)?;
    let scoring = ScoringContext::new(aliases, config.scoring.clone());

    if args.ephemeral {
        info!("captured leads are kept in memory only");
        serve(config, Arc::new(InMemoryLeadStore::default()), scoring).await
    } else {
        info!(path = %config.storage.captured_csv.display(), "captured leads stored on disk");
        let store = Arc::new(CsvLeadStore::new(config.storage.captured_csv.clone()));
        serve(config, store, scoring).await
    }
}

async fn serve<S>(config: AppConfig, store: Arc<S>, scoring: ScoringContext) -> Result<(), AppError>
where
    S: LeadStore + 'static,
{
    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let capture_service = Arc::new(LeadCaptureService::new(
        store,
        Arc::new(TracingNotifier),
        Arc::new(UnconfiguredSummarizer),
        config.notification.clone(),
    ));

    let app = with_lead_routes(capture_service, scoring)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "lead engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}
