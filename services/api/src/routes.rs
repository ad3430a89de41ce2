use crate::infra::{AppState, ScoringContext};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use fetti_leads::error::AppError;
use fetti_leads::leads::capture::{
    lead_router, LeadCaptureService, LeadNotifier, LeadStore, UnderwritingSummarizer,
};
use fetti_leads::leads::{
    import_csv, normalize, rank_leads, score_lead, triage_leads, LeadBand, LeadRanking,
    LeadRecord, LeadScoringEngine, RankingSummary, RowFailure, ScoreComponent, ScoringConfig,
    ScoringStrategy, TriagedLead,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct ScoreRequest {
    pub(crate) records: Vec<LeadRecord>,
    #[serde(default)]
    pub(crate) config: Option<ScoringConfig>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ImportRequest {
    pub(crate) csv: String,
    #[serde(default)]
    pub(crate) config: Option<ScoringConfig>,
    #[serde(default)]
    pub(crate) strategy: ScoringStrategy,
}

#[derive(Debug, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub(crate) enum ImportResponse {
    BatchFilter {
        summary: RankingSummary,
        #[serde(flatten)]
        ranking: LeadRanking,
    },
    Triage {
        leads: Vec<TriagedLead>,
        failures: Vec<RowFailure>,
    },
}

#[derive(Debug, Serialize)]
pub(crate) struct TriageResponse {
    pub(crate) record: LeadRecord,
    pub(crate) score: i32,
    pub(crate) band: LeadBand,
    pub(crate) score_band: &'static str,
    pub(crate) score_reasons: String,
    pub(crate) components: Vec<ScoreComponent>,
}

pub(crate) fn with_lead_routes<S, N, P>(
    service: Arc<LeadCaptureService<S, N, P>>,
    scoring: ScoringContext,
) -> axum::Router
where
    S: LeadStore + 'static,
    N: LeadNotifier + 'static,
    P: UnderwritingSummarizer + 'static,
{
    lead_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/leads/score",
            axum::routing::post(score_endpoint),
        )
        .route(
            "/api/v1/leads/import",
            axum::routing::post(import_endpoint),
        )
        .route(
            "/api/v1/leads/triage",
            axum::routing::post(triage_endpoint),
        )
        .layer(Extension(scoring))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn score_endpoint(
    Extension(scoring): Extension<ScoringContext>,
    Json(payload): Json<ScoreRequest>,
) -> Json<serde_json::Value> {
    let config = payload.config.unwrap_or_else(|| scoring.defaults.clone());
    let engine = LeadScoringEngine::new(config);
    let ranking = rank_leads(
        payload.records.into_iter().enumerate(),
        &scoring.aliases,
        &engine,
    );
    let summary = ranking.summary();
    info!(
        accepted = summary.accepted,
        rejected = summary.rejected,
        "scored lead batch"
    );

    Json(json!({
        "summary": summary,
        "ranked": ranking.ranked,
        "rejected": ranking.rejected,
    }))
}

pub(crate) async fn import_endpoint(
    Extension(scoring): Extension<ScoringContext>,
    Json(payload): Json<ImportRequest>,
) -> Result<Json<ImportResponse>, AppError> {
    let ImportRequest {
        csv,
        config,
        strategy,
    } = payload;

    let import = import_csv(Cursor::new(csv.into_bytes()))?;
    let response = match strategy {
        ScoringStrategy::BatchFilter => {
            let config = config.unwrap_or_else(|| scoring.defaults.clone());
            let engine = LeadScoringEngine::new(config);
            let ranking =
                rank_leads(import.rows, &scoring.aliases, &engine).with_failures(import.failures);
            ImportResponse::BatchFilter {
                summary: ranking.summary(),
                ranking,
            }
        }
        ScoringStrategy::Triage => ImportResponse::Triage {
            leads: triage_leads(import.rows, &scoring.aliases),
            failures: import.failures,
        },
    };

    Ok(Json(response))
}

pub(crate) async fn triage_endpoint(
    Extension(scoring): Extension<ScoringContext>,
    Json(record): Json<LeadRecord>,
) -> Json<TriageResponse> {
    let record = normalize(&record, &scoring.aliases);
    let outcome = score_lead(&record);

    Json(TriageResponse {
        score: outcome.total,
        band: outcome.band,
        score_band: outcome.band.label(),
        score_reasons: outcome.reasons(),
        components: outcome.components,
        record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryLeadStore;
    use fetti_leads::leads::capture::{
        LeadNotification, NotificationSender, NotifyError, UnconfiguredSummarizer,
    };
    use fetti_leads::leads::{AliasTable, ProductFocus};
    use serde_json::Value;
    use tower::ServiceExt;

    fn context() -> ScoringContext {
        let defaults =
            ScoringConfig::new(ProductFocus::Refi, ["CA"], 640, 20_000.0).expect("valid config");
        ScoringContext::new(AliasTable::standard(), defaults)
    }

    #[derive(Default, Clone)]
    struct RecordingNotifier {
        delivered: Arc<std::sync::Mutex<Vec<LeadNotification>>>,
    }

    impl RecordingNotifier {
        fn delivered(&self) -> Vec<LeadNotification> {
            self.delivered.lock().expect("notifier mutex poisoned").clone()
        }
    }

    impl LeadNotifier for RecordingNotifier {
        fn publish(&self, notification: &LeadNotification) -> Result<(), NotifyError> {
            self.delivered
                .lock()
                .expect("notifier mutex poisoned")
                .push(notification.clone());
            Ok(())
        }
    }

    fn router() -> (axum::Router, InMemoryLeadStore, RecordingNotifier) {
        let store = InMemoryLeadStore::default();
        let notifier = RecordingNotifier::default();
        let service = Arc::new(LeadCaptureService::new(
            Arc::new(store.clone()),
            Arc::new(notifier.clone()),
            Arc::new(UnconfiguredSummarizer),
            NotificationSender::default(),
        ));
        (with_lead_routes(service, context()), store, notifier)
    }

    async fn post_json(router: axum::Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = router
            .oneshot(
                axum::http::Request::post(uri)
                    .header(axum::http::header::CONTENT_TYPE, "application/json")
                    .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 256 * 1024)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&bytes).expect("valid json"))
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn score_endpoint_ranks_with_default_config() {
        let request = ScoreRequest {
            records: vec![
                LeadRecord::new()
                    .with("Purpose", "Cash-Out Refi")
                    .with("State", "CA")
                    .with("Home Value", "600000")
                    .with("FICO", "760")
                    .with("Assets", "200000")
                    .with("LTV", "55")
                    .with("Lead Source", "facebook_ads"),
                LeadRecord::new().with("Purpose", "Purchase"),
            ],
            config: None,
        };

        let Json(body) = score_endpoint(Extension(context()), Json(request)).await;

        assert_eq!(body["summary"]["accepted"], 1);
        assert_eq!(body["summary"]["rejected"], 1);
        assert_eq!(body["ranked"][0]["score"]["total"], 85);
        assert_eq!(body["ranked"][0]["record"]["credit_score"], "760");
        assert_eq!(body["rejected"][0]["reason"]["kind"], "product_mismatch");
    }

    #[tokio::test]
    async fn score_route_accepts_config_overrides() {
        let (router, _, _) = router();
        let (status, body) = post_json(
            router,
            "/api/v1/leads/score",
            json!({
                "records": [{ "Purpose": "Purchase", "FICO": 700 }],
                "config": { "product_focus": "Purchase", "min_credit_score": 680 }
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"]["accepted"], 1);
        assert_eq!(body["ranked"][0]["record"]["loan_purpose"], "Purchase");
    }

    #[tokio::test]
    async fn score_route_rejects_invalid_config() {
        let (router, _, _) = router();
        let (status, _) = post_json(
            router,
            "/api/v1/leads/score",
            json!({ "records": [], "config": { "min_credit_score": 100 } }),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn import_endpoint_reports_bad_rows_and_keeps_scoring() {
        let request = ImportRequest {
            csv: "FICO,Purpose\n700,refinance\nbroken\n600,refi\n".to_string(),
            config: None,
            strategy: ScoringStrategy::BatchFilter,
        };

        let Json(response) = import_endpoint(Extension(context()), Json(request))
            .await
            .expect("import succeeds");

        match response {
            ImportResponse::BatchFilter { summary, ranking } => {
                assert_eq!(summary.total, 3);
                assert_eq!(summary.accepted, 1);
                assert_eq!(summary.rejected, 1);
                assert_eq!(summary.failed, 1);
                assert_eq!(ranking.failures[0].row, 1);
            }
            other => panic!("expected batch response, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn import_route_supports_triage_strategy() {
        let (router, _, _) = router();
        let (status, body) = post_json(
            router,
            "/api/v1/leads/import",
            json!({
                "csv": "Credit Range,Home Value,Assets\n720+,650000,150000\n",
                "strategy": "triage"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["strategy"], "triage");
        assert_eq!(body["leads"][0]["outcome"]["total"], 70);
        assert_eq!(body["leads"][0]["outcome"]["band"], "hot");
    }

    #[tokio::test]
    async fn triage_route_normalizes_before_banding() {
        let (router, _, _) = router();
        let (status, body) = post_json(
            router,
            "/api/v1/leads/triage",
            json!({
                "Credit Range": "660-720",
                "Home Value": "$500,000",
                "Assets": 50000,
                "Purpose": "DSCR Refi"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["score"], 80);
        assert_eq!(body["score_band"], "HOT");
        assert_eq!(body["record"]["property_value"], "$500,000");
    }

    #[tokio::test]
    async fn capture_routes_are_mounted() {
        let (router, store, notifier) = router();
        let (status, body) = post_json(
            router,
            "/api/v1/leads",
            json!({
                "first_name": "Dana",
                "last_name": "Whitfield",
                "credit_band": "620-660",
                "property_value": 300000
            }),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["score"], 25);
        assert_eq!(body["notification"]["status"], "sent");
        assert_eq!(store.list().expect("list").len(), 1);
        let delivered = notifier.delivered();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].subject, "New Fetti Lead: Dana Whitfield");
    }
}
