use crate::cli::ArtifactArgs;
use metrics_exporter_prometheus::PrometheusHandle;
use sales_forecast::config::ArtifactConfig;
use sales_forecast::prediction::{
    ArtifactError, SalesPredictionService, StandardScaler, TreeEnsemble,
};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

pub(crate) type ForecastService = SalesPredictionService<StandardScaler, TreeEnsemble>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn apply_artifact_overrides(config: &mut ArtifactConfig, args: ArtifactArgs) {
    if let Some(scaler) = args.scaler {
        config.scaler_path = scaler;
    }
    if let Some(model) = args.model {
        config.model_path = model;
    }
}

/// Loads both artifacts once; the returned service is shared read-only.
pub(crate) fn load_prediction_service(
    config: &ArtifactConfig,
) -> Result<Arc<ForecastService>, ArtifactError> {
    let scaler = StandardScaler::from_path(&config.scaler_path)?;
    info!(path = %config.scaler_path.display(), features = scaler.width(), "scaler loaded");

    let model = TreeEnsemble::from_path(&config.model_path)?;
    info!(path = %config.model_path.display(), trees = model.tree_count(), "model loaded");

    Ok(Arc::new(SalesPredictionService::new(
        Arc::new(scaler),
        Arc::new(model),
    )))
}
