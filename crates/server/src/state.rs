use std::sync::Arc;
use std::time::Duration;

use docflow_core::{
    Config, EtlDriver, EtlService, FileStorage, HealthProber, JobPoller, OcrDriver, OcrService,
    StatusReporter, SubmissionRouter,
};

/// Shared application state
pub struct AppState {
    config: Config,
    router: SubmissionRouter,
    ocr: Arc<dyn OcrService>,
    etl: Arc<dyn EtlService>,
    prober: HealthProber,
}

impl AppState {
    /// Wire the submission pipeline around the three collaborators.
    pub fn new(
        config: Config,
        storage: Arc<dyn FileStorage>,
        ocr: Arc<dyn OcrService>,
        etl: Arc<dyn EtlService>,
    ) -> Self {
        let reporter = StatusReporter::new();

        let poller = JobPoller::new(Arc::clone(&etl), config.poller.clone());
        let ocr_driver = OcrDriver::new(Arc::clone(&storage), Arc::clone(&ocr));
        let etl_driver = EtlDriver::new(
            Arc::clone(&storage),
            Arc::clone(&etl),
            poller,
            config.etl.clone(),
        );
        let router = SubmissionRouter::new(reporter, ocr_driver, etl_driver, config.ocr.clone());

        let prober = HealthProber::new(
            storage,
            Arc::clone(&ocr),
            Arc::clone(&etl),
            Duration::from_secs(u64::from(config.services.health_timeout_secs)),
        );

        Self {
            config,
            router,
            ocr,
            etl,
            prober,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn router(&self) -> &SubmissionRouter {
        &self.router
    }

    pub fn reporter(&self) -> &StatusReporter {
        self.router.reporter()
    }

    pub fn ocr(&self) -> &dyn OcrService {
        self.ocr.as_ref()
    }

    pub fn etl(&self) -> &dyn EtlService {
        self.etl.as_ref()
    }

    pub fn prober(&self) -> &HealthProber {
        &self.prober
    }
}
