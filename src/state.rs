use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::backend::BackendApi;
use crate::services::intake::FormRegistry;

pub struct AppState {
    pub config: AppConfig,
    pub backend: Arc<dyn BackendApi>,
    pub forms: FormRegistry,
}
