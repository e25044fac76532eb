use std::sync::Arc;
use std::time::Duration;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use design_intake::config::AppConfig;
use design_intake::handlers;
use design_intake::services::backend::http::HttpBackend;
use design_intake::services::backend::BackendApi;
use design_intake::services::intake::{FormRegistry, IntakeServices};
use design_intake::services::notify::emailjs::EmailJsNotifier;
use design_intake::services::phone::PhoneValidator;
use design_intake::state::AppState;

const FORM_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let backend: Arc<dyn BackendApi> =
        Arc::new(HttpBackend::new(config.api_base_url.clone(), config.http_timeout())?);
    tracing::info!("using content API at {}", config.api_base_url);

    if !config.emailjs_configured() {
        tracing::warn!("EmailJS credentials missing, notification emails will fail");
    }
    let notifier = EmailJsNotifier::new(
        config.emailjs_url.clone(),
        config.emailjs_service_id.clone(),
        config.emailjs_template_id.clone(),
        config.emailjs_public_key.clone(),
        config.emailjs_private_key.clone(),
        config.http_timeout(),
    )?;

    if config.phone_strict {
        tracing::info!("strict phone validation enabled");
    }

    let forms = FormRegistry::new(IntakeServices {
        backend: Arc::clone(&backend),
        notifier: Arc::new(notifier),
        phones: PhoneValidator::new(config.phone_strict),
        reset_delay: config.reset_delay(),
        to_name: config.notify_to_name.clone(),
    });

    let state = Arc::new(AppState {
        config: config.clone(),
        backend,
        forms,
    });

    let sweeper = Arc::clone(&state);
    let idle_ttl = config.form_idle_ttl();
    tokio::spawn(async move {
        let mut tick = tokio::time::interval(FORM_SWEEP_INTERVAL);
        loop {
            tick.tick().await;
            let evicted = sweeper.forms.sweep(idle_ttl);
            if evicted > 0 {
                tracing::info!(evicted, open = sweeper.forms.len(), "swept idle forms");
            }
        }
    });

    let app = handlers::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
