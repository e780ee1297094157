//! Wires configuration into a ready `AppState`
//!
//! The store backend is chosen at runtime, so the repository is held as a
//! trait object while the dispatcher stays concrete.

use std::sync::Arc;

use otp_core::repositories::{IdentityRepository, InMemoryIdentityRepository};
use otp_core::services::verification::{OtpVerificationService, VerificationServiceConfig};
use otp_infra::database::{DatabasePool, MySqlIdentityRepository};
use otp_infra::{create_email_service, create_sms_service, InfrastructureError, NotificationDispatcher};
use otp_shared::{AppConfig, StoreBackend};

use crate::routes::auth::AppState;

/// State served by the binary
pub type ServiceState = AppState<dyn IdentityRepository, NotificationDispatcher>;

/// Build the identity store, the provider clients and the verification service
pub async fn build_state(config: &AppConfig) -> Result<ServiceState, InfrastructureError> {
    let repository = build_repository(config).await?;

    let email = create_email_service(&config.mail)?;
    let sms = create_sms_service(&config.sms)?;
    tracing::info!(
        mail_provider = email.provider_name(),
        sms_provider = sms.provider_name(),
        sms_dispatch_enabled = config.verification.sms_dispatch_enabled,
        merge_policy = ?config.verification.merge_policy,
        "Notification providers ready"
    );

    let dispatcher = Arc::new(NotificationDispatcher::new(
        email,
        sms,
        config.verification.brand_name.clone(),
    ));
    let service = OtpVerificationService::new(
        repository,
        dispatcher,
        VerificationServiceConfig::from(&config.verification),
    );

    Ok(AppState::new(Arc::new(service)))
}

async fn build_repository(config: &AppConfig) -> Result<Arc<dyn IdentityRepository>, InfrastructureError> {
    match config.database.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory identity store; records are lost on restart");
            Ok(Arc::new(InMemoryIdentityRepository::new()))
        }
        StoreBackend::MySql => {
            let pool = DatabasePool::new(config.database.clone()).await?;
            if config.database.run_migrations {
                pool.run_migrations().await?;
            }
            tracing::info!(stats = %pool.get_statistics(), "Identity store connected");
            Ok(Arc::new(MySqlIdentityRepository::new(pool.get_pool().clone())))
        }
    }
}
