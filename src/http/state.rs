//! # Shared Application State

use std::sync::Arc;

use chrono::Duration;

use crate::auth::{
    email::create_email_sender, AuthService, EmailSender, JwtConfig, JwtManager, PasswordPolicy,
};
use crate::config::ServerConfig;
use crate::geo::{Geocoder, StaticGeocoder};
use crate::store::{CollectionStore, MemoryStore};
use crate::uploads::{LocalBackend, PhotoPolicy, PhotoService};

/// State shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CollectionStore>,
    pub auth: Arc<AuthService>,
    pub photos: Arc<PhotoService<LocalBackend>>,
    pub geocoder: Arc<dyn Geocoder>,
}

impl AppState {
    /// Build the production state from configuration
    pub fn from_config(config: &ServerConfig) -> Self {
        let store: Arc<dyn CollectionStore> = Arc::new(MemoryStore::new());
        let emails = create_email_sender(config.email_config());
        let geocoder: Arc<dyn Geocoder> = Arc::new(StaticGeocoder::with_builtin_table());

        Self::with_parts(store, emails, geocoder, config)
    }

    /// Build state from explicit collaborators (used by tests to inject an
    /// in-memory email sender or a custom geocoder)
    pub fn with_parts(
        store: Arc<dyn CollectionStore>,
        emails: Arc<dyn EmailSender>,
        geocoder: Arc<dyn Geocoder>,
        config: &ServerConfig,
    ) -> Self {
        let jwt = JwtManager::new(JwtConfig {
            secret: config.jwt_secret.clone(),
            token_ttl: Duration::days(config.jwt_expire_days),
            issuer: "campdir".to_string(),
        });

        let auth = Arc::new(AuthService::new(
            store.clone(),
            jwt,
            PasswordPolicy::default(),
            emails,
        ));

        let photos = Arc::new(PhotoService::new(
            LocalBackend::new(config.file_upload_path.clone().into()),
            PhotoPolicy {
                max_bytes: config.max_file_upload,
            },
        ));

        Self {
            store,
            auth,
            photos,
            geocoder,
        }
    }
}
