//! Application state shared across handlers.

use std::sync::Arc;

use crate::{
    cache::StoreCache,
    config::AdminConfig,
    models::SettingsStore,
    supabase::SupabaseClient,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    supabase: SupabaseClient,
    cache: StoreCache,
    settings: SettingsStore,
}

impl AppState {
    /// Build the state from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the settings file exists but is unreadable.
    pub async fn new(config: AdminConfig) -> std::io::Result<Self> {
        let supabase = SupabaseClient::new(&config.supabase);
        let settings = SettingsStore::load(config.settings_path.clone()).await?;

        Ok(Self::from_parts(config, supabase, settings))
    }

    /// Assemble state from prebuilt parts (used by tests to point the
    /// gateway at a stub backend).
    #[must_use]
    pub fn from_parts(
        config: AdminConfig,
        supabase: SupabaseClient,
        settings: SettingsStore,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                supabase,
                cache: StoreCache::new(),
                settings,
            }),
        }
    }

    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    pub fn supabase(&self) -> &SupabaseClient {
        &self.inner.supabase
    }

    pub fn cache(&self) -> &StoreCache {
        &self.inner.cache
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.inner.settings
    }
}
