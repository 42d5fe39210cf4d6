use crate::admin::AdminSite;
use crate::auth::AuthManager;
use crate::config::FlexSelectConfig;
use crate::model::Database;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub site: Arc<AdminSite>,
    pub db: Arc<Database>,
    pub auth: Arc<AuthManager>,
    pub config: Arc<FlexSelectConfig>,
}

impl AppState {
    pub fn new(
        site: AdminSite,
        db: Arc<Database>,
        auth: AuthManager,
        config: FlexSelectConfig,
    ) -> Self {
        Self {
            site: Arc::new(site),
            db,
            auth: Arc::new(auth),
            config: Arc::new(config),
        }
    }
}
