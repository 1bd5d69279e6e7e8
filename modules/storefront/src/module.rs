use std::sync::Arc;

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};

use crate::api::rest::routes;
use crate::config::InventoryConfig;
use crate::contract::client::StorefrontApi;
use crate::domain::service::{InventoryService, ServiceConfig, UserService};
use crate::gateways::local::StorefrontLocalClient;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::sea_orm_repo::SeaOrmUnitOfWorkFactory;

/// The storefront module: domain services wired to SeaORM storage.
#[derive(Clone)]
pub struct Storefront {
    inventory: Arc<InventoryService>,
    users: Arc<UserService>,
}

impl Storefront {
    /// Wire repositories (infra) to the domain services (ports).
    pub fn new(db_conn: DatabaseConnection, cfg: InventoryConfig) -> Self {
        debug!(
            "Loaded storefront config: max_name_length={}, fuzzy_cutoff={}, fuzzy_max_candidates={}",
            cfg.max_name_length, cfg.fuzzy_cutoff, cfg.fuzzy_max_candidates
        );
        let uow = Arc::new(SeaOrmUnitOfWorkFactory::new(db_conn));
        let inventory = InventoryService::new(uow.clone(), ServiceConfig::from(cfg));
        let users = UserService::new(uow);
        Self {
            inventory: Arc::new(inventory),
            users: Arc::new(users),
        }
    }

    /// Run migrations, then wire the services.
    pub async fn init(db: &db::DbHandle, cfg: InventoryConfig) -> anyhow::Result<Self> {
        info!("Initializing storefront module");
        Self::migrate(db).await?;
        Ok(Self::new(db.sea(), cfg))
    }

    pub async fn migrate(db: &db::DbHandle) -> anyhow::Result<()> {
        info!("Running storefront database migrations");
        Migrator::up(db.seaorm(), None).await?;
        info!("Storefront database migrations completed successfully");
        Ok(())
    }

    pub fn inventory(&self) -> Arc<InventoryService> {
        self.inventory.clone()
    }

    pub fn users(&self) -> Arc<UserService> {
        self.users.clone()
    }

    /// Local in-process client for other modules.
    pub fn client(&self) -> Arc<dyn StorefrontApi> {
        Arc::new(StorefrontLocalClient::new(
            self.inventory.clone(),
            self.users.clone(),
        ))
    }

    pub fn register_rest(&self, router: axum::Router) -> axum::Router {
        info!("Registering storefront REST routes");
        routes::register_routes(router, self.inventory.clone(), self.users.clone())
    }
}
