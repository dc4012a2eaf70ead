use crate::{
    auth::jwt::JwtService,
    extraction::Extractor,
    import::ImportPipeline,
    repositories::{ItemRepository, ItemRepositoryTrait, UserRepository, UserRepositoryTrait},
};
use axum::extract::FromRef;
use sqlx::{Pool, Postgres};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub user_repo: Arc<dyn UserRepositoryTrait + Send + Sync>,
    pub item_repo: Arc<dyn ItemRepositoryTrait + Send + Sync>,
    pub importer: Arc<ImportPipeline>,
    pub jwt: Arc<JwtService>,
    pub db_pool: Pool<Postgres>,
}

impl AppState {
    pub fn new(pool: Pool<Postgres>, extractor: Arc<dyn Extractor>, jwt: JwtService) -> Self {
        let item_repo: Arc<dyn ItemRepositoryTrait + Send + Sync> =
            Arc::new(ItemRepository::new(pool.clone()));
        Self {
            user_repo: Arc::new(UserRepository::new(pool.clone())),
            importer: Arc::new(ImportPipeline::new(item_repo.clone(), extractor)),
            item_repo,
            jwt: Arc::new(jwt),
            db_pool: pool,
        }
    }
}

impl FromRef<AppState> for Arc<JwtService> {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}
