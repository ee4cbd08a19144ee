use anyhow::Result;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

use axum::Router;

use crate::{
    config::config::Config,
    core::state::AppState,
    database::connect::{connect_database, run_migrations},
    routes::create_routers,
    services::google::GoogleProvider,
};

pub async fn create_server(config: Config) -> Result<(Router<()>, DatabaseConnection)> {
    let db_conn = connect_database(&config).await?;
    run_migrations(&db_conn).await?;

    let provider = Arc::new(GoogleProvider::new(&config));
    let state = AppState::new(db_conn.clone(), config, provider)?;

    let app = create_routers(Arc::new(state));

    Ok((app, db_conn))
}
