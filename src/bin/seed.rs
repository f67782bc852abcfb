use catalog_order_service::{
    config::{AppConfig, StoreBackend},
    seed::seed_demo_data,
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_target(false).init();

    let config = AppConfig::from_env()?;
    if config.store_backend != StoreBackend::Postgres {
        anyhow::bail!("seeding only makes sense for the postgres backend");
    }

    // Migrations run while the state is built.
    let state = AppState::from_config(&config).await?;
    seed_demo_data(&state).await?;

    println!("Seed completed");
    Ok(())
}
