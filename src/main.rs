use skill_catalog::{build_state, routes::build_router};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let state = match build_state() {
        Ok(state) => state,
        Err(err) => {
            tracing::error!("catalog failed to load: {:#}", err);
            return Err(err);
        }
    };
    let addr = state.config.socket_addr()?;
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("catalog service listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
