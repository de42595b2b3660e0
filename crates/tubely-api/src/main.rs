use mimalloc::MiMalloc;
use tubely_api::setup::{initialize_app, server::start_server};
use tubely_core::Config;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    let (state, app) = initialize_app(config).await?;

    start_server(&state.config, app).await
}
