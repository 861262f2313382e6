use visionary_server::AppState;

use super::load_config;

pub fn run(port: Option<u16>) -> anyhow::Result<()> {
    let mut config = load_config()?;
    if let Some(port) = port {
        config.port = port;
    }
    let port = config.port;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let state = AppState::from_config(config)?;
        visionary_server::serve(state, port).await
    })
}
