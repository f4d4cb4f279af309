use std::path::Path;

use tracing_subscriber::{fmt, EnvFilter};

fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(env_filter).with_target(false).init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let context_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "deploy.json".to_string());
    tracing::info!(context = %context_path, "starting deployment synthesis");

    let plan = deployer::synthesize(Path::new(&context_path))?;
    println!("{}", plan.to_json()?);
    Ok(())
}
