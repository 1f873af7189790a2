use anyhow::Context;
use aws_config::BehaviorVersion;
use awschat_cli::{build_agent, run_cli, ChatConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = ChatConfig::from_env().context("invalid configuration")?;
    let sdk_config = aws_config::load_defaults(BehaviorVersion::latest()).await;

    let agent = build_agent(&config, &sdk_config)
        .await
        .context("failed to build agent")?;
    log::info!("agent ready with {} tools", agent.list_tools().len());

    run_cli(agent).await?;
    Ok(())
}
