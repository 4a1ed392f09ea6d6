use alloy::{
    network::EthereumWallet, providers::ProviderBuilder, transports::http::reqwest::Url,
};
use clap::Parser;
use eyre::WrapErr;
use tracing_subscriber::EnvFilter;

use universal_tasks::{
    cli::Cli,
    config::Config,
    context::{resolve_signer, TaskContext},
};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // A missing .env is fine, PRIVATE_KEY may come from the environment or --private-key
    load_dotenv(dotenvy::dotenv())?;

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(&cli.config)?;
    let network = config.network(&cli.network, cli.rpc_url.as_deref())?;
    let signer = resolve_signer(cli.private_key.as_deref())?;

    let rpc_url: Url = network
        .rpc_url
        .parse()
        .wrap_err_with(|| format!("invalid RPC URL {}", network.rpc_url))?;
    let sender = signer.address();
    let provider = ProviderBuilder::new()
        .with_recommended_fillers()
        .wallet(EthereumWallet::from(signer))
        .on_http(rpc_url);

    let ctx = TaskContext::connect(
        provider,
        sender,
        &cli.network,
        network.chain_id,
        cli.artifacts,
    )
    .await?;

    let output = cli.command.run(&ctx).await?;
    println!("{}", output.render(cli.json)?);

    Ok(())
}

fn load_dotenv<T>(res: dotenvy::Result<T>) -> eyre::Result<()> {
    match res {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e).wrap_err("failed to load .env"),
    }
}
