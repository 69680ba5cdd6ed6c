use anyhow::Context;
use osb_kernel::config::{BrokerSettings, load_config};
use osb_logger::Logger;
use osb_server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _log = Logger::builder().name(env!("CARGO_PKG_NAME")).errors_to_stderr(true).init()?;

    let settings: BrokerSettings =
        load_config(None::<&str>).context("Critical: Configuration is malformed")?;
    let cfg = settings.resolve().context("Critical: Configuration is invalid")?;

    Server::builder().config(cfg).build()?.run().await
}
