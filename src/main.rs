use std::{net::TcpListener, sync::Arc};

use about_us_scraper::{configuration::get_configuration, services::ApifyClient, startup::run};
use anyhow::Context;
use env_logger::Env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let configuration = get_configuration().context("Failed to read configuration.")?;

    let address = format!(
        "{}:{}",
        configuration.application.host, configuration.application.port
    );
    let listener = TcpListener::bind(&address)?;
    let apify_client =
        ApifyClient::new(&configuration.apify).context("Failed to build the Apify client.")?;

    log::info!("Serving About Us scraper on {}", address);
    run(listener, Arc::new(apify_client), &configuration.application)?.await?;

    Ok(())
}
