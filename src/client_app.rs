use std::fs;

use env_logger::{Builder, Target};
use log::info;
use log::LevelFilter::Info;

use mixnet_voting_client::configs::client::ClientConfig;
use mixnet_voting_client::crypto_schemes::weierstrass::PrimeCurve;
use mixnet_voting_client::data::Roster;
use mixnet_voting_client::election::{Election, ElectionConfig};
use mixnet_voting_client::schema::SchemaRegistry;
use mixnet_voting_client::transport::WsTransport;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = Builder::new();
    builder.filter_level(Info);
    builder.target(Target::Stdout);
    builder.init();

    let raw = fs::read("client_config.json")?;
    let client_config: ClientConfig = serde_json::from_slice(&raw)?;

    let config = ElectionConfig {
        name: client_config.election_name,
        roster: Roster::new(client_config.roster),
        registry: SchemaRegistry::new(),
        curve: PrimeCurve::p256(),
    };
    let mut election = Election::new(config, WsTransport)?;

    election.generate().await?;
    info!(
        "election {} opened, hash {}",
        election.name(),
        election.hash().unwrap_or("<none>")
    );

    for vote in &client_config.votes {
        election.cast(vote.as_bytes()).await?;
    }
    info!("{} ballots cast", election.ballots().len());

    election.shuffle().await?;

    let addresses: Vec<String> = election
        .roster()
        .nodes()
        .iter()
        .map(|node| node.address.clone())
        .collect();
    for address in addresses {
        let result = election.fetch(&address).await?;
        info!("{}: {} shuffled ballots", address, result.len());
        for ballot in result {
            info!("  {}", hex::encode(ballot.as_bytes()));
        }
    }

    Ok(())
}
