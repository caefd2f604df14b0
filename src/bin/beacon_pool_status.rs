use anyhow::{Context, Result};
use beacon_api_client::beacon_api::BlockId;
use beacon_api_client::{logging, BeaconApi};
use futures::try_join;
use serde_json::Value;
use tracing::info;

#[tokio::main]
pub async fn main() -> Result<()> {
    logging::init();

    // Block whose blob sidecars are checked, head when no argument is given.
    let block_id = std::env::args()
        .nth(1)
        .map(|arg| arg.parse::<BlockId>())
        .transpose()?
        .unwrap_or(BlockId::Head);

    let beacon_api = BeaconApi::from_env().context("failed to create beacon api client")?;
    info!(
        beacon_url = beacon_api.transport().beacon_url(),
        "checking beacon node operation pools"
    );

    match beacon_api.genesis().await? {
        Some(genesis) => info!(
            genesis_time = ?genesis.genesis_date_time(),
            genesis_validators_root = %genesis.genesis_validators_root,
            "chain genesis"
        ),
        None => info!("chain has not reached genesis yet"),
    }

    match beacon_api
        .blob_sidecars::<Value>(&block_id, None)
        .await?
    {
        Some(sidecars) => info!(%block_id, blob_sidecars = sidecars.len(), "blob sidecars"),
        None => info!(%block_id, "no blob sidecars for block"),
    }

    let (attestations, attester_slashings, proposer_slashings, voluntary_exits) = try_join!(
        beacon_api.pool_attestations::<Value>(None, None),
        beacon_api.pool_attester_slashings::<Value>(),
        beacon_api.pool_proposer_slashings::<Value>(),
        beacon_api.pool_voluntary_exits::<Value>(),
    )?;

    info!(
        attestations = attestations.len(),
        attester_slashings = attester_slashings.len(),
        proposer_slashings = proposer_slashings.len(),
        voluntary_exits = voluntary_exits.len(),
        "pool sizes"
    );

    Ok(())
}
