//! Functions and data structures for talking to a beacon node's REST API: genesis, blob
//! sidecars, and the operation pools.
//! Consensus payloads (attestations, slashings, exits, ...) are left to the caller, every
//! endpoint is generic over the serde type it decodes into or encodes from.
pub mod error;
pub mod request;
pub mod transport;
pub mod types;

pub use error::{ApiError, IndexedErrorItem, ResponseOptional};
pub use request::{ApiRequest, Method, Query};
pub use transport::{ApiResponse, BeaconNodeHttp, Transport};
pub use types::{BlockId, CommitteeIndex, GenericResponse, GenesisData, Slot};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

#[derive(Clone, Debug)]
pub struct BeaconApi<T = BeaconNodeHttp> {
    transport: T,
}

impl BeaconApi<BeaconNodeHttp> {
    pub fn from_env() -> Result<Self, ApiError> {
        Ok(Self::new(BeaconNodeHttp::new()?))
    }
}

impl<T: Transport> BeaconApi<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // A 404 means the resource does not exist (yet), which is not an error.
    async fn fetch_single<D: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Option<D>, ApiError> {
        self.transport
            .request(request)
            .await
            .optional()?
            .map(|response| decode_data(&response))
            .transpose()
    }

    async fn fetch_list<D: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Vec<D>, ApiError> {
        let path = request.path.clone();
        let response = self.transport.request(request).await?;
        let items: Vec<D> = decode_data(&response)?;
        debug!(%path, count = items.len(), "fetched pool items");
        Ok(items)
    }

    // Whatever the node answers with on success is dropped without decoding.
    async fn submit(&self, request: ApiRequest) -> Result<(), ApiError> {
        let path = request.path.clone();
        self.transport.request(request).await.map_err(|err| {
            if let Some(failures) = err.indexed_failures() {
                warn!(%path, failures = failures.len(), "node rejected part of the submitted batch");
            }
            err
        })?;
        Ok(())
    }

    /// `GET /eth/v1/beacon/genesis`
    ///
    /// Returns `Ok(None)` when the chain has not reached genesis yet.
    pub async fn genesis(&self) -> Result<Option<GenesisData>, ApiError> {
        self.fetch_single(ApiRequest::get("/eth/v1/beacon/genesis"))
            .await
    }

    /// `GET /eth/v1/beacon/blobs_sidecar/{block_id}`
    ///
    /// Returns `Ok(None)` when the node has no sidecar for the block.
    pub async fn blobs_sidecar<D: DeserializeOwned>(
        &self,
        block_id: &BlockId,
    ) -> Result<Option<D>, ApiError> {
        self.fetch_single(ApiRequest::get(format!(
            "/eth/v1/beacon/blobs_sidecar/{block_id}"
        )))
        .await
    }

    /// `GET /eth/v1/beacon/blob_sidecars/{block_id}?indices`
    ///
    /// Without `indices` every sidecar of the block is returned.
    pub async fn blob_sidecars<D: DeserializeOwned>(
        &self,
        block_id: &BlockId,
        indices: Option<&[u64]>,
    ) -> Result<Option<Vec<D>>, ApiError> {
        let indices = indices.map(|indices| {
            indices
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(",")
        });
        let mut query = Query::new();
        query.push_opt("indices", indices);

        self.fetch_single(ApiRequest::get_with_query(
            format!("/eth/v1/beacon/blob_sidecars/{block_id}"),
            query,
        ))
        .await
    }

    /// `GET /eth/v1/beacon/pool/attestations?slot&committee_index`
    ///
    /// Attestations known by the node but not necessarily included in any block. Each filter
    /// is sent only when given.
    pub async fn pool_attestations<D: DeserializeOwned>(
        &self,
        slot: Option<Slot>,
        committee_index: Option<CommitteeIndex>,
    ) -> Result<Vec<D>, ApiError> {
        let mut query = Query::new();
        query
            .push_opt("slot", slot)
            .push_opt("committee_index", committee_index);

        self.fetch_list(ApiRequest::get_with_query(
            "/eth/v1/beacon/pool/attestations",
            query,
        ))
        .await
    }

    /// `POST /eth/v1/beacon/pool/attestations`
    ///
    /// Each attestation is validated on its own. When some fail the node answers with which
    /// ones and why, available through [`ApiError::indexed_failures`] with indices pointing
    /// into `attestations`.
    pub async fn submit_attestations<D: Serialize>(
        &self,
        attestations: &[D],
    ) -> Result<(), ApiError> {
        self.submit(ApiRequest::post(
            "/eth/v1/beacon/pool/attestations",
            attestations,
        )?)
        .await
    }

    /// `GET /eth/v1/beacon/pool/attester_slashings`
    pub async fn pool_attester_slashings<D: DeserializeOwned>(
        &self,
    ) -> Result<Vec<D>, ApiError> {
        self.fetch_list(ApiRequest::get("/eth/v1/beacon/pool/attester_slashings"))
            .await
    }

    /// `POST /eth/v1/beacon/pool/attester_slashings`
    pub async fn submit_attester_slashing<D: Serialize>(
        &self,
        slashing: &D,
    ) -> Result<(), ApiError> {
        self.submit(ApiRequest::post(
            "/eth/v1/beacon/pool/attester_slashings",
            slashing,
        )?)
        .await
    }

    /// `GET /eth/v1/beacon/pool/proposer_slashings`
    pub async fn pool_proposer_slashings<D: DeserializeOwned>(
        &self,
    ) -> Result<Vec<D>, ApiError> {
        self.fetch_list(ApiRequest::get("/eth/v1/beacon/pool/proposer_slashings"))
            .await
    }

    /// `POST /eth/v1/beacon/pool/proposer_slashings`
    pub async fn submit_proposer_slashing<D: Serialize>(
        &self,
        slashing: &D,
    ) -> Result<(), ApiError> {
        self.submit(ApiRequest::post(
            "/eth/v1/beacon/pool/proposer_slashings",
            slashing,
        )?)
        .await
    }

    /// `GET /eth/v1/beacon/pool/voluntary_exits`
    pub async fn pool_voluntary_exits<D: DeserializeOwned>(
        &self,
    ) -> Result<Vec<D>, ApiError> {
        self.fetch_list(ApiRequest::get("/eth/v1/beacon/pool/voluntary_exits"))
            .await
    }

    /// `POST /eth/v1/beacon/pool/voluntary_exits`
    pub async fn submit_voluntary_exit<D: Serialize>(
        &self,
        exit: &D,
    ) -> Result<(), ApiError> {
        self.submit(ApiRequest::post(
            "/eth/v1/beacon/pool/voluntary_exits",
            exit,
        )?)
        .await
    }

    /// `POST /eth/v1/beacon/pool/sync_committees`
    ///
    /// There is no endpoint to read this pool back.
    pub async fn submit_sync_committee_messages<D: Serialize>(
        &self,
        messages: &[D],
    ) -> Result<(), ApiError> {
        self.submit(ApiRequest::post(
            "/eth/v1/beacon/pool/sync_committees",
            messages,
        )?)
        .await
    }

    /// `POST /eth/v1/beacon/pool/bls_to_execution_changes`
    pub async fn submit_bls_to_execution_changes<D: Serialize>(
        &self,
        changes: &[D],
    ) -> Result<(), ApiError> {
        self.submit(ApiRequest::post(
            "/eth/v1/beacon/pool/bls_to_execution_changes",
            changes,
        )?)
        .await
    }
}

fn decode_data<D: DeserializeOwned>(response: &ApiResponse) -> Result<D, ApiError> {
    serde_json::from_slice::<GenericResponse<D>>(&response.body)
        .map(|envelope| envelope.data)
        .map_err(ApiError::Decode)
}
