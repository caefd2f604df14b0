pub mod beacon_api;
pub mod env;
pub mod json_codecs;
pub mod logging;

pub use beacon_api::{ApiError, BeaconApi, BeaconNodeHttp, IndexedErrorItem, Transport};
