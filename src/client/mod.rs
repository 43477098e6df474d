//! Client side of the observation API.

pub mod remote;

pub use remote::{
    normalize_base_url, Connector, RemoteClient, RemoteConnector, RuntimeSource, CONNECT_TIMEOUT,
    REQUEST_TIMEOUT,
};
