mod api;
mod methods;

pub use api::{RelayReadRpcApiServer, RelayWriteRpcApiServer};
