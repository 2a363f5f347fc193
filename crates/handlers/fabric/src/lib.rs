pub mod gateway;
pub mod resolver;
pub mod wallet;

#[cfg(test)]
mod test_server;

pub use gateway::HttpGatewayClient;
pub use resolver::FileSystemIdentityResolver;
