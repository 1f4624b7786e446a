pub mod github;
pub mod http_client;
