/// Backend REST API client
///
/// Endpoints implemented:
/// 1. GET  /comments?tokenAddress={address} - Comment list for a token
/// 2. POST /comments - Post a comment (bearer auth)
/// 3. GET  /trades?tokenAddress={address}&limit={n} - Latest trades for a token
pub mod backend;
pub mod client;

pub use backend::HttpBackend;
pub use client::HttpClient;
