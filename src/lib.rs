pub mod api;
pub mod arguments;
pub mod comments;
pub mod config;
pub mod context;
pub mod errors;
pub mod logger;
pub mod ports;
pub mod rpc;
pub mod trading;
pub mod types;

#[cfg(test)]
mod testing;
