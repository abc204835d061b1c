pub mod address;
pub mod amount;
pub mod client;
pub mod config;
pub mod countdown;
pub mod error;
pub mod flow;
pub mod mock_data;
pub mod session;
