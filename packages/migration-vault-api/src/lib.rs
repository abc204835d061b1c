pub mod api;
pub mod error;
pub mod msg;
pub mod phase;
pub mod response;
