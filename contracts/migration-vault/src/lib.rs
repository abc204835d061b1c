pub mod contract;
mod state;
mod validate;
