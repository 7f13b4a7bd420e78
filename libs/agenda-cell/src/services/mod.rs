pub mod client;
pub mod mutation;
pub mod notify;
pub mod refresh;
