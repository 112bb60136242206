pub mod host;
pub mod interface;
pub mod mac;
pub mod range;
