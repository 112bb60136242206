pub mod channel;
pub mod dns;
pub mod tcp;
