pub mod canonicalize;
pub mod create;
pub mod digest;
pub mod verify;
