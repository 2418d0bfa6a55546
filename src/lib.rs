#[macro_use]
mod macros;
mod archive;
pub mod binary2;
pub mod error;
pub mod nufx;
mod read;
mod signature;
mod time_conv;
mod unpack;

pub use archive::Archive;
pub use signature::Signature;
