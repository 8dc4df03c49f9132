pub mod setup;
pub mod verify;

pub use setup::SetupOptions;
pub use verify::VerifyOptions;
