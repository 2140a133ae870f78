pub mod sponge;
pub mod transcript;
