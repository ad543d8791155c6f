//! Key material held by the server process

pub mod material;

pub use material::KeyMaterial;
