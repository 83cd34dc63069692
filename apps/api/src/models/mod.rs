pub mod analysis;
pub mod dog;
pub mod subscription;
