pub mod cluster;
pub mod fold;
pub mod split;
