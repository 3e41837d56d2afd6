pub mod cluster;
pub mod split;
