pub mod input;
pub mod tree;
