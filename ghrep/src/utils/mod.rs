// ghrep/src/utils/mod.rs
pub mod repo_dir;
