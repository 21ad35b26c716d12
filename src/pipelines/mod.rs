mod build;
mod check;
mod common;
mod env;

pub use build::{execute_build_pipeline, BuildArgs};
pub use check::execute_check_pipeline;
pub use common::LoaderOverrides;
pub use env::execute_env_pipeline;
