use eyre::{Result, WrapErr};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;

pub fn create_session<P: AsRef<Path>>(model_path: P, num_threads: usize) -> Result<Session> {
    let model_path = model_path.as_ref();
    let session = Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(num_threads)?
        .with_inter_threads(1)?
        .commit_from_file(model_path)
        .wrap_err_with(|| format!("failed to load model {}", model_path.display()))?;
    Ok(session)
}
