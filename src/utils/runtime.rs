use anyhow::Result;

/// The whole application runs on one thread. Storage I/O still happens asynchronously through
/// tokio's blocking pool.
pub fn single_thread_runtime() -> Result<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}
