//! Parallel processing utilities

use bintax_core::{BintaxError, BintaxResult};

/// Configure the global thread pool
pub fn configure_thread_pool(threads: usize) -> BintaxResult<()> {
    let threads = if threads == 0 {
        num_cpus::get()
    } else {
        threads
    };

    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .map_err(|e| BintaxError::Configuration(e.to_string()))?;

    Ok(())
}

/// Get the number of available CPU cores
pub fn get_available_cores() -> usize {
    num_cpus::get()
}

/// Check if we should use parallel processing based on item count
pub fn should_parallelize(item_count: usize, threshold: usize) -> bool {
    item_count > threshold && rayon::current_num_threads() > 1
}
