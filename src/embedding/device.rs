use candle_core::Device;
use tracing::{debug, warn};

/// Selects the compute device for the embedder based on enabled features.
///
/// GPU backends are tried in order (Metal, then CUDA); any failure falls back to CPU, so
/// this never fails.
pub fn select_device() -> Device {
    #[cfg(feature = "metal")]
    {
        match Device::new_metal(0) {
            Ok(device) => {
                tracing::info!("Embedder using Metal GPU");
                return device;
            }
            Err(e) => warn!(error = %e, "Metal device unavailable"),
        }
    }

    #[cfg(feature = "cuda")]
    {
        match Device::new_cuda(0) {
            Ok(device) => {
                tracing::info!("Embedder using CUDA GPU");
                return device;
            }
            Err(e) => warn!(error = %e, "CUDA device unavailable"),
        }
    }

    if cfg!(any(feature = "metal", feature = "cuda")) {
        warn!("No GPU device available, embedder falling back to CPU");
    } else {
        debug!("No GPU backend compiled, embedder using CPU");
    }

    Device::Cpu
}
