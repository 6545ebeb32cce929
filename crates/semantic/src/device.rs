//! Compute device negotiation.
//!
//! The device is resolved exactly once, while the model handle is being
//! built. Nothing on the encode path looks at it again.

use candle_core::Device;
use serde::{Deserialize, Serialize};

use crate::config::DevicePreference;

/// Outcome of device negotiation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ComputeDevice {
    /// GPU.
    Accelerated,
    /// CPU.
    Fallback,
}

/// Capability query used when the configured preference is `auto`.
pub trait DeviceSelector: Send + Sync {
    fn select(&self) -> ComputeDevice;
}

/// Picks CUDA when candle was built with it and a device is visible.
#[derive(Debug, Default, Clone, Copy)]
pub struct CudaProbe;

impl DeviceSelector for CudaProbe {
    fn select(&self) -> ComputeDevice {
        if candle_core::utils::cuda_is_available() {
            ComputeDevice::Accelerated
        } else {
            ComputeDevice::Fallback
        }
    }
}

/// Always answers with the wrapped device.
#[derive(Debug, Clone, Copy)]
pub struct FixedDevice(pub ComputeDevice);

impl DeviceSelector for FixedDevice {
    fn select(&self) -> ComputeDevice {
        self.0
    }
}

pub(crate) fn resolve_device(
    preference: DevicePreference,
    selector: &dyn DeviceSelector,
) -> ComputeDevice {
    match preference {
        DevicePreference::Cpu => ComputeDevice::Fallback,
        DevicePreference::Cuda => ComputeDevice::Accelerated,
        DevicePreference::Auto => selector.select(),
    }
}

/// Maps the negotiated device onto a candle device. A missing GPU degrades to
/// the CPU instead of failing the load.
pub(crate) fn candle_device(requested: ComputeDevice) -> (Device, ComputeDevice) {
    match requested {
        ComputeDevice::Fallback => (Device::Cpu, ComputeDevice::Fallback),
        ComputeDevice::Accelerated => match Device::new_cuda(0) {
            Ok(device) => (device, ComputeDevice::Accelerated),
            Err(err) => {
                tracing::warn!(error = %err, "CUDA not available, falling back to CPU");
                (Device::Cpu, ComputeDevice::Fallback)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_preferences_skip_the_selector() {
        let selector = FixedDevice(ComputeDevice::Accelerated);
        assert_eq!(
            resolve_device(DevicePreference::Cpu, &selector),
            ComputeDevice::Fallback
        );

        let selector = FixedDevice(ComputeDevice::Fallback);
        assert_eq!(
            resolve_device(DevicePreference::Cuda, &selector),
            ComputeDevice::Accelerated
        );
    }

    #[test]
    fn auto_asks_the_selector() {
        for device in [ComputeDevice::Accelerated, ComputeDevice::Fallback] {
            assert_eq!(
                resolve_device(DevicePreference::Auto, &FixedDevice(device)),
                device
            );
        }
    }

    #[test]
    fn fallback_maps_to_cpu() {
        let (device, resolved) = candle_device(ComputeDevice::Fallback);
        assert!(device.is_cpu());
        assert_eq!(resolved, ComputeDevice::Fallback);
    }

    #[test]
    #[cfg(not(feature = "cuda"))]
    fn accelerated_without_cuda_degrades_to_cpu() {
        let (device, resolved) = candle_device(ComputeDevice::Accelerated);
        assert!(device.is_cpu());
        assert_eq!(resolved, ComputeDevice::Fallback);
    }

    #[test]
    #[cfg(not(feature = "cuda"))]
    fn probe_reports_fallback_without_cuda() {
        assert_eq!(CudaProbe.select(), ComputeDevice::Fallback);
    }
}
