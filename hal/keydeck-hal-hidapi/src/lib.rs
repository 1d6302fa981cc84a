//! hidapi backend for keydeck
//!
//! Implements the `keydeck-hal` traits on top of the `hidapi` crate
//! (hidraw on Linux, IOHIDManager on macOS, the HID class driver on
//! Windows). Devices are opened in non-blocking mode so input polling
//! never stalls the event loop.

use std::ffi::CString;

use hidapi::{HidApi, HidDevice as RawDevice};
use log::{debug, trace};

use keydeck_hal::{DeviceListing, HidBackend, HidDevice, HidError};

/// HID backend backed by a shared `HidApi` context
///
/// Only one `HidApi` may exist per process on some platforms, so the
/// context is created once and reused for every rediscovery.
pub struct HidapiBackend {
    api: HidApi,
}

impl HidapiBackend {
    /// Initialise the platform HID library
    pub fn new() -> Result<Self, HidError> {
        let api = HidApi::new().map_err(backend_error)?;
        Ok(Self { api })
    }
}

impl HidBackend for HidapiBackend {
    type Device = HidapiDevice;

    fn enumerate(&mut self) -> Result<Vec<DeviceListing>, HidError> {
        self.api.refresh_devices().map_err(backend_error)?;

        let listings: Vec<DeviceListing> = self
            .api
            .device_list()
            .map(|info| DeviceListing {
                path: info.path().to_string_lossy().into_owned(),
                vendor_id: info.vendor_id(),
                product_id: info.product_id(),
                product: info.product_string().map(str::to_owned),
                usage: info.usage(),
                usage_page: info.usage_page(),
            })
            .collect();

        trace!("Enumerated {} HID interfaces", listings.len());
        Ok(listings)
    }

    fn open(&mut self, listing: &DeviceListing) -> Result<Self::Device, HidError> {
        let path = CString::new(listing.path.as_str())
            .map_err(|_| HidError::Backend(format!("invalid device path {:?}", listing.path)))?;

        let device = self.api.open_path(&path).map_err(backend_error)?;
        device.set_blocking_mode(false).map_err(backend_error)?;

        debug!(
            "Opened {:04x}:{:04x} at {}",
            listing.vendor_id, listing.product_id, listing.path
        );
        Ok(HidapiDevice { device })
    }
}

/// An open hidapi device
pub struct HidapiDevice {
    device: RawDevice,
}

impl HidDevice for HidapiDevice {
    fn write_report(&mut self, report: &[u8]) -> Result<usize, HidError> {
        self.device.write(report).map_err(backend_error)
    }

    fn read_report(&mut self, buf: &mut [u8]) -> Result<usize, HidError> {
        self.device.read(buf).map_err(backend_error)
    }
}

fn backend_error(err: hidapi::HidError) -> HidError {
    HidError::Backend(err.to_string())
}
