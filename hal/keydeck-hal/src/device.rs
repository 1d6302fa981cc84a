//! HID device abstractions
//!
//! Provides the traits a HID library must implement to enumerate devices,
//! open one, and exchange raw reports with it.

use crate::error::HidError;

/// One entry of a HID enumeration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceListing {
    /// Platform path used to open the device
    pub path: String,
    /// USB vendor ID
    pub vendor_id: u16,
    /// USB product ID
    pub product_id: u16,
    /// Product string, if the device reports one
    pub product: Option<String>,
    /// HID usage ID of this interface
    pub usage: u16,
    /// HID usage page of this interface
    pub usage_page: u16,
}

/// Descriptor fields a device must match to be selected
///
/// A keyboard exposes several HID interfaces; only the raw HID one
/// (usage page 0xFF60, usage 0x61 on QMK) accepts display reports, so all
/// three fields must match exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceMatch {
    /// Exact product string
    pub product: String,
    /// HID usage ID
    pub usage: u16,
    /// HID usage page
    pub usage_page: u16,
}

impl DeviceMatch {
    /// Check whether an enumeration entry matches
    pub fn matches(&self, listing: &DeviceListing) -> bool {
        listing.product.as_deref() == Some(self.product.as_str())
            && listing.usage == self.usage
            && listing.usage_page == self.usage_page
    }
}

/// An open HID device
///
/// Report I/O must never block indefinitely: reads return immediately with
/// `Ok(0)` when nothing is pending.
pub trait HidDevice {
    /// Write one report, report ID byte included
    ///
    /// Returns the number of bytes accepted by the device.
    fn write_report(&mut self, report: &[u8]) -> Result<usize, HidError>;

    /// Read one pending input report without blocking
    ///
    /// Returns the number of bytes read, or 0 if no report is pending.
    fn read_report(&mut self, buf: &mut [u8]) -> Result<usize, HidError>;
}

/// HID library entry point
pub trait HidBackend {
    /// Device handle type produced by [`HidBackend::open`]
    type Device: HidDevice;

    /// List currently attached HID interfaces
    fn enumerate(&mut self) -> Result<Vec<DeviceListing>, HidError>;

    /// Open a listed device in non-blocking mode
    fn open(&mut self, listing: &DeviceListing) -> Result<Self::Device, HidError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(product: Option<&str>, usage: u16, usage_page: u16) -> DeviceListing {
        DeviceListing {
            path: "hid-0".into(),
            vendor_id: 0x04D8,
            product_id: 0xEB2D,
            product: product.map(Into::into),
            usage,
            usage_page,
        }
    }

    fn target() -> DeviceMatch {
        DeviceMatch {
            product: "Lily58".into(),
            usage: 0x61,
            usage_page: 0xFF60,
        }
    }

    #[test]
    fn test_exact_match() {
        assert!(target().matches(&listing(Some("Lily58"), 0x61, 0xFF60)));
    }

    #[test]
    fn test_keyboard_interface_rejected() {
        // Same device, boot keyboard interface
        assert!(!target().matches(&listing(Some("Lily58"), 0x06, 0x01)));
    }

    #[test]
    fn test_product_must_match_exactly() {
        assert!(!target().matches(&listing(Some("Lily58 Pro"), 0x61, 0xFF60)));
        assert!(!target().matches(&listing(None, 0x61, 0xFF60)));
    }
}
