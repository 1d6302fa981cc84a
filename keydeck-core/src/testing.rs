//! Scripted HID backend for unit tests

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use keydeck_hal::{DeviceListing, DeviceMatch, HidBackend, HidDevice, HidError};

/// Shared record of everything the code under test did to the device
#[derive(Debug, Default)]
pub struct MockBus {
    /// Successful writes, in order
    pub writes: Vec<Vec<u8>>,
    /// Write attempts so far, failed ones included
    pub write_attempts: usize,
    /// Zero-based write attempt that fails
    pub fail_write_at: Option<usize>,
    /// Reports returned by successive reads
    pub inbound: VecDeque<Vec<u8>>,
    /// Next read fails
    pub fail_read: bool,
    /// Number of successful opens
    pub opens: usize,
}

impl MockBus {
    /// Writes that carried frame data (everything but init packets)
    pub fn frame_writes(&self) -> Vec<&Vec<u8>> {
        self.writes.iter().filter(|w| w.get(1) != Some(&0x01)).collect()
    }
}

pub type SharedBus = Rc<RefCell<MockBus>>;

pub struct MockBackend {
    pub listings: Vec<DeviceListing>,
    pub bus: SharedBus,
    pub fail_enumerate: bool,
    pub fail_open: bool,
}

impl MockBackend {
    /// Backend with a matching keyboard and a non-matching interface
    pub fn with_keyboard() -> (Self, SharedBus) {
        let bus = SharedBus::default();
        let backend = Self {
            listings: vec![
                listing("Lily58", 0x06, 0x01, "kbd"),
                listing("Lily58", 0x61, 0xFF60, "raw"),
            ],
            bus: bus.clone(),
            fail_enumerate: false,
            fail_open: false,
        };
        (backend, bus)
    }

    /// Backend with nothing attached
    pub fn empty() -> (Self, SharedBus) {
        let (mut backend, bus) = Self::with_keyboard();
        backend.listings.clear();
        (backend, bus)
    }
}

impl HidBackend for MockBackend {
    type Device = MockDevice;

    fn enumerate(&mut self) -> Result<Vec<DeviceListing>, HidError> {
        if self.fail_enumerate {
            return Err(HidError::Backend("enumeration failed".into()));
        }
        Ok(self.listings.clone())
    }

    fn open(&mut self, _listing: &DeviceListing) -> Result<Self::Device, HidError> {
        if self.fail_open {
            return Err(HidError::Backend("open failed".into()));
        }
        self.bus.borrow_mut().opens += 1;
        Ok(MockDevice {
            bus: self.bus.clone(),
        })
    }
}

pub struct MockDevice {
    bus: SharedBus,
}

impl HidDevice for MockDevice {
    fn write_report(&mut self, report: &[u8]) -> Result<usize, HidError> {
        let mut bus = self.bus.borrow_mut();
        let attempt = bus.write_attempts;
        bus.write_attempts += 1;
        if bus.fail_write_at == Some(attempt) {
            return Err(HidError::Backend("write failed".into()));
        }
        bus.writes.push(report.to_vec());
        Ok(report.len())
    }

    fn read_report(&mut self, buf: &mut [u8]) -> Result<usize, HidError> {
        let mut bus = self.bus.borrow_mut();
        if bus.fail_read {
            bus.fail_read = false;
            return Err(HidError::Backend("read failed".into()));
        }
        match bus.inbound.pop_front() {
            Some(report) => {
                let n = report.len().min(buf.len());
                buf[..n].copy_from_slice(&report[..n]);
                Ok(n)
            }
            None => Ok(0),
        }
    }
}

pub fn listing(product: &str, usage: u16, usage_page: u16, path: &str) -> DeviceListing {
    DeviceListing {
        path: path.into(),
        vendor_id: 0x04D8,
        product_id: 0xEB2D,
        product: Some(product.into()),
        usage,
        usage_page,
    }
}

pub fn target() -> DeviceMatch {
    DeviceMatch {
        product: "Lily58".into(),
        usage: 0x61,
        usage_page: 0xFF60,
    }
}
