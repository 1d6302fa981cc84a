//! Device manager
//!
//! Owns the single live device handle. The link cycles
//! `Disconnected → Discovering → Connected → (error) → Disconnected` for
//! the life of the process; there is no terminal state and no immediate
//! reconnect after an error, the next scheduler tick rediscovers.

use log::{debug, info, trace, warn};

use keydeck_hal::{DeviceListing, DeviceMatch, HidBackend, HidDevice, HidError};
use keydeck_protocol::Packet;

/// Connection state of the display link
#[derive(Debug)]
pub enum LinkState<D> {
    /// No device open
    Disconnected,
    /// Device open and initialised
    Connected {
        /// Open handle
        device: D,
        /// Listing the handle was opened from
        listing: DeviceListing,
    },
}

/// Device manager
///
/// Exclusive owner of the device handle. The transport and input listener
/// only reach the device through [`DeviceManager::device_mut`].
pub struct DeviceManager<B: HidBackend> {
    backend: B,
    target: DeviceMatch,
    slot_count: u8,
    link: LinkState<B::Device>,
    /// Completed connections, for diagnostics
    connects: u32,
}

impl<B: HidBackend> DeviceManager<B> {
    /// Create a disconnected manager
    ///
    /// `slot_count` is announced to the keyboard on every connect.
    pub fn new(backend: B, target: DeviceMatch, slot_count: u8) -> Self {
        Self {
            backend,
            target,
            slot_count,
            link: LinkState::Disconnected,
            connects: 0,
        }
    }

    /// Scan attached devices for the first exact descriptor match
    ///
    /// Enumeration failures count as "nothing found".
    pub fn discover(&mut self) -> Option<DeviceListing> {
        let listings = match self.backend.enumerate() {
            Ok(listings) => listings,
            Err(e) => {
                warn!("HID enumeration failed: {}", e);
                return None;
            }
        };

        let found = listings.into_iter().find(|l| self.target.matches(l));
        if found.is_none() {
            trace!("No device matching {:?}", self.target.product);
        }
        found
    }

    /// Open a listed device and send the init packet
    ///
    /// A failed init write discards the handle straight away.
    pub fn connect(&mut self, listing: DeviceListing) -> Result<(), HidError> {
        let mut device = self.backend.open(&listing)?;

        let init = Packet::init(self.slot_count);
        let written = device.write_report(init.as_bytes())?;
        if written < init.as_bytes().len() {
            return Err(HidError::ShortWrite {
                written,
                expected: init.as_bytes().len(),
            });
        }

        self.connects += 1;
        info!(
            "Connected to {} ({} slots announced)",
            listing.product.as_deref().unwrap_or("?"),
            self.slot_count
        );
        self.link = LinkState::Connected { device, listing };
        Ok(())
    }

    /// Return the live device, discovering and connecting if needed
    pub fn ensure_connected(&mut self) -> Option<&mut B::Device> {
        if matches!(self.link, LinkState::Disconnected) {
            let listing = self.discover()?;
            debug!("Found display device at {}", listing.path);
            if let Err(e) = self.connect(listing) {
                warn!("Failed to connect display device: {}", e);
                return None;
            }
        }
        self.device_mut()
    }

    /// Live device, if connected
    pub fn device_mut(&mut self) -> Option<&mut B::Device> {
        match &mut self.link {
            LinkState::Connected { device, .. } => Some(device),
            LinkState::Disconnected => None,
        }
    }

    /// Drop the handle after an I/O error or explicit reset
    pub fn discard(&mut self, reason: &HidError) {
        if let LinkState::Connected { listing, .. } = &self.link {
            warn!("Discarding display device {}: {}", listing.path, reason);
        }
        self.link = LinkState::Disconnected;
    }

    /// True while a device is open
    pub fn is_connected(&self) -> bool {
        matches!(self.link, LinkState::Connected { .. })
    }

    /// Current link state
    pub fn link(&self) -> &LinkState<B::Device> {
        &self.link
    }

    /// Number of successful connections so far
    pub fn connect_count(&self) -> u32 {
        self.connects
    }

    /// Slot count announced to the keyboard
    pub fn slot_count(&self) -> u8 {
        self.slot_count
    }
}
