//! Packet chunking for host → keyboard reports
//!
//! Packet format:
//! - REPORT ID (1 byte): always 0x00, consumed by the HID stack
//! - TYPE (1 byte): see [`PacketType`]
//! - PAYLOAD (0-30 bytes): init data or a slice of a frame
//!
//! A frame of `L` bytes becomes `ceil(L / 30)` packets. The first carries
//! [`PacketType::FrameStart`] so the keyboard can resynchronise on it, the
//! rest carry [`PacketType::FrameContinue`].

use heapless::Vec;

/// Report ID prefix expected by the HID write call
pub const REPORT_ID: u8 = 0x00;

/// Raw HID report size on the keyboard side
pub const PACKET_SIZE: usize = 32;

/// Header bytes in front of every payload (report id + type)
pub const HEADER_SIZE: usize = 2;

/// Maximum frame bytes carried by one packet
pub const MAX_CHUNK_PAYLOAD: usize = PACKET_SIZE - HEADER_SIZE;

/// Packet type identifier (second byte of every host report)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PacketType {
    /// Announces the protocol and the number of screen slots
    Init = 0x01,
    /// First chunk of a frame
    FrameStart = 0x02,
    /// Any later chunk of the same frame
    FrameContinue = 0x03,
}

impl PacketType {
    /// Parse a packet type from its wire byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x01 => Some(PacketType::Init),
            0x02 => Some(PacketType::FrameStart),
            0x03 => Some(PacketType::FrameContinue),
            _ => None,
        }
    }
}

/// One outgoing HID report, header included
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    bytes: Vec<u8, PACKET_SIZE>,
}

impl Packet {
    /// Build a packet from a type and a payload of at most 30 bytes
    ///
    /// Returns `None` if the payload does not fit.
    pub fn new(packet_type: PacketType, payload: &[u8]) -> Option<Self> {
        let mut packet = Self::header(packet_type);
        packet.bytes.extend_from_slice(payload).ok()?;
        Some(packet)
    }

    /// Init packet sent once per connection: `[0x00, 0x01, slot_count]`
    pub fn init(slot_count: u8) -> Self {
        Self::with_bytes([REPORT_ID, PacketType::Init as u8, slot_count])
    }

    /// Packet holding only the report id and type bytes
    fn header(packet_type: PacketType) -> Self {
        Self::with_bytes([REPORT_ID, packet_type as u8])
    }

    /// Capacity is checked at compile time
    fn with_bytes<const M: usize>(bytes: [u8; M]) -> Self {
        Self {
            bytes: Vec::from_array(bytes),
        }
    }

    /// Bytes to hand to the HID write call
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Packet type byte
    pub fn packet_type(&self) -> Option<PacketType> {
        self.bytes.get(1).copied().and_then(PacketType::from_byte)
    }

    /// Payload without the two header bytes
    pub fn payload(&self) -> &[u8] {
        &self.bytes[HEADER_SIZE..]
    }
}

/// Split a frame into packets
pub fn chunk_frame(frame: &[u8]) -> Packets<'_> {
    Packets {
        chunks: frame.chunks(MAX_CHUNK_PAYLOAD),
        first: true,
    }
}

/// Iterator over the packets of one frame
#[derive(Debug, Clone)]
pub struct Packets<'a> {
    chunks: core::slice::Chunks<'a, u8>,
    first: bool,
}

impl Iterator for Packets<'_> {
    type Item = Packet;

    fn next(&mut self) -> Option<Self::Item> {
        let chunk = self.chunks.next()?;
        let packet_type = if self.first {
            PacketType::FrameStart
        } else {
            PacketType::FrameContinue
        };
        self.first = false;
        Packet::new(packet_type, chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for Packets<'_> {}
