//! Keyboard display raw HID protocol
//!
//! This crate defines the report-level protocol between the host daemon and
//! a keyboard with a character display (QMK raw HID, 32-byte reports).
//!
//! # Protocol Overview
//!
//! Host → keyboard reports:
//! ```text
//! ┌───────────┬──────┬──────────────────────────┐
//! │ REPORT ID │ TYPE │ PAYLOAD                  │
//! │ 1B (0x00) │ 1B   │ 0–30B                    │
//! └───────────┴──────┴──────────────────────────┘
//! ```
//! - TYPE 0x01: init, payload is a single byte with the slot count
//! - TYPE 0x02: first packet of a frame
//! - TYPE 0x03: continuation packet of the same frame
//!
//! Keyboard → host reports:
//! ```text
//! [0x01, screen, width, height, ...]
//! ```
//!
//! The keyboard owns the choice of screen and its dimensions; the host
//! renders the text, chunks it into packets and paces the writes.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod frame;
pub mod messages;
pub mod packet;

pub use frame::{encode, Frame, PAD_BYTE};
pub use messages::{ReportError, SelectionReport, MSG_SELECT};
pub use packet::{
    chunk_frame, Packet, PacketType, Packets, MAX_CHUNK_PAYLOAD, PACKET_SIZE, REPORT_ID,
};
