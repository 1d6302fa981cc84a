//! Chunked, paced, single-flight transport
//!
//! A frame is split into packets up front and kept as an explicit
//! [`SendJob`]. The event loop drives the job with [`ChunkedTransport::step`],
//! one packet per call, never earlier than [`ChunkedTransport::next_deadline`].
//! Between two steps the loop is free to handle ticks and input reports.

use std::collections::VecDeque;

use log::{debug, trace};
use thiserror::Error;

use keydeck_hal::{HidDevice, HidError};
use keydeck_protocol::{chunk_frame, Frame, Packet};

/// Result of offering a frame to the transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// Same as the last successfully sent frame, nothing to do
    Unchanged,
    /// Another frame is in flight; this one is dropped
    Busy,
    /// A new send job was started
    Started,
}

/// Result of one transport step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// No job in flight
    Idle,
    /// Job in flight, next packet not due yet
    Waiting,
    /// One packet written, more remain
    Sent,
    /// Last packet written, frame recorded as sent
    Completed,
}

/// Transport failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// A packet write failed; the rest of the frame was dropped
    #[error("packet {index} of {total} failed: {source}")]
    Write {
        index: usize,
        total: usize,
        #[source]
        source: HidError,
    },
}

impl TransportError {
    /// Underlying HID error
    pub fn hid_error(&self) -> &HidError {
        match self {
            TransportError::Write { source, .. } => source,
        }
    }
}

/// Packets of one frame still waiting to be written
#[derive(Debug, Clone)]
pub struct SendJob {
    frame: Frame,
    packets: VecDeque<Packet>,
    total: usize,
}

impl SendJob {
    fn new(frame: Frame) -> Self {
        let packets: VecDeque<Packet> = chunk_frame(frame.as_bytes()).collect();
        let total = packets.len();
        Self {
            frame,
            packets,
            total,
        }
    }

    /// Packets not written yet
    pub fn remaining(&self) -> usize {
        self.packets.len()
    }

    /// Packets in the whole frame
    pub fn total(&self) -> usize {
        self.total
    }
}

/// Chunked transport state
///
/// Owns the in-flight job and the last frame that made it to the device.
#[derive(Debug)]
pub struct ChunkedTransport {
    packet_delay_ms: u64,
    job: Option<SendJob>,
    last_sent: Option<Frame>,
    /// Earliest time the next packet may be written
    next_write_ms: u64,
}

impl ChunkedTransport {
    /// Create an idle transport
    ///
    /// A zero delay is raised to 1 ms so packets are always paced.
    pub fn new(packet_delay_ms: u64) -> Self {
        Self {
            packet_delay_ms: packet_delay_ms.max(1),
            job: None,
            last_sent: None,
            next_write_ms: 0,
        }
    }

    /// Offer a frame for sending
    pub fn push(&mut self, frame: Frame) -> PushOutcome {
        if self.last_sent.as_ref() == Some(&frame) {
            return PushOutcome::Unchanged;
        }
        if self.job.is_some() {
            trace!("Send in flight, dropping frame");
            return PushOutcome::Busy;
        }

        let job = SendJob::new(frame);
        debug!("Sending frame: {} bytes in {} packets", job.frame.len(), job.total);
        self.job = Some(job);
        PushOutcome::Started
    }

    /// Write the next packet if it is due
    ///
    /// A write error drops the rest of the job and leaves the last sent
    /// frame untouched, so the next push of the same frame is not
    /// suppressed.
    pub fn step<D: HidDevice>(
        &mut self,
        device: &mut D,
        now_ms: u64,
    ) -> Result<StepOutcome, TransportError> {
        let Some(job) = self.job.as_mut() else {
            return Ok(StepOutcome::Idle);
        };

        if let Some(packet) = job.packets.front() {
            if now_ms < self.next_write_ms {
                return Ok(StepOutcome::Waiting);
            }

            let index = job.total - job.packets.len() + 1;
            let expected = packet.as_bytes().len();
            let result = match device.write_report(packet.as_bytes()) {
                Ok(written) if written >= expected => Ok(()),
                Ok(written) => Err(HidError::ShortWrite { written, expected }),
                Err(e) => Err(e),
            };

            if let Err(source) = result {
                let total = job.total;
                self.job = None;
                return Err(TransportError::Write {
                    index,
                    total,
                    source,
                });
            }

            trace!("Packet {}/{} written", index, job.total);
            job.packets.pop_front();
            self.next_write_ms = now_ms + self.packet_delay_ms;
        }

        if !job.packets.is_empty() {
            return Ok(StepOutcome::Sent);
        }

        if let Some(done) = self.job.take() {
            self.last_sent = Some(done.frame);
        }
        Ok(StepOutcome::Completed)
    }

    /// Drop the in-flight job without recording it as sent
    pub fn abort(&mut self) {
        if let Some(job) = self.job.take() {
            debug!(
                "Aborted frame with {} of {} packets unsent",
                job.remaining(),
                job.total()
            );
        }
    }

    /// Forget the last sent frame so the next push goes out unconditionally
    ///
    /// Used after reconnecting, when the keyboard's screen content is
    /// unknown.
    pub fn invalidate(&mut self) {
        self.last_sent = None;
    }

    /// Deadline of the next packet write, if a job is in flight
    pub fn next_deadline(&self) -> Option<u64> {
        self.job.as_ref().map(|_| self.next_write_ms)
    }

    /// True while a job is in flight
    pub fn is_busy(&self) -> bool {
        self.job.is_some()
    }

    /// In-flight job, if any
    pub fn job(&self) -> Option<&SendJob> {
        self.job.as_ref()
    }

    /// Last frame fully written to the device
    pub fn last_sent(&self) -> Option<&Frame> {
        self.last_sent.as_ref()
    }

    /// Delay between packet writes (ms)
    pub fn packet_delay_ms(&self) -> u64 {
        self.packet_delay_ms
    }
}
