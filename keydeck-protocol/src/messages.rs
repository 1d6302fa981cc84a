//! Keyboard → host reports
//!
//! The only report the host acts on is the selection report, sent by the
//! keyboard whenever the user switches screens or the keyboard needs a
//! fresh frame: `[0x01, screen, width, height, ...]`.

/// Message type ID: keyboard selects a screen
pub const MSG_SELECT: u8 = 0x01;

/// Bytes of a selection report that carry meaning
pub const SELECTION_REPORT_LEN: usize = 4;

/// Errors when parsing an inbound report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportError {
    /// Fewer than four bytes received
    TooShort,
    /// First byte is not a known message type
    UnknownType(u8),
}

/// Screen selection sent by the keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionReport {
    /// Requested screen slot index (0 = none)
    pub screen: u8,
    /// Display width in characters
    pub width: u8,
    /// Display height in lines
    pub height: u8,
}

impl SelectionReport {
    /// Parse a selection report
    ///
    /// Only the first four bytes are consulted. Range checking of `screen`
    /// is left to the caller, which knows how many slots exist.
    pub fn from_report(report: &[u8]) -> Result<Self, ReportError> {
        if report.len() < SELECTION_REPORT_LEN {
            return Err(ReportError::TooShort);
        }
        if report[0] != MSG_SELECT {
            return Err(ReportError::UnknownType(report[0]));
        }

        Ok(Self {
            screen: report[1],
            width: report[2],
            height: report[3],
        })
    }

    /// Encode as a report (for testing or simulation)
    pub fn to_report(&self) -> [u8; SELECTION_REPORT_LEN] {
        [MSG_SELECT, self.screen, self.width, self.height]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_selection() {
        let report = SelectionReport::from_report(&[0x01, 2, 21, 4]).unwrap();
        assert_eq!(
            report,
            SelectionReport {
                screen: 2,
                width: 21,
                height: 4
            }
        );
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let mut raw = [0u8; 32];
        raw[..4].copy_from_slice(&[0x01, 1, 10, 2]);
        raw[4] = 0xFF;

        let report = SelectionReport::from_report(&raw).unwrap();
        assert_eq!(report.to_report(), [0x01, 1, 10, 2]);
    }

    #[test]
    fn test_short_report() {
        assert_eq!(
            SelectionReport::from_report(&[0x01, 1, 10]),
            Err(ReportError::TooShort)
        );
        assert_eq!(SelectionReport::from_report(&[]), Err(ReportError::TooShort));
    }

    #[test]
    fn test_wrong_marker() {
        assert_eq!(
            SelectionReport::from_report(&[0x02, 1, 10, 2]),
            Err(ReportError::UnknownType(0x02))
        );
    }
}
