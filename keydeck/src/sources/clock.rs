//! Clock screen

use chrono::{DateTime, Local, TimeZone};

use keydeck_core::render::{center_line, fit_line};
use keydeck_core::Renderer;

/// Local time, one line for the time and an optional date line
///
/// Format strings are checked when the config is loaded; chrono panics on
/// invalid specifiers.
pub struct ClockSource {
    format: String,
    date_format: String,
}

impl ClockSource {
    pub fn new(format: String, date_format: String) -> Self {
        Self {
            format,
            date_format,
        }
    }

    pub fn refresh(&self) -> Renderer {
        self.render_at(&Local::now())
    }

    fn render_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Renderer
    where
        Tz::Offset: core::fmt::Display,
    {
        let mut lines = vec![now.format(&self.format).to_string()];
        if !self.date_format.is_empty() {
            lines.push(now.format(&self.date_format).to_string());
        }
        Box::new(move |width, height| centered(&lines, width, height))
    }
}

/// Centre lines horizontally and the block vertically
fn centered(lines: &[String], width: u8, height: u8) -> String {
    let height = height as usize;
    let shown = lines.len().min(height);
    let top = (height - shown) / 2;

    let mut out = String::with_capacity(width as usize * height);
    for row in 0..height {
        match row.checked_sub(top).and_then(|i| lines.get(i)) {
            Some(line) if row < top + shown => out.push_str(&center_line(line, width)),
            _ => out.push_str(&fit_line("", width)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn at_noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 34, 56).unwrap()
    }

    #[test]
    fn test_time_and_date() {
        let clock = ClockSource::new("%H:%M:%S".to_string(), "%d/%m".to_string());
        let render = clock.render_at(&at_noon());
        assert_eq!(render(10, 2), " 12:34:56   15/03   ");
    }

    #[test]
    fn test_vertically_centred() {
        let clock = ClockSource::new("%H:%M".to_string(), String::new());
        let render = clock.render_at(&at_noon());
        assert_eq!(render(5, 3), "     12:34     ");
    }

    #[test]
    fn test_more_lines_than_rows() {
        let clock = ClockSource::new("%H".to_string(), "%Y".to_string());
        let render = clock.render_at(&at_noon());
        assert_eq!(render(4, 1), " 12 ");
        assert_eq!(render(4, 0), "");
    }
}
