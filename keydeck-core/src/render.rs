//! Text layout helpers for renderers
//!
//! Renderers own line layout: each line is padded or truncated to the
//! display width and the lines are joined without separators, so the
//! frame encoder only has to enforce the total length.

/// Pad or truncate a line to exactly `width` characters
pub fn fit_line(line: &str, width: u8) -> String {
    let width = width as usize;
    let mut out: String = line.chars().take(width).collect();
    let len = out.chars().count();
    out.extend(core::iter::repeat(' ').take(width - len));
    out
}

/// Centre a line within `width` characters
pub fn center_line(line: &str, width: u8) -> String {
    let len = line.chars().count();
    let width_usize = width as usize;
    if len >= width_usize {
        return fit_line(line, width);
    }
    let left = (width_usize - len) / 2;
    let mut out = " ".repeat(left);
    out.push_str(line);
    fit_line(&out, width)
}

/// Lay out lines for a `width` x `height` display
///
/// Keeps the first `height` lines and fills missing ones with spaces, so
/// the result is always `width * height` characters.
pub fn layout<I, S>(lines: I, width: u8, height: u8) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::with_capacity(width as usize * height as usize);
    let mut count = 0;
    for line in lines.into_iter().take(height as usize) {
        out.push_str(&fit_line(line.as_ref(), width));
        count += 1;
    }
    for _ in count..height as usize {
        out.push_str(&fit_line("", width));
    }
    out
}

/// Labelled bar for a value in `0.0..=1.0`, e.g. `CPU |||||     42%`
///
/// The bar shrinks to fit; on very narrow displays only the label and
/// percentage remain.
pub fn bar_line(label: &str, fraction: f32, width: u8) -> String {
    let fraction = if fraction.is_nan() {
        0.0
    } else {
        fraction.clamp(0.0, 1.0)
    };
    let percent = format!("{:>3}%", (fraction * 100.0).round() as u32);

    let label_len = label.chars().count();
    // label, space, bar, space, percent
    let fixed = label_len + 1 + 1 + percent.len();
    let width_usize = width as usize;

    if width_usize <= fixed {
        return fit_line(&format!("{} {}", label, percent), width);
    }

    let bar_len = width_usize - fixed;
    let filled = ((fraction * bar_len as f32).round() as usize).min(bar_len);
    let mut line = String::with_capacity(width_usize);
    line.push_str(label);
    line.push(' ');
    line.extend(core::iter::repeat('|').take(filled));
    line.extend(core::iter::repeat(' ').take(bar_len - filled));
    line.push(' ');
    line.push_str(&percent);
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fit_line_pads_and_truncates() {
        assert_eq!(fit_line("ab", 4), "ab  ");
        assert_eq!(fit_line("abcdef", 4), "abcd");
        assert_eq!(fit_line("anything", 0), "");
    }

    #[test]
    fn test_center_line() {
        assert_eq!(center_line("ab", 6), "  ab  ");
        assert_eq!(center_line("abc", 6), " abc  ");
        assert_eq!(center_line("toolong", 4), "tool");
    }

    #[test]
    fn test_layout_fills_missing_lines() {
        assert_eq!(layout(["one"], 4, 2), "one     ");
        assert_eq!(layout(["a", "b", "c"], 2, 2), "a b ");
    }

    #[test]
    fn test_bar_line() {
        assert_eq!(bar_line("CPU", 0.5, 18), "CPU |||||      50%");
        assert_eq!(bar_line("CPU", 1.5, 14), "CPU ||||| 100%");
        assert_eq!(bar_line("MEM", 0.0, 8), "MEM   0%");
        assert_eq!(bar_line("MEM", f32::NAN, 8), "MEM   0%");
    }

    proptest! {
        #[test]
        fn prop_layout_is_exact_size(lines in proptest::collection::vec(".{0,40}", 0..8), width in 0u8..=32, height in 0u8..=6) {
            let text = layout(&lines, width, height);
            prop_assert_eq!(text.chars().count(), width as usize * height as usize);
        }

        #[test]
        fn prop_bar_line_fits(fraction in 0.0f32..=1.0, width in 0u8..=40) {
            prop_assert_eq!(bar_line("LOAD", fraction, width).chars().count(), width as usize);
        }
    }
}
