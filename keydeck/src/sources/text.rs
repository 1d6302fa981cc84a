//! Fixed text screen

use keydeck_core::render::layout;
use keydeck_core::Renderer;

/// Shows the configured lines unchanged
pub struct TextSource {
    lines: Vec<String>,
}

impl TextSource {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn refresh(&self) -> Renderer {
        let lines = self.lines.clone();
        Box::new(move |width, height| layout(&lines, width, height))
    }
}
