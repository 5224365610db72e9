//! Geometry APIs
//!
//! Offset and scroll properties for elements and the window. Values are
//! layout results supplied by whoever lays the document out; the DOM only
//! stores and clamps them.

/// Element geometry state
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ElementGeometry {
    // Offset properties (relative to offsetParent)
    pub offset_top: f64,
    pub offset_left: f64,
    pub offset_width: f64,
    pub offset_height: f64,
    /// Non-static positioning; makes this element an offset parent
    pub positioned: bool,

    // Client properties (content + padding, no scrollbar)
    pub client_width: f64,
    pub client_height: f64,

    // Scroll properties
    pub scroll_top: f64,
    pub scroll_left: f64,
    pub scroll_width: f64,
    pub scroll_height: f64,
}

impl ElementGeometry {
    /// Geometry at a vertical offset with everything else zeroed
    pub fn at_top(offset_top: f64) -> Self {
        Self {
            offset_top,
            ..Self::default()
        }
    }

    /// Positioned scroll box with the given viewport and content heights
    pub fn scroller(offset_top: f64, client_height: f64, scroll_height: f64) -> Self {
        Self {
            offset_top,
            offset_height: client_height,
            positioned: true,
            client_height,
            scroll_height,
            ..Self::default()
        }
    }

    /// Largest reachable vertical scroll position
    pub fn max_scroll_top(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    /// Largest reachable horizontal scroll position
    pub fn max_scroll_left(&self) -> f64 {
        (self.scroll_width - self.client_width).max(0.0)
    }

    /// Scroll to position
    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.scroll_left = x.clamp(0.0, self.max_scroll_left());
        self.scroll_top = y.clamp(0.0, self.max_scroll_top());
    }
}

/// Window viewport and document scroll position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub inner_width: f64,
    pub inner_height: f64,
    pub scroll_x: f64,
    pub scroll_y: f64,
    /// Total height of the laid-out document
    pub document_height: f64,
}

impl Window {
    pub fn new(inner_width: f64, inner_height: f64) -> Self {
        Self {
            inner_width,
            inner_height,
            scroll_x: 0.0,
            scroll_y: 0.0,
            document_height: inner_height,
        }
    }

    /// Scroll the document, clamped to its extent
    pub fn scroll_to(&mut self, y: f64) {
        let max = (self.document_height - self.inner_height).max(0.0);
        self.scroll_y = y.clamp(0.0, max);
    }
}

impl Default for Window {
    fn default() -> Self {
        Self::new(1024.0, 768.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scroll_clamped() {
        let mut geom = ElementGeometry::scroller(0.0, 200.0, 1000.0);

        geom.scroll_to(0.0, 5000.0);
        assert_eq!(geom.scroll_top, 800.0);

        geom.scroll_to(0.0, -100.0);
        assert_eq!(geom.scroll_top, 0.0);
    }

    #[test]
    fn test_scroll_without_overflow() {
        let mut geom = ElementGeometry::scroller(0.0, 200.0, 100.0);
        geom.scroll_to(0.0, 50.0);
        assert_eq!(geom.scroll_top, 0.0);
    }

    #[test]
    fn test_window_scroll() {
        let mut window = Window::new(800.0, 600.0);
        window.document_height = 2000.0;

        window.scroll_to(1500.0);
        assert_eq!(window.scroll_y, 1400.0);

        window.scroll_to(-100.0);
        assert_eq!(window.scroll_y, 0.0);
    }
}
