/// Axis-aligned rectangle in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Grow the rectangle outward by the given per-side edges.
    /// Negative edges (collapsed or negative margins) are treated as
    /// zero so the result always contains `self`.
    pub fn expand(&self, edges: &Edges) -> Self {
        let top = edges.top.max(0.0);
        let right = edges.right.max(0.0);
        let bottom = edges.bottom.max(0.0);
        let left = edges.left.max(0.0);
        Self {
            left: self.left - left,
            top: self.top - top,
            width: self.width + left + right,
            height: self.height + top + bottom,
        }
    }

    /// Shrink the rectangle inward by the given per-side edges. Insets
    /// are clamped so the result stays inside `self` even when the
    /// edges exceed the rectangle's own size.
    pub fn shrink(&self, edges: &Edges) -> Self {
        let left_inset = edges.left.clamp(0.0, self.width);
        let top_inset = edges.top.clamp(0.0, self.height);
        Self {
            left: self.left + left_inset,
            top: self.top + top_inset,
            width: (self.width - edges.left.max(0.0) - edges.right.max(0.0)).max(0.0),
            height: (self.height - edges.top.max(0.0) - edges.bottom.max(0.0)).max(0.0),
        }
    }

    /// True if `inner` lies within `self` on all four edges.
    pub fn contains_rect(&self, inner: &Self) -> bool {
        inner.left >= self.left
            && inner.top >= self.top
            && inner.right() <= self.right()
            && inner.bottom() <= self.bottom()
    }
}

/// Per-side pixel widths (margin, border or padding).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edges {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Edges {
    pub const fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0 && self.left == 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Rgba {
    pub const TRANSPARENT: Self = Self {
        red: 0,
        green: 0,
        blue: 0,
        alpha: 0,
    };

    pub const fn opaque(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha: 255,
        }
    }

    pub fn is_transparent(&self) -> bool {
        self.alpha == 0
    }

    /// CSS hex form, `#rrggbb` for opaque colors, `#rrggbbaa` otherwise.
    pub fn to_css(&self) -> String {
        if self.alpha == 255 {
            format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                self.red, self.green, self.blue, self.alpha
            )
        }
    }
}

/// Resolved geometry and the slice of computed style the inspector
/// surfaces. Produced by the host layout pass, stored per element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementMetrics {
    /// Border box in viewport coordinates, as reported by layout.
    pub border_box: Rect,
    pub margin: Edges,
    pub border: Edges,
    pub padding: Edges,
    pub display: String,
    pub background: Rgba,
    pub font_family: Vec<String>,
}

impl Default for ElementMetrics {
    fn default() -> Self {
        Self {
            border_box: Rect::default(),
            margin: Edges::default(),
            border: Edges::default(),
            padding: Edges::default(),
            display: String::from("block"),
            background: Rgba::TRANSPARENT,
            font_family: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_then_shrink_round_trips() {
        let rect = Rect::new(10.0, 20.0, 100.0, 50.0);
        let edges = Edges {
            top: 1.0,
            right: 2.0,
            bottom: 3.0,
            left: 4.0,
        };
        assert_eq!(rect.expand(&edges).shrink(&edges), rect);
    }

    #[test]
    fn shrink_clamps_at_zero() {
        let rect = Rect::new(0.0, 0.0, 10.0, 10.0);
        let shrunk = rect.shrink(&Edges::uniform(8.0));
        assert_eq!(shrunk.width, 0.0);
        assert_eq!(shrunk.height, 0.0);
    }

    #[test]
    fn css_hex_forms() {
        assert_eq!(Rgba::opaque(59, 130, 246).to_css(), "#3b82f6");
        assert_eq!(
            Rgba {
                red: 0,
                green: 0,
                blue: 0,
                alpha: 128
            }
            .to_css(),
            "#00000080"
        );
    }
}
