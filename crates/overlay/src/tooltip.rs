use dom::{Edges, ElementMetrics};

/// Gap between the cursor and the tooltip's default anchor, px.
pub const TOOLTIP_MARGIN: f32 = 10.0;

/// Class lists longer than this are cut with an ellipsis.
pub const CLASS_DISPLAY_CAP: usize = 48;

/// At most this many families of the font stack are surfaced.
pub const FONT_STACK_CAP: usize = 3;

const LINE_HEIGHT: f32 = 18.0;
const BODY_PADDING: f32 = 12.0;
const TOOLTIP_WIDTH: f32 = 260.0;

/// What the info tooltip displays for the hovered element.
#[derive(Debug, Clone, PartialEq)]
pub struct TooltipContent {
    pub tag: String,
    pub id: Option<String>,
    /// Space-joined class list, truncated to [`CLASS_DISPLAY_CAP`].
    pub classes: Option<String>,
    pub dimensions: String,
    pub display: String,
    pub margin: Option<String>,
    pub border: Option<String>,
    pub padding: Option<String>,
    /// Absent when the background is fully transparent.
    pub background: Option<String>,
    pub fonts: Vec<String>,
}

impl TooltipContent {
    pub fn new(
        tag: &str,
        id: Option<&str>,
        class_attr: Option<&str>,
        metrics: &ElementMetrics,
    ) -> Self {
        let classes = class_attr
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| truncate(&raw.split_whitespace().collect::<Vec<_>>().join(" ")));
        let background = (!metrics.background.is_transparent()).then(|| metrics.background.to_css());
        Self {
            tag: tag.to_owned(),
            id: id.map(str::to_owned),
            classes,
            dimensions: format!(
                "{} × {}",
                trim_px(metrics.border_box.width),
                trim_px(metrics.border_box.height)
            ),
            display: metrics.display.clone(),
            margin: edges_summary(&metrics.margin),
            border: edges_summary(&metrics.border),
            padding: edges_summary(&metrics.padding),
            background,
            fonts: metrics
                .font_family
                .iter()
                .take(FONT_STACK_CAP)
                .cloned()
                .collect(),
        }
    }

    /// Header line, `tag#id.class…` style.
    pub fn title(&self) -> String {
        let mut title = self.tag.clone();
        if let Some(id) = &self.id {
            title.push('#');
            title.push_str(id);
        }
        if let Some(classes) = &self.classes {
            for class in classes.split_whitespace() {
                title.push('.');
                title.push_str(class);
            }
        }
        title
    }

    /// The tooltip body, one entry per line.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            self.title(),
            format!("size: {}", self.dimensions),
            format!("display: {}", self.display),
        ];
        if let Some(margin) = &self.margin {
            lines.push(format!("margin: {margin}"));
        }
        if let Some(border) = &self.border {
            lines.push(format!("border: {border}"));
        }
        if let Some(padding) = &self.padding {
            lines.push(format!("padding: {padding}"));
        }
        if let Some(background) = &self.background {
            lines.push(format!("background: {background}"));
        }
        if !self.fonts.is_empty() {
            lines.push(format!("font: {}", self.fonts.join(", ")));
        }
        lines
    }

    /// Rendered size estimate used for viewport-edge positioning.
    pub fn estimated_size(&self) -> (f32, f32) {
        (
            TOOLTIP_WIDTH,
            BODY_PADDING + self.lines().len() as f32 * LINE_HEIGHT,
        )
    }
}

fn truncate(list: &str) -> String {
    if list.chars().count() <= CLASS_DISPLAY_CAP {
        return list.to_owned();
    }
    let cut: String = list.chars().take(CLASS_DISPLAY_CAP).collect();
    format!("{cut}…")
}

fn trim_px(value: f32) -> String {
    if (value - value.round()).abs() < 0.05 {
        format!("{}px", value.round() as i64)
    } else {
        format!("{value:.1}px")
    }
}

/// CSS-shorthand style per-side summary, `None` when all sides are 0.
fn edges_summary(edges: &Edges) -> Option<String> {
    if edges.is_zero() {
        return None;
    }
    if edges.top == edges.bottom && edges.left == edges.right && edges.top == edges.left {
        return Some(trim_px(edges.top));
    }
    Some(format!(
        "{} {} {} {}",
        trim_px(edges.top),
        trim_px(edges.right),
        trim_px(edges.bottom),
        trim_px(edges.left)
    ))
}

/// Anchor the tooltip near the cursor, flipping per axis when the
/// default anchor would run past the viewport's right or bottom edge.
/// There is deliberately no secondary clamp: near a corner the flipped
/// tooltip may overflow the opposite edge.
pub fn position_tooltip(
    cursor: (f32, f32),
    tooltip_size: (f32, f32),
    viewport: (f32, f32),
) -> (f32, f32) {
    let (cursor_x, cursor_y) = cursor;
    let (width, height) = tooltip_size;
    let (viewport_w, viewport_h) = viewport;

    let mut anchor_x = cursor_x + TOOLTIP_MARGIN;
    if anchor_x + width > viewport_w {
        anchor_x = cursor_x - width - TOOLTIP_MARGIN;
    }

    let mut anchor_y = cursor_y + TOOLTIP_MARGIN;
    if anchor_y + height > viewport_h {
        anchor_y = cursor_y - height - TOOLTIP_MARGIN;
    }

    (anchor_x, anchor_y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::{Rect, Rgba};

    #[test]
    fn flips_horizontally_at_the_right_edge() {
        let anchor = position_tooltip((995.0, 300.0), (200.0, 100.0), (1000.0, 800.0));
        assert_eq!(anchor.0, 995.0 - 200.0 - 10.0);
        assert_eq!(anchor.1, 310.0);
    }

    #[test]
    fn no_flip_when_the_tooltip_fits() {
        let anchor = position_tooltip((100.0, 300.0), (200.0, 100.0), (1000.0, 800.0));
        assert_eq!(anchor, (110.0, 310.0));
    }

    #[test]
    fn flips_vertically_independently() {
        let anchor = position_tooltip((100.0, 790.0), (200.0, 100.0), (1000.0, 800.0));
        assert_eq!(anchor, (110.0, 790.0 - 100.0 - 10.0));
    }

    #[test]
    fn corner_flip_can_overflow_the_opposite_edge() {
        // Documented edge case: flipped, never clamped.
        let anchor = position_tooltip((5.0, 5.0), (200.0, 100.0), (190.0, 90.0));
        assert!(anchor.0 < 0.0);
        assert!(anchor.1 < 0.0);
    }

    #[test]
    fn class_list_is_truncated_for_display() {
        let metrics = ElementMetrics::default();
        let long = "alpha ".repeat(20);
        let content = TooltipContent::new("div", None, Some(&long), &metrics);
        let classes = content.classes.unwrap();
        assert!(classes.chars().count() <= CLASS_DISPLAY_CAP + 1);
        assert!(classes.ends_with('…'));
    }

    #[test]
    fn transparent_background_is_omitted() {
        let metrics = ElementMetrics::default();
        let content = TooltipContent::new("p", None, None, &metrics);
        assert!(content.background.is_none());

        let content = TooltipContent::new(
            "p",
            None,
            None,
            &ElementMetrics {
                background: Rgba::opaque(255, 255, 255),
                ..ElementMetrics::default()
            },
        );
        assert_eq!(content.background.as_deref(), Some("#ffffff"));
    }

    #[test]
    fn font_stack_is_capped() {
        let metrics = ElementMetrics {
            font_family: ["Inter", "Helvetica", "Arial", "sans-serif"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
            ..ElementMetrics::default()
        };
        let content = TooltipContent::new("p", None, None, &metrics);
        assert_eq!(content.fonts.len(), FONT_STACK_CAP);
    }

    #[test]
    fn title_combines_tag_id_and_classes() {
        let metrics = ElementMetrics {
            border_box: Rect::new(0.0, 0.0, 120.0, 40.5),
            ..ElementMetrics::default()
        };
        let content = TooltipContent::new("div", Some("hero"), Some("wide tall"), &metrics);
        assert_eq!(content.title(), "div#hero.wide.tall");
        assert_eq!(content.dimensions, "120px × 40.5px");
    }
}
