use dom::{ElementMetrics, Rect};

/// The four nested box-model rectangles for one hovered element, in
/// viewport pixels. Nested by construction: the margin box grows
/// outward from the border box, padding and content shrink inward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxModelGeometry {
    pub margin: Rect,
    pub border: Rect,
    pub padding: Rect,
    pub content: Rect,
}

impl BoxModelGeometry {
    pub fn from_metrics(metrics: &ElementMetrics) -> Self {
        let border = metrics.border_box;
        let margin = border.expand(&metrics.margin);
        let padding = border.shrink(&metrics.border);
        let content = padding.shrink(&metrics.padding);
        Self {
            margin,
            border,
            padding,
            content,
        }
    }

    /// content ⊆ padding ⊆ border ⊆ margin on all four edges.
    pub fn is_nested(&self) -> bool {
        self.margin.contains_rect(&self.border)
            && self.border.contains_rect(&self.padding)
            && self.padding.contains_rect(&self.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dom::Edges;

    fn metrics(margin: Edges, border: Edges, padding: Edges) -> ElementMetrics {
        ElementMetrics {
            border_box: Rect::new(100.0, 200.0, 300.0, 150.0),
            margin,
            border,
            padding,
            ..ElementMetrics::default()
        }
    }

    #[test]
    fn rectangles_nest_for_mixed_edges() {
        let geometry = BoxModelGeometry::from_metrics(&metrics(
            Edges {
                top: 8.0,
                right: 16.0,
                bottom: 8.0,
                left: 16.0,
            },
            Edges::uniform(2.0),
            Edges {
                top: 4.0,
                right: 12.0,
                bottom: 4.0,
                left: 12.0,
            },
        ));
        assert!(geometry.is_nested());
        assert_eq!(geometry.margin, Rect::new(84.0, 192.0, 332.0, 166.0));
        assert_eq!(geometry.padding, Rect::new(102.0, 202.0, 296.0, 146.0));
        assert_eq!(geometry.content, Rect::new(114.0, 206.0, 272.0, 138.0));
    }

    #[test]
    fn zero_edges_collapse_all_boxes_onto_the_border_box() {
        let geometry = BoxModelGeometry::from_metrics(&metrics(
            Edges::default(),
            Edges::default(),
            Edges::default(),
        ));
        assert!(geometry.is_nested());
        assert_eq!(geometry.margin, geometry.content);
    }

    #[test]
    fn oversized_edges_still_nest_thanks_to_clamping() {
        let geometry = BoxModelGeometry::from_metrics(&ElementMetrics {
            border_box: Rect::new(0.0, 0.0, 10.0, 10.0),
            border: Edges::uniform(4.0),
            padding: Edges::uniform(50.0),
            ..ElementMetrics::default()
        });
        assert!(geometry.is_nested());
        assert_eq!(geometry.content.width, 0.0);
    }
}
