//! Overlay engine: on hover, derives the hovered element's box-model
//! rectangles and positions a floating info tooltip, throttled to one
//! reposition per animation frame.

pub mod box_model;
pub mod throttle;
pub mod tooltip;

pub use box_model::BoxModelGeometry;
pub use throttle::{FrameThrottle, FRAME_INTERVAL};
pub use tooltip::{position_tooltip, TooltipContent, CLASS_DISPLAY_CAP, TOOLTIP_MARGIN};

use anyhow::Error;
use dom::{Document, NodeKey};
use log::trace;

/// Stable id of the scaffold container, so a disable/enable cycle can
/// adopt a leftover scaffold instead of duplicating it.
pub const SCAFFOLD_ID: &str = "inspector-overlay";

const ROLE_ATTR: &str = "data-inspector-role";

/// The overlay's own markup: one container, the info tooltip, and the
/// four box-model highlight rectangles. All marker-attributed so both
/// engines skip them in O(1).
#[derive(Debug, Clone, Copy)]
pub struct Scaffold {
    pub container: NodeKey,
    pub tooltip: NodeKey,
    pub margin_box: NodeKey,
    pub border_box: NodeKey,
    pub padding_box: NodeKey,
    pub content_box: NodeKey,
}

pub struct OverlayEngine {
    enabled: bool,
    scaffold: Option<Scaffold>,
    viewport: (f32, f32),
    throttle: FrameThrottle,
    /// Cursor position waiting for the next throttle window. Bursts of
    /// moves overwrite it, collapsing to a single trailing update.
    pending_cursor: Option<(f32, f32)>,
    hovered: Option<NodeKey>,
    visible: bool,
    geometry: Option<BoxModelGeometry>,
    content: Option<TooltipContent>,
    anchor: Option<(f32, f32)>,
}

impl OverlayEngine {
    pub fn new(viewport: (f32, f32)) -> Self {
        Self {
            enabled: false,
            scaffold: None,
            viewport,
            throttle: FrameThrottle::default(),
            pending_cursor: None,
            hovered: None,
            visible: false,
            geometry: None,
            content: None,
            anchor: None,
        }
    }

    pub fn with_throttle(viewport: (f32, f32), throttle: FrameThrottle) -> Self {
        Self {
            throttle,
            ..Self::new(viewport)
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn scaffold(&self) -> Option<&Scaffold> {
        self.scaffold.as_ref()
    }

    pub fn hovered(&self) -> Option<NodeKey> {
        self.hovered
    }

    pub fn geometry(&self) -> Option<&BoxModelGeometry> {
        self.geometry.as_ref()
    }

    pub fn content(&self) -> Option<&TooltipContent> {
        self.content.as_ref()
    }

    pub fn anchor(&self) -> Option<(f32, f32)> {
        self.anchor
    }

    pub fn deferred_moves(&self) -> u64 {
        self.throttle.deferred()
    }

    pub fn set_viewport(&mut self, viewport: (f32, f32)) {
        self.viewport = viewport;
    }

    /// Create the scaffold (or adopt a leftover one by its stable id)
    /// and start listening. Enabling twice is a no-op.
    pub fn enable(&mut self, doc: &mut Document) -> Result<(), Error> {
        if self.enabled {
            return Ok(());
        }
        let scaffold = build_scaffold(doc)?;
        doc.flush();
        self.scaffold = Some(scaffold);
        self.enabled = true;
        Ok(())
    }

    /// Tear the scaffold out of the document and drop every reference.
    /// A throttle tick that was already pending fires harmlessly; the
    /// scaffold guard in [`tick`](Self::tick) catches it.
    pub fn disable(&mut self, doc: &mut Document) -> Result<(), Error> {
        if let Some(scaffold) = self.scaffold.take()
            && doc.contains(scaffold.container)
        {
            doc.remove(scaffold.container)?;
            doc.flush();
        }
        self.enabled = false;
        self.visible = false;
        self.hovered = None;
        self.geometry = None;
        self.content = None;
        self.anchor = None;
        Ok(())
    }

    /// Hover moved onto an element. Scaffold-own elements are ignored;
    /// so are elements the host has produced no metrics for.
    pub fn pointer_enter(&mut self, doc: &Document, node: NodeKey, cursor: (f32, f32)) {
        if !self.enabled || self.scaffold.is_none() {
            return;
        }
        if doc.is_own_ui(node) {
            return;
        }
        let Some(metrics) = doc.metrics(node) else {
            trace!("no metrics for {node}, overlay stays hidden");
            return;
        };
        let content = TooltipContent::new(
            doc.tag(node).unwrap_or_default(),
            doc.attr(node, "id"),
            doc.attr(node, "class"),
            metrics,
        );
        self.geometry = Some(BoxModelGeometry::from_metrics(metrics));
        self.anchor = Some(tooltip::position_tooltip(
            cursor,
            content.estimated_size(),
            self.viewport,
        ));
        self.content = Some(content);
        self.hovered = Some(node);
        self.visible = true;
    }

    /// Throttled reposition: at most one per interval, the rest collapse
    /// into a pending trailing update.
    pub fn pointer_move(&mut self, cursor: (f32, f32)) {
        if !self.enabled || !self.visible {
            return;
        }
        if self.throttle.allow() {
            // A cursor deferred in the previous window is stale now.
            self.pending_cursor = None;
            self.reposition(cursor);
        } else {
            self.pending_cursor = Some(cursor);
            self.throttle.incr_deferred();
        }
    }

    /// Flush a pending trailing update if the window has reopened.
    /// Tolerates racing a disable: with the scaffold gone the pending
    /// cursor is simply dropped.
    pub fn tick(&mut self) {
        if self.scaffold.is_none() {
            self.pending_cursor = None;
            return;
        }
        if self.pending_cursor.is_some()
            && self.throttle.allow()
            && let Some(cursor) = self.pending_cursor.take()
        {
            self.reposition(cursor);
        }
    }

    /// Hide tooltip and rectangles; the scaffold stays for reuse.
    pub fn pointer_leave(&mut self) {
        self.visible = false;
        self.hovered = None;
        self.geometry = None;
        self.content = None;
        self.anchor = None;
    }

    fn reposition(&mut self, cursor: (f32, f32)) {
        let Some(content) = &self.content else {
            return;
        };
        self.anchor = Some(tooltip::position_tooltip(
            cursor,
            content.estimated_size(),
            self.viewport,
        ));
    }
}

fn ensure_role_child(
    doc: &mut Document,
    container: NodeKey,
    role: &str,
) -> Result<NodeKey, Error> {
    if let Some(existing) = doc
        .children(container)
        .into_iter()
        .find(|&child| doc.attr(child, ROLE_ATTR) == Some(role))
    {
        return Ok(existing);
    }
    let node = doc.create_element(container, "div")?;
    doc.mark_ui(node)?;
    doc.set_attr(node, ROLE_ATTR, role)?;
    Ok(node)
}

fn build_scaffold(doc: &mut Document) -> Result<Scaffold, Error> {
    let container = match doc.element_by_id(SCAFFOLD_ID) {
        Some(existing) => existing,
        None => {
            let node = doc.create_element(doc.root(), "div")?;
            doc.mark_ui(node)?;
            doc.set_attr(node, "id", SCAFFOLD_ID)?;
            node
        }
    };
    Ok(Scaffold {
        container,
        tooltip: ensure_role_child(doc, container, "tooltip")?,
        margin_box: ensure_role_child(doc, container, "margin-box")?,
        border_box: ensure_role_child(doc, container, "border-box")?,
        padding_box: ensure_role_child(doc, container, "padding-box")?,
        content_box: ensure_role_child(doc, container, "content-box")?,
    })
}
