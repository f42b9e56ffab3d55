//! Outline engine: paints a colored outline on every element, grouped
//! by tag, and keeps the outlines current as the page mutates without
//! ever rescanning the whole document after the initial enable pass.

pub mod groups;

pub use groups::{color_for, group_for, DEFAULT_COLOR, GROUPS};

use anyhow::Error;
use dom::{pump_feed, Document, DomFeed, DomSubscriber, DomUpdate, NodeKey, Rgba, UI_MARKER_ATTR};
use log::trace;
use std::collections::HashMap;
use store::BorderSettings;

/// The visual outline applied to one element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub size: f32,
    pub style: store::BorderStyle,
    pub color: Rgba,
}

/// Node metadata mirrored off the mutation feed. Only what outlining
/// needs: the tag for classification, tree links for subtree removal,
/// and the own-UI flag.
#[derive(Debug, Clone, Default)]
struct NodeMeta {
    tag: String,
    own_ui: bool,
    parent: Option<NodeKey>,
    children: Vec<NodeKey>,
}

pub struct OutlineEngine {
    enabled: bool,
    settings: BorderSettings,
    nodes: HashMap<NodeKey, NodeMeta>,
    outlines: HashMap<NodeKey, Outline>,
    feed: Option<DomFeed>,
    /// Number of full-document passes ever taken; exactly one per
    /// enable. Incremental maintenance must never bump this.
    full_passes: u64,
}

impl OutlineEngine {
    pub fn new(settings: BorderSettings) -> Self {
        Self {
            enabled: false,
            settings,
            nodes: HashMap::new(),
            outlines: HashMap::new(),
            feed: None,
            full_passes: 0,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn settings(&self) -> BorderSettings {
        self.settings
    }

    pub fn outline_of(&self, node: NodeKey) -> Option<&Outline> {
        self.outlines.get(&node)
    }

    pub fn outlined_count(&self) -> usize {
        self.outlines.len()
    }

    pub fn full_passes(&self) -> u64 {
        self.full_passes
    }

    fn make_outline(&self, tag: &str) -> Outline {
        Outline {
            size: self.settings.size,
            style: self.settings.style,
            color: color_for(tag),
        }
    }

    /// One O(n) pass over the current document, then incremental
    /// maintenance off the change feed. Enabling twice is a no-op.
    pub fn enable(&mut self, doc: &Document) {
        if self.enabled {
            return;
        }
        self.full_passes += 1;
        self.nodes.clear();
        self.outlines.clear();
        for key in doc.elements() {
            let tag = doc.tag(key).unwrap_or_default().to_owned();
            let own_ui = doc.is_own_ui(key);
            let parent = doc.parent(key);
            let children = doc.children(key);
            if !own_ui {
                let outline = self.make_outline(&tag);
                self.outlines.insert(key, outline);
            }
            self.nodes.insert(
                key,
                NodeMeta {
                    tag,
                    own_ui,
                    parent,
                    children,
                },
            );
        }
        self.feed = Some(doc.subscribe());
        self.enabled = true;
        trace!("outline enabled over {} elements", self.outlines.len());
    }

    /// Stop the feed and clear every applied outline. The node mirror
    /// is dropped too; the next enable rebuilds it from the document.
    pub fn disable(&mut self) {
        self.feed = None;
        self.enabled = false;
        self.outlines.clear();
        self.nodes.clear();
    }

    /// Re-apply size/style/color everywhere if currently enabled.
    pub fn update_settings(&mut self, settings: BorderSettings) {
        self.settings = settings;
        if !self.enabled {
            return;
        }
        let keys: Vec<NodeKey> = self.outlines.keys().copied().collect();
        for key in keys {
            if let Some(meta) = self.nodes.get(&key) {
                let tag = meta.tag.clone();
                let outline = self.make_outline(&tag);
                self.outlines.insert(key, outline);
            }
        }
    }

    /// Drain pending change batches into the mirror.
    pub fn pump(&mut self) -> Result<(), Error> {
        let Some(mut feed) = self.feed.take() else {
            return Ok(());
        };
        let result = pump_feed(&mut feed, self);
        self.feed = Some(feed);
        result
    }

    fn link_child(&mut self, parent: NodeKey, child: NodeKey, pos: usize) {
        let entry = self.nodes.entry(parent).or_default();
        if !entry.children.contains(&child) {
            let idx = pos.min(entry.children.len());
            entry.children.insert(idx, child);
        }
    }

    fn handle_insert(&mut self, parent: NodeKey, node: NodeKey, tag: &str, pos: usize) {
        // Merge over any placeholder created by an early SetAttr.
        let prior = self.nodes.remove(&node).unwrap_or_default();
        let meta = NodeMeta {
            tag: tag.to_ascii_lowercase(),
            own_ui: prior.own_ui,
            parent: Some(parent),
            children: prior.children,
        };
        if !meta.own_ui {
            let outline = self.make_outline(&meta.tag);
            self.outlines.insert(node, outline);
        }
        self.nodes.insert(node, meta);
        self.link_child(parent, node, pos);
    }

    /// A class or inline-style change restyles only the changed element.
    /// Descendants are left alone: their outline does not depend on an
    /// ancestor's attributes. A change that would alter the element's
    /// own classification therefore does not cascade.
    fn handle_attr(&mut self, node: NodeKey, name: &str, _value: &str) {
        if name == UI_MARKER_ATTR {
            let entry = self.nodes.entry(node).or_default();
            entry.own_ui = true;
            self.outlines.remove(&node);
            return;
        }
        if name != "class" && name != "style" {
            return;
        }
        let Some(meta) = self.nodes.get(&node) else {
            return;
        };
        if meta.own_ui {
            return;
        }
        let tag = meta.tag.clone();
        let outline = self.make_outline(&tag);
        self.outlines.insert(node, outline);
    }

    fn handle_remove(&mut self, node: NodeKey) {
        let mut stack = vec![node];
        if let Some(meta) = self.nodes.get(&node)
            && let Some(parent) = meta.parent
            && let Some(parent_meta) = self.nodes.get_mut(&parent)
        {
            parent_meta.children.retain(|&child| child != node);
        }
        while let Some(current) = stack.pop() {
            if let Some(meta) = self.nodes.remove(&current) {
                stack.extend(meta.children);
            }
            self.outlines.remove(&current);
        }
    }
}

impl DomSubscriber for OutlineEngine {
    fn apply_update(&mut self, update: DomUpdate) -> Result<(), Error> {
        match update {
            DomUpdate::InsertElement {
                parent,
                node,
                tag,
                pos,
            } => self.handle_insert(parent, node, &tag, pos),
            DomUpdate::InsertText { .. } => {
                // Text nodes carry no outline.
            }
            DomUpdate::SetAttr { node, name, value } => self.handle_attr(node, &name, &value),
            DomUpdate::RemoveNode { node } => self.handle_remove(node),
        }
        Ok(())
    }
}
