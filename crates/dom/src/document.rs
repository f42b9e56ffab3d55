use crate::feed::{DomFeed, DomUpdate};
use crate::geometry::ElementMetrics;
use crate::NodeKey;
use anyhow::{anyhow, Error};
use indextree::{Arena, NodeId};
use smallvec::SmallVec;
use std::collections::HashMap;
use tokio::sync::broadcast;

/// Marker attribute stamped on every scaffold element the inspector
/// creates for itself, so engines can skip their own UI with a single
/// attribute lookup instead of a containment walk.
pub const UI_MARKER_ATTR: &str = "data-inspector-ui";

#[derive(Debug, Clone, Default)]
pub enum NodeKind {
    #[default]
    Document,
    Element {
        tag: String,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DomNode {
    pub key: NodeKey,
    pub kind: NodeKind,
    pub attrs: SmallVec<(String, String), 4>,
    pub metrics: Option<ElementMetrics>,
}

/// The page tree, with a broadcast feed of batched mutation records.
///
/// Mutations accumulate in a pending batch and go out on [`flush`],
/// which models the host delivering change notifications on its own
/// schedule rather than per mutation.
///
/// [`flush`]: Document::flush
#[derive(Debug)]
pub struct Document {
    arena: Arena<DomNode>,
    root: NodeId,
    ids: HashMap<NodeKey, NodeId>,
    next_key: u64,
    update_sender: broadcast::Sender<Vec<DomUpdate>>,
    pending: Vec<DomUpdate>,
}

impl Document {
    pub fn new() -> Self {
        let (update_sender, _) = broadcast::channel(128);
        let mut arena = Arena::new();
        let root = arena.new_node(DomNode {
            key: NodeKey::ROOT,
            kind: NodeKind::Document,
            attrs: SmallVec::new(),
            metrics: None,
        });
        let mut ids = HashMap::new();
        ids.insert(NodeKey::ROOT, root);
        Self {
            arena,
            root,
            ids,
            next_key: 0,
            update_sender,
            pending: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeKey {
        NodeKey::ROOT
    }

    /// Subscribe to the change feed. Dropping the handle unsubscribes.
    pub fn subscribe(&self) -> DomFeed {
        DomFeed::new(self.update_sender.subscribe())
    }

    fn id_of(&self, key: NodeKey) -> Result<NodeId, Error> {
        self.ids
            .get(&key)
            .copied()
            .ok_or_else(|| anyhow!("unknown node {key}"))
    }

    fn child_count(&self, parent: NodeId) -> usize {
        parent.children(&self.arena).count()
    }

    fn alloc_key(&mut self) -> NodeKey {
        self.next_key += 1;
        NodeKey(self.next_key)
    }

    pub fn create_element(&mut self, parent: NodeKey, tag: &str) -> Result<NodeKey, Error> {
        let parent_id = self.id_of(parent)?;
        let key = self.alloc_key();
        let pos = self.child_count(parent_id);
        let id = self.arena.new_node(DomNode {
            key,
            kind: NodeKind::Element {
                tag: tag.to_ascii_lowercase(),
            },
            attrs: SmallVec::new(),
            metrics: None,
        });
        parent_id.append(id, &mut self.arena);
        self.ids.insert(key, id);
        self.pending.push(DomUpdate::InsertElement {
            parent,
            node: key,
            tag: tag.to_ascii_lowercase(),
            pos,
        });
        Ok(key)
    }

    pub fn create_text(&mut self, parent: NodeKey, text: &str) -> Result<NodeKey, Error> {
        let parent_id = self.id_of(parent)?;
        let key = self.alloc_key();
        let pos = self.child_count(parent_id);
        let id = self.arena.new_node(DomNode {
            key,
            kind: NodeKind::Text {
                text: text.to_owned(),
            },
            attrs: SmallVec::new(),
            metrics: None,
        });
        parent_id.append(id, &mut self.arena);
        self.ids.insert(key, id);
        self.pending.push(DomUpdate::InsertText {
            parent,
            node: key,
            text: text.to_owned(),
            pos,
        });
        Ok(key)
    }

    pub fn set_attr(&mut self, node: NodeKey, name: &str, value: &str) -> Result<(), Error> {
        let id = self.id_of(node)?;
        let data = self
            .arena
            .get_mut(id)
            .ok_or_else(|| anyhow!("stale node {node}"))?
            .get_mut();
        if let Some(pair) = data.attrs.iter_mut().find(|(attr, _)| attr == name) {
            pair.1 = value.to_owned();
        } else {
            data.attrs.push((name.to_owned(), value.to_owned()));
        }
        self.pending.push(DomUpdate::SetAttr {
            node,
            name: name.to_owned(),
            value: value.to_owned(),
        });
        Ok(())
    }

    /// Remove a node and its whole subtree. The feed carries a single
    /// record for the removal root; mirrors drop descendants themselves.
    pub fn remove(&mut self, node: NodeKey) -> Result<(), Error> {
        let id = self.id_of(node)?;
        let removed: Vec<NodeKey> = id
            .descendants(&self.arena)
            .filter_map(|desc| self.arena.get(desc).map(|entry| entry.get().key))
            .collect();
        id.remove_subtree(&mut self.arena);
        for key in removed {
            self.ids.remove(&key);
        }
        self.pending.push(DomUpdate::RemoveNode { node });
        Ok(())
    }

    /// Broadcast the pending batch to every live feed. A send with no
    /// subscribers is not an error; the batch is simply dropped.
    pub fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let batch = core::mem::take(&mut self.pending);
        let _ = self.update_sender.send(batch);
    }

    pub fn contains(&self, node: NodeKey) -> bool {
        self.ids.contains_key(&node)
    }

    pub fn tag(&self, node: NodeKey) -> Option<&str> {
        let id = *self.ids.get(&node)?;
        match &self.arena.get(id)?.get().kind {
            NodeKind::Element { tag } => Some(tag.as_str()),
            NodeKind::Document | NodeKind::Text { .. } => None,
        }
    }

    pub fn attr(&self, node: NodeKey, name: &str) -> Option<&str> {
        let id = *self.ids.get(&node)?;
        self.arena
            .get(id)?
            .get()
            .attrs
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn parent(&self, node: NodeKey) -> Option<NodeKey> {
        let id = *self.ids.get(&node)?;
        let parent = self.arena.get(id)?.parent()?;
        self.arena.get(parent).map(|entry| entry.get().key)
    }

    pub fn children(&self, node: NodeKey) -> Vec<NodeKey> {
        let Some(&id) = self.ids.get(&node) else {
            return Vec::new();
        };
        id.children(&self.arena)
            .filter_map(|child| self.arena.get(child).map(|entry| entry.get().key))
            .collect()
    }

    /// Every element in document order. One full walk; the enable pass
    /// of the outline engine is the only O(n) consumer.
    pub fn elements(&self) -> Vec<NodeKey> {
        self.root
            .descendants(&self.arena)
            .skip(1)
            .filter_map(|id| {
                let data = self.arena.get(id)?.get();
                matches!(data.kind, NodeKind::Element { .. }).then_some(data.key)
            })
            .collect()
    }

    pub fn element_by_id(&self, html_id: &str) -> Option<NodeKey> {
        self.elements()
            .into_iter()
            .find(|&key| self.attr(key, "id") == Some(html_id))
    }

    /// Stamp the own-UI marker on a scaffold element.
    pub fn mark_ui(&mut self, node: NodeKey) -> Result<(), Error> {
        self.set_attr(node, UI_MARKER_ATTR, "1")
    }

    pub fn is_own_ui(&self, node: NodeKey) -> bool {
        self.attr(node, UI_MARKER_ATTR).is_some()
    }

    pub fn set_metrics(&mut self, node: NodeKey, metrics: ElementMetrics) -> Result<(), Error> {
        let id = self.id_of(node)?;
        self.arena
            .get_mut(id)
            .ok_or_else(|| anyhow!("stale node {node}"))?
            .get_mut()
            .metrics = Some(metrics);
        Ok(())
    }

    pub fn metrics(&self, node: NodeKey) -> Option<&ElementMetrics> {
        let id = *self.ids.get(&node)?;
        self.arena.get(id)?.get().metrics.as_ref()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
