//! The ordered draw list: back (index 0) to front (index N−1).
//!
//! Objects are owned by the list and addressed by [`ObjectId`] handles, so
//! there is no shared mutable state between the caller and the frame loop.
//! Removal is deferred: `destroy` marks an object, the frame step reaps it
//! after the draw and update passes.

use crate::drawable::Drawable;
use crate::error::EngineError;

/// Stable handle to an object in a draw list. Ids are never reused within a
/// window's lifetime, so a stale handle fails layer operations with
/// [`EngineError::NotInScene`] rather than addressing a different object.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectId(u64);

pub struct DrawList {
    entries: Vec<(ObjectId, Drawable)>,
    next_id: u64,
}

impl DrawList {
    pub fn new() -> Self {
        Self { entries: Vec::new(), next_id: 0 }
    }

    /// Add an object to the scene, in front of everything already present.
    pub fn add(&mut self, drawable: impl Into<Drawable>) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, drawable.into()));
        id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn get(&self, id: ObjectId) -> Option<&Drawable> {
        self.entries.iter().find(|(eid, _)| *eid == id).map(|(_, d)| d)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Drawable> {
        self.entries.iter_mut().find(|(eid, _)| *eid == id).map(|(_, d)| d)
    }

    /// Back-to-front iteration over live objects.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &Drawable)> {
        self.entries.iter().map(|(id, d)| (*id, d))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = (ObjectId, &mut Drawable)> {
        self.entries.iter_mut().map(|(id, d)| (*id, d))
    }

    fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.entries.iter().position(|(eid, _)| *eid == id)
    }

    fn require(&self, id: ObjectId) -> Result<usize, EngineError> {
        self.index_of(id).ok_or(EngineError::NotInScene)
    }

    // ── Layer operations ────────────────────────────────────────────────

    /// Index in the draw list; 0 is the back layer.
    pub fn layer_of(&self, id: ObjectId) -> Result<usize, EngineError> {
        self.require(id)
    }

    /// Swap with the object one layer in front. No-op at the front.
    pub fn move_forward(&mut self, id: ObjectId) -> Result<(), EngineError> {
        let pos = self.require(id)?;
        if pos + 1 < self.entries.len() {
            self.entries.swap(pos, pos + 1);
        }
        Ok(())
    }

    /// Swap with the object one layer behind. No-op at the back.
    pub fn move_backward(&mut self, id: ObjectId) -> Result<(), EngineError> {
        let pos = self.require(id)?;
        if pos > 0 {
            self.entries.swap(pos, pos - 1);
        }
        Ok(())
    }

    pub fn move_to_front(&mut self, id: ObjectId) -> Result<(), EngineError> {
        let pos = self.require(id)?;
        let entry = self.entries.remove(pos);
        self.entries.push(entry);
        Ok(())
    }

    pub fn move_to_back(&mut self, id: ObjectId) -> Result<(), EngineError> {
        let pos = self.require(id)?;
        let entry = self.entries.remove(pos);
        self.entries.insert(0, entry);
        Ok(())
    }

    /// Remove the object and reinsert it at `layer`. The object lands just
    /// behind whatever previously occupied that layer; an index at or past
    /// the (post-removal) end clamps to the front.
    pub fn set_layer(&mut self, id: ObjectId, layer: usize) -> Result<(), EngineError> {
        let pos = self.require(id)?;
        let entry = self.entries.remove(pos);
        if layer >= self.entries.len() {
            self.entries.push(entry);
        } else {
            self.entries.insert(layer, entry);
        }
        Ok(())
    }

    // ── Lifecycle ───────────────────────────────────────────────────────

    /// Drop every object whose destroyed flag is set. Runs after the frame's
    /// draw and update passes, before input capture.
    pub(crate) fn reap_destroyed(&mut self) {
        self.entries.retain(|(_, d)| !d.is_destroyed());
    }
}

impl Default for DrawList {
    fn default() -> Self {
        Self::new()
    }
}
