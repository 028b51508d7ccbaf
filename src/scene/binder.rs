//! Keeps scene nodes following simulated bodies

use crate::core::EngineError;
use crate::physics::{PhysicsQuery, RigidBodyHandle};

use super::graphics::{RenderEntity, TransformTarget};

/// Ordered list of (entity, body) pairs whose transforms are copied from the
/// body onto the entity once per frame.
///
/// The binder owns neither side. Unbind before removing either the body or
/// the node, otherwise the next [`sync`](Self::sync) reports the stale handle.
#[derive(Debug, Default, Clone)]
pub struct Bindings {
    pairs: Vec<(RenderEntity, RigidBodyHandle)>,
}

impl Bindings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `entity` follow `body` from the next sync on
    pub fn bind(&mut self, entity: RenderEntity, body: RigidBodyHandle) {
        self.pairs.push((entity, body));
    }

    /// Remove every pair involving `entity`, returning how many were removed
    pub fn unbind_entity(&mut self, entity: RenderEntity) -> usize {
        let before = self.pairs.len();
        self.pairs.retain(|&(bound, _)| bound != entity);
        before - self.pairs.len()
    }

    /// Remove every pair involving `body`, returning how many were removed
    pub fn unbind_body(&mut self, body: RigidBodyHandle) -> usize {
        let before = self.pairs.len();
        self.pairs.retain(|&(_, bound)| bound != body);
        before - self.pairs.len()
    }

    /// Copy each body's current position and orientation onto its entity,
    /// in binding order. Returns the number of pairs synced.
    ///
    /// # Errors
    ///
    /// Stops at the first pair whose body or entity no longer exists and
    /// returns [`EngineError::StaleBody`] or [`EngineError::StaleEntity`].
    pub fn sync(
        &self,
        physics: &impl PhysicsQuery,
        target: &mut impl TransformTarget,
    ) -> Result<usize, EngineError> {
        for &(entity, body) in &self.pairs {
            let (position, orientation) = physics
                .body_transform(body)
                .ok_or(EngineError::StaleBody(body))?;
            target.set_transform(entity, position, orientation)?;
        }
        Ok(self.pairs.len())
    }

    /// Iterate over bound pairs in binding order
    pub fn iter(&self) -> impl Iterator<Item = &(RenderEntity, RigidBodyHandle)> {
        self.pairs.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
