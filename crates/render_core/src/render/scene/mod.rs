//! Scene storage
//!
//! A scene owns its render objects. Object ids are scoped to the scene that
//! created them; two scenes may both hold an object 1.
//!
//! ```text
//! Scene
//!  └── IdPool<RenderObject>
//!        └── property id ──► RenderProperty (renderer-wide pool)
//!                               ├── mesh id
//!                               └── texture id
//! ```

pub mod render_object;
pub mod render_property;

pub use render_object::RenderObject;
pub use render_property::RenderProperty;

use log::trace;

use crate::foundation::collections::IdPool;
use crate::render::{RenderError, RenderObjectId, RenderPropertyId, RenderResult, ResourceKind};

/// Object store for one logical scene
#[derive(Debug, Default)]
pub struct Scene {
    objects: IdPool<RenderObject>,
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a visible object using `property`
    pub fn create_object(&mut self, property: RenderPropertyId) -> RenderResult<RenderObjectId> {
        let id = self
            .objects
            .insert(RenderObject::new(property))
            .map_err(|_| RenderError::AllocationFailure("render object ids exhausted".to_string()))?;
        trace!("Created render object {} with property {}", id, property);
        Ok(id)
    }

    /// Remove an object
    pub fn destroy_object(&mut self, id: RenderObjectId) -> RenderResult<()> {
        self.objects
            .remove(id)
            .map(|_| trace!("Destroyed render object {}", id))
            .ok_or_else(|| RenderError::not_found(ResourceKind::Object, id))
    }

    /// Move an object; `interpolate` false teleports it
    pub fn set_position(&mut self, id: RenderObjectId, x: f32, y: f32, interpolate: bool) -> RenderResult<()> {
        self.object_mut(id)?.transform.set_position(x, y, interpolate);
        Ok(())
    }

    /// Rotate an object to `angle` radians
    pub fn set_rotation(&mut self, id: RenderObjectId, angle: f32, interpolate: bool) -> RenderResult<()> {
        self.object_mut(id)?.transform.set_rotation(angle, interpolate);
        Ok(())
    }

    /// Show or hide an object
    pub fn set_visible(&mut self, id: RenderObjectId, visible: bool) -> RenderResult<()> {
        self.object_mut(id)?.visible = visible;
        Ok(())
    }

    /// Change an object's depth layer
    pub fn set_layer(&mut self, id: RenderObjectId, layer: f32) -> RenderResult<()> {
        self.object_mut(id)?.layer = layer;
        Ok(())
    }

    /// Point an object at another property
    pub fn set_property(&mut self, id: RenderObjectId, property: RenderPropertyId) -> RenderResult<()> {
        self.object_mut(id)?.property = property;
        Ok(())
    }

    /// Look up an object
    pub fn object(&self, id: RenderObjectId) -> Option<&RenderObject> {
        self.objects.get(id)
    }

    /// Append every visible object to `out`, in ascending id order
    pub fn visit<'a>(&'a self, out: &mut Vec<(RenderObjectId, &'a RenderObject)>) {
        out.extend(self.objects.iter().filter(|(_, object)| object.visible));
    }

    /// Advance every object's previous sample by one logical tick
    pub fn update_state(&mut self, factor: f32) {
        for object in self.objects.values_mut() {
            object.transform.update_state(factor);
        }
    }

    /// Number of objects, visible or not
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the scene holds no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    fn object_mut(&mut self, id: RenderObjectId) -> RenderResult<&mut RenderObject> {
        self.objects
            .get_mut(id)
            .ok_or_else(|| RenderError::not_found(ResourceKind::Object, id))
    }
}
