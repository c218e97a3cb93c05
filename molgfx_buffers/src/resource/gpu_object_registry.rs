/// Registry of GPU objects addressed by hash id
///
/// Ids are handed out in increasing order starting at 1 (0 means
/// "unregistered") and are never reused. Objects can be freed immediately or
/// queued and freed later by `flush_deferred`, typically once per frame on
/// the thread that owns the graphics context.

use rustc_hash::FxHashMap;

use crate::error::{Error, Result};
use crate::resource::GpuResource;
use crate::engine_trace;

pub struct GpuObjectRegistry {
    objects: FxHashMap<usize, Box<dyn GpuResource>>,
    next_id: usize,
    deferred: Vec<usize>,
}

impl GpuObjectRegistry {
    pub fn new() -> Self {
        Self {
            objects: FxHashMap::default(),
            next_id: 1,
            deferred: Vec::new(),
        }
    }

    /// Take ownership of `object` and return its new hash id
    pub fn register<T: GpuResource>(&mut self, mut object: T) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        object.set_hash_id(id);
        self.objects.insert(id, Box::new(object));
        engine_trace!("molgfx::GpuObjectRegistry", "registered object {}", id);
        id
    }

    /// Typed lookup; `None` if the id is unknown or holds another type
    pub fn get<T: GpuResource>(&self, id: usize) -> Option<&T> {
        self.objects.get(&id).and_then(|object| object.as_any().downcast_ref::<T>())
    }

    pub fn get_mut<T: GpuResource>(&mut self, id: usize) -> Option<&mut T> {
        self.objects.get_mut(&id).and_then(|object| object.as_any_mut().downcast_mut::<T>())
    }

    pub fn get_dyn(&self, id: usize) -> Option<&dyn GpuResource> {
        self.objects.get(&id).map(|object| object.as_ref())
    }

    pub fn contains(&self, id: usize) -> bool {
        self.objects.contains_key(&id)
    }

    /// Bind the object with its default settings
    pub fn bind(&self, id: usize) -> Result<()> {
        self.get_dyn(id)
            .ok_or_else(|| Error::InvalidResource(format!("no GPU object with id {}", id)))?
            .bind()
    }

    /// Drop the object now; returns false if the id is unknown
    pub fn free(&mut self, id: usize) -> bool {
        self.deferred.retain(|&pending| pending != id);
        let removed = self.objects.remove(&id).is_some();
        if removed {
            engine_trace!("molgfx::GpuObjectRegistry", "freed object {}", id);
        }
        removed
    }

    /// Queue the object for the next `flush_deferred`
    pub fn free_deferred(&mut self, id: usize) -> bool {
        if !self.objects.contains_key(&id) {
            return false;
        }
        if !self.deferred.contains(&id) {
            self.deferred.push(id);
        }
        true
    }

    /// Free every queued object; returns how many were freed
    pub fn flush_deferred(&mut self) -> usize {
        let pending = std::mem::take(&mut self.deferred);
        pending.into_iter().filter(|&id| self.objects.remove(&id).is_some()).count()
    }

    pub fn pending_count(&self) -> usize {
        self.deferred.len()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Free everything, queued or not
    pub fn clear(&mut self) {
        self.deferred.clear();
        self.objects.clear();
    }
}

impl Default for GpuObjectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "gpu_object_registry_tests.rs"]
mod tests;
