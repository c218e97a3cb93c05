/// Common interface of GPU objects held by the registry

use std::any::Any;

use crate::error::Result;
use crate::buffer::{VertexBuffer, IndexBuffer};
use crate::texture::{Texture, Renderbuffer, Framebuffer, RenderTarget};

/// GPU object with an identity hash and a default bind
pub trait GpuResource: Send + Any {
    /// Identity hash (0 until registered)
    fn hash_id(&self) -> usize;

    fn set_hash_id(&mut self, id: usize);

    /// Bind with the object's default settings
    fn bind(&self) -> Result<()>;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

macro_rules! impl_gpu_resource {
    ($type:ty, |$this:ident| $bind:expr) => {
        impl GpuResource for $type {
            fn hash_id(&self) -> usize {
                <$type>::hash_id(self)
            }

            fn set_hash_id(&mut self, id: usize) {
                <$type>::set_hash_id(self, id)
            }

            fn bind(&self) -> Result<()> {
                let $this = self;
                $bind
            }

            fn as_any(&self) -> &dyn Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn Any {
                self
            }
        }
    };
}

impl_gpu_resource!(Texture, |texture| texture.bind());
impl_gpu_resource!(Renderbuffer, |rbo| rbo.bind());
impl_gpu_resource!(Framebuffer, |fbo| fbo.bind());
impl_gpu_resource!(RenderTarget, |target| target.bind(true));
impl_gpu_resource!(IndexBuffer, |ibo| ibo.bind());
impl_gpu_resource!(VertexBuffer, |vbo| vbo.bind());
