//! Object names used inside state keys.
//!
//! GL-style object names are plain integers scoped by the context (or share
//! group) that created them. Each kind gets its own newtype so a program name
//! can never be passed where a texture name is expected.

use std::fmt::Debug;

macro_rules! define_object_id {
    ($($(#[$meta:meta])* $name:ident => $prefix:literal;)*) => {$(
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub u32);

        impl Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }
        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }
    )*};
}

define_object_id! {
    /// Identity of a rendering context. Every per-context key carries one.
    ContextID => "ctx";
    ProgramID => "prog";
    VertexArrayID => "vao";
    TextureID => "tex";
    RenderbufferID => "rb";
    BufferID => "buf";
    FramebufferID => "fb";
    /// EGL images live on the display, not on a context.
    EglImageID => "eglimg";
}

impl FramebufferID {
    /// The window-system provided framebuffer.
    pub const DEFAULT: Self = Self(0);
}
impl VertexArrayID {
    /// The vertex array object that is bound when no VAO was created.
    pub const DEFAULT: Self = Self(0);
}

/// A framebuffer attachment point.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Attachment {
    Color(u8),
    Depth,
    Stencil,
}
