//! State keys: value-typed names for the pieces of mutable API state a command
//! can read or write.
//!
//! Keys form a forest through [`IStateKey::parent`]. A parent is always a
//! conservative superset of its child, so a read that finds no writer for the
//! exact key may fall back to whoever last wrote the coarser key. Group keys
//! (keys without a parent such as [`StateKey::ProgramUniforms`]) let a
//! behaviour provider express "everything in this resource" without
//! enumerating the leaves.
//!
//! 作用域信息 (当前绑定的 program / VAO、所属 context) 必须直接编码进 key 里,
//! 这样不同绑定下的写入永远不会被连成依赖边.

use smol_str::SmolStr;
use std::{fmt::Debug, hash::Hash};

mod ids;

pub use ids::*;

/// Anything the dependency graph can track.
///
/// Implementations must make `parent()` a pure function of `self` and keep the
/// chain acyclic. The graph builder bounds every climb and reports a cycle as
/// [`crate::graph::GraphErr::ParentChainTooDeep`].
pub trait IStateKey: Clone + Eq + Hash + Debug {
    fn parent(&self) -> Option<Self>;

    fn is_group(&self) -> bool {
        self.parent().is_none()
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StateKey {
    /// `count` consecutive uniform slots starting at `location` of `program`.
    ///
    /// Writes with different `count` at the same location are distinct keys;
    /// they only meet through the [`StateKey::ProgramUniforms`] parent.
    Uniform {
        ctx: ContextID,
        program: ProgramID,
        location: u32,
        count: u32,
    },
    /// All uniforms of one program.
    ProgramUniforms { ctx: ContextID, program: ProgramID },

    /// Vertex attribute array `location` of vertex array object `vao`.
    VertexAttrib {
        ctx: ContextID,
        vao: VertexArrayID,
        location: u32,
    },
    /// Every attribute of one vertex array object.
    VertexArray { ctx: ContextID, vao: VertexArrayID },

    /// Texel data of one mip level / array layer.
    TextureData {
        ctx: ContextID,
        texture: TextureID,
        level: u32,
        layer: u32,
    },
    /// Texel data of a whole texture across all levels and layers.
    TextureAllData { ctx: ContextID, texture: TextureID },

    RenderbufferData {
        ctx: ContextID,
        renderbuffer: RenderbufferID,
    },
    EglImageData { image: EglImageID },
    BufferData { ctx: ContextID, buffer: BufferID },

    /// Pixel contents behind one attachment point of a framebuffer.
    FramebufferAttachment {
        ctx: ContextID,
        framebuffer: FramebufferID,
        attachment: Attachment,
    },
    Framebuffer {
        ctx: ContextID,
        framebuffer: FramebufferID,
    },

    /// Any other piece of per-context state, e.g. `"viewport"` or
    /// `"bound_program"`.
    ContextField { ctx: ContextID, name: SmolStr },
}

impl IStateKey for StateKey {
    fn parent(&self) -> Option<Self> {
        use StateKey::*;
        match *self {
            Uniform { ctx, program, .. } => Some(ProgramUniforms { ctx, program }),
            VertexAttrib { ctx, vao, .. } => Some(VertexArray { ctx, vao }),
            TextureData { ctx, texture, .. } => Some(TextureAllData { ctx, texture }),
            FramebufferAttachment {
                ctx, framebuffer, ..
            } => Some(Framebuffer { ctx, framebuffer }),

            ProgramUniforms { .. }
            | VertexArray { .. }
            | TextureAllData { .. }
            | RenderbufferData { .. }
            | EglImageData { .. }
            | BufferData { .. }
            | Framebuffer { .. }
            | ContextField { .. } => None,
        }
    }
}

impl StateKey {
    /// Color buffer 0 of the default framebuffer: what ends up on screen.
    pub fn default_framebuffer_color(ctx: ContextID) -> Self {
        StateKey::FramebufferAttachment {
            ctx,
            framebuffer: FramebufferID::DEFAULT,
            attachment: Attachment::Color(0),
        }
    }

    pub fn context_field(ctx: ContextID, name: impl Into<SmolStr>) -> Self {
        StateKey::ContextField { ctx, name: name.into() }
    }

    /// The owning context, or `None` for display-level state.
    pub fn context(&self) -> Option<ContextID> {
        use StateKey::*;
        match *self {
            Uniform { ctx, .. }
            | ProgramUniforms { ctx, .. }
            | VertexAttrib { ctx, .. }
            | VertexArray { ctx, .. }
            | TextureData { ctx, .. }
            | TextureAllData { ctx, .. }
            | RenderbufferData { ctx, .. }
            | BufferData { ctx, .. }
            | FramebufferAttachment { ctx, .. }
            | Framebuffer { ctx, .. }
            | ContextField { ctx, .. } => Some(ctx),
            EglImageData { .. } => None,
        }
    }

    /// Iterates `self`, then its parent, grandparent, ... up to the group key.
    pub fn ancestors(&self) -> impl Iterator<Item = StateKey> {
        std::iter::successors(Some(self.clone()), |k| k.parent())
    }
}
