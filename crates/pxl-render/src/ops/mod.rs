//! Draw operations
//!
//! Each operation is begun through [`RenderContext::begin`](crate::RenderContext::begin)
//! by a constructor method on the context and configured fluently until the
//! next operation (or a flush) commits it.

use crate::paint::{PaintDescriptor, PaintProxy, PaintRole, ShapeStyle, Styled};
use crate::BlendMode;

/// Fill/stroke proxies and blend mode for operations with a `style` field
macro_rules! styled_shape {
    ($ty:ty) => {
        impl Styled for $ty {
            fn paint_mut(&mut self, role: PaintRole) -> &mut PaintDescriptor {
                self.style.descriptor_mut(role)
            }
        }

        impl $ty {
            pub fn fill(&mut self) -> PaintProxy<'_, Self> {
                PaintProxy::new(self, PaintRole::Fill)
            }

            pub fn stroke(&mut self) -> PaintProxy<'_, Self> {
                PaintProxy::new(self, PaintRole::Stroke)
            }

            pub fn blend(&mut self, blend: BlendMode) -> &mut Self {
                self.style.blend = blend;
                self
            }

            pub fn style(&self) -> &ShapeStyle {
                &self.style
            }
        }
    };
}

mod arc;
mod blit;
mod circle;
mod line;
mod path;
mod point;
mod rect;
mod text;

pub use arc::Arc;
pub use blit::Blit;
pub use circle::Circle;
pub use line::Line;
pub use path::PathOp;
pub use point::{Point, Pxl};
pub use rect::Rect;
pub use text::{Edging, Text};

styled_shape!(Arc);
styled_shape!(Circle);
styled_shape!(Line);
styled_shape!(PathOp);
styled_shape!(Rect);
styled_shape!(Text);
