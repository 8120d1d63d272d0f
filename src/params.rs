//! Connection parameters and viewport geometry set through the property surface.
//!
//! 通过属性面设置的连接参数和视口几何尺寸。

use crate::error::{Error, Result};

/// The strings a connect call needs. All of them are opaque to the controller
/// except `room_identifier`, which is validated before any connect call.
///
/// 连接调用所需的字符串。除 `room_identifier` 外，其余对控制器都是不透明的。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionParameters {
    pub host: String,
    pub token: String,
    pub display_name: String,
    pub room_identifier: String,
}

impl ConnectionParameters {
    /// Checks the room identifier. A resource id may contain neither whitespace nor `@`.
    ///
    /// 检查房间标识符。资源ID不得包含空白字符或 `@`。
    pub fn validate(&self) -> Result<()> {
        let invalid = self
            .room_identifier
            .chars()
            .any(|c| c.is_whitespace() || c == '@');
        if invalid {
            return Err(Error::InvalidRoomIdentifier(self.room_identifier.clone()));
        }
        Ok(())
    }
}

/// The last known size of the render target.
///
/// 渲染目标最近一次已知的尺寸。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewportGeometry {
    pub width: u32,
    pub height: u32,
}

impl ViewportGeometry {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}
