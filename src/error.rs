//! 定义了库中所有可能的错误类型。
//! Defines all possible error types in the library.

use crate::connector::ConstructError;
use thiserror::Error;

/// The primary error type for the connector lifecycle library.
/// 连接器生命周期库的主要错误类型。
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Client-level initialization of the connector library failed.
    /// The controller stays inert for the rest of its lifetime.
    ///
    /// 连接器库的客户端级初始化失败。控制器在其剩余生命周期内保持惰性。
    #[error("connector client initialization failed")]
    Initialization,

    /// The connector library could not construct a connector.
    /// 连接器库无法构造连接器。
    #[error("connector construction failed: {0}")]
    Construction(#[from] ConstructError),

    /// The synchronous connect call reported failure.
    /// 同步连接调用报告失败。
    #[error("connect call rejected by the connector")]
    Connect,

    /// The room identifier contains whitespace or `@`.
    /// 房间标识符包含空白字符或 `@`。
    #[error("invalid room identifier: {0:?}")]
    InvalidRoomIdentifier(String),

    /// The operation needs a constructed connector and there is none.
    /// 该操作需要已构造的连接器，但当前没有。
    #[error("connector not constructed")]
    NotConstructed,

    /// The controller has been torn down.
    /// 控制器已被拆除。
    #[error("controller has been torn down")]
    Terminated,

    /// A command name or id the surface does not know.
    /// 命令面不认识的命令名称或ID。
    #[error("unsupported command {0} received by the component")]
    UnsupportedCommand(String),

    /// A property name the surface does not know, or a value of the wrong kind.
    /// 命令面不认识的属性名，或值类型不匹配。
    #[error("unsupported property {0}")]
    UnsupportedProperty(String),

    /// No component is registered for the view id.
    /// 该视图ID没有注册组件。
    #[error("no component registered for view {0}")]
    UnknownView(i32),

    /// An internal channel for communication between tasks was closed unexpectedly.
    /// 用于任务间通信的内部通道意外关闭。
    #[error("Internal channel is broken")]
    ChannelClosed,
}

impl Error {
    /// Returns `true` for integration faults: the host wired the component
    /// up wrongly or kept using it after teardown, as opposed to a runtime
    /// outcome of the connector.
    ///
    /// 对集成错误返回 `true`：即宿主接线错误或在拆除后继续使用组件，
    /// 而非连接器的运行时结果。
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::Terminated
                | Error::UnsupportedCommand(_)
                | Error::UnsupportedProperty(_)
                | Error::UnknownView(_)
        )
    }
}

/// A specialized `Result` type for this library.
/// 本库专用的 `Result` 类型。
pub type Result<T> = std::result::Result<T, Error>;
