//! Traits for abstracting over the connector library.
use super::event::CallbackSink;
use crate::config::ConnectorConfig;
use crate::params::ConnectionParameters;
use std::fmt;
use thiserror::Error;

/// An opaque handle to the native view the connector renders into.
///
/// 连接器渲染目标原生视图的不透明句柄。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderTarget(pub u64);

impl fmt::Display for RenderTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// How the connector lays out the participants it renders.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewStyle {
    #[default]
    Default,
    Tiles,
}

/// Traffic mode of a constructed connector.
///
/// 已构造连接器的流量模式。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorMode {
    Foreground,
    Background,
}

/// The reason a connector library gave for refusing to construct a connector.
///
/// 连接器库拒绝构造连接器时给出的原因。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ConstructError(pub String);

/// Client-level entry points of the connector library.
///
/// Implementations wrap the vendor SDK. Every call is synchronous and reports
/// failure through its return value; nothing in this trait may fail silently.
///
/// 连接器库的客户端级入口。
///
/// 实现封装厂商SDK。每个调用都是同步的，并通过返回值报告失败；此trait中的任何操作都不得静默失败。
pub trait ConnectorLibrary: Send + 'static {
    /// The connector type this library constructs.
    type Connector: Connector;

    /// Performs one-time client-level initialization.
    /// 执行一次性的客户端级初始化。
    fn initialize_client(&mut self) -> bool;

    /// Constructs a connector bound to `target`.
    /// 构造一个绑定到 `target` 的连接器。
    fn construct(
        &mut self,
        target: RenderTarget,
        config: &ConnectorConfig,
    ) -> Result<Self::Connector, ConstructError>;

    /// Releases client-level resources. Called at most once per controller.
    /// 释放客户端级资源。每个控制器最多调用一次。
    fn uninitialize_client(&mut self);
}

/// A constructed connector.
///
/// Asynchronous outcomes (connect success/failure, disconnects, log records,
/// network-interface changes) are reported through the [`CallbackSink`] the
/// connector was handed, from whatever thread the library delivers them on.
///
/// 已构造的连接器。
///
/// 异步结果（连接成功/失败、断开、日志记录、网络接口变化）通过交给连接器的
/// [`CallbackSink`] 报告，可以来自库投递它们的任意线程。
pub trait Connector: Send + 'static {
    fn register_network_interface_listener(&mut self, sink: CallbackSink) -> bool;

    fn register_log_listener(&mut self, sink: CallbackSink, filter: &str) -> bool;

    /// Starts connecting. `true` means the attempt is in flight and its
    /// outcome will arrive on `sink`.
    ///
    /// 开始连接。`true` 表示尝试正在进行，其结果将通过 `sink` 到达。
    fn connect(&mut self, params: &ConnectionParameters, sink: CallbackSink) -> bool;

    /// Requests a disconnect. Confirmation arrives later as a disconnect callback.
    /// 请求断开。确认稍后以断开回调的形式到达。
    fn disconnect(&mut self);

    fn set_mode(&mut self, mode: ConnectorMode);

    fn set_camera_privacy(&mut self, privacy: bool) -> bool;

    fn set_microphone_privacy(&mut self, privacy: bool) -> bool;

    fn cycle_camera(&mut self);

    fn show_view_at(&mut self, target: RenderTarget, x: i32, y: i32, width: u32, height: u32);

    /// Releases the connector. No other method is called afterwards.
    /// 释放连接器。此后不再调用任何其他方法。
    fn disable(&mut self);
}
