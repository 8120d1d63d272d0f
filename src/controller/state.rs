//! Controller states.

use crate::params::{ConnectionParameters, ViewportGeometry};

/// The state of the connection.
/// 连接的状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connector has been constructed yet.
    /// 尚未构造连接器。
    Uninitialized,
    /// Constructed and not connected; also the state after a requested disconnect.
    /// 已构造但未连接；也是请求断开之后的状态。
    Disconnected,
    /// A connect call was accepted and its outcome is pending.
    /// 连接调用已被接受，结果待定。
    Connecting,
    /// The connector reported a successful connect.
    /// 连接器报告连接成功。
    Connected,
    /// The connection dropped without being asked to.
    /// 连接在未被请求的情况下中断。
    DisconnectedUnexpected,
    /// The last connect attempt failed.
    /// 上一次连接尝试失败。
    ConnectionFailure,
}

impl ConnectionState {
    /// Whether `connect` may be issued from this state.
    /// 是否可以从此状态发出 `connect`。
    pub fn can_connect(self) -> bool {
        matches!(
            self,
            Self::Disconnected | Self::ConnectionFailure | Self::DisconnectedUnexpected
        )
    }
}

/// Where the controller is in the life of its connector.
///
/// 控制器在其连接器生命周期中所处的阶段。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Client-level initialization has not run.
    /// 客户端级初始化尚未运行。
    Uninitialized,
    /// Client initialized, connector not constructed.
    /// 客户端已初始化，连接器尚未构造。
    Idle,
    /// Client initialization failed. The controller stays inert.
    /// 客户端初始化失败。控制器保持惰性。
    InitFailed,
    /// A connector is constructed and owned.
    /// 已构造并拥有一个连接器。
    Constructed,
    /// Torn down. Only property setters and queries are still accepted.
    /// 已拆除。仅接受属性设置和查询。
    Terminated,
}

/// A point-in-time view of a controller.
///
/// 控制器的时间点快照。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerSnapshot {
    pub phase: Phase,
    pub connection_state: ConnectionState,
    pub camera_on: bool,
    pub microphone_on: bool,
    pub geometry: ViewportGeometry,
    pub params: ConnectionParameters,
}
