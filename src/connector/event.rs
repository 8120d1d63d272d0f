//! Callbacks the connector library delivers asynchronously, and the sink it
//! delivers them through.
//!
//! 连接器库异步投递的回调，以及投递所经由的接收端。

use std::fmt;
use tokio::sync::mpsc;
use tracing::trace;

/// Why an in-flight connect attempt failed.
///
/// 正在进行的连接尝试失败的原因。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectFailReason {
    ConnectionFailed,
    ConnectionLost,
    ConnectionTimeout,
    NoResponse,
    Terminated,
    InvalidToken,
    InvalidResourceId,
    ResourceFull,
    NotMember,
    Banned,
    MediaFailed,
}

impl fmt::Display for ConnectFailReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::ConnectionFailed => "connection failed",
            Self::ConnectionLost => "connection lost",
            Self::ConnectionTimeout => "connection timed out",
            Self::NoResponse => "no response",
            Self::Terminated => "terminated",
            Self::InvalidToken => "invalid token",
            Self::InvalidResourceId => "invalid resource id",
            Self::ResourceFull => "resource full",
            Self::NotMember => "not a member",
            Self::Banned => "banned",
            Self::MediaFailed => "media failed",
        };
        f.write_str(text)
    }
}

/// Why a connection ended. Only [`DisconnectReason::Disconnected`] is the
/// outcome of a requested disconnect; every other reason is a dropped connection.
///
/// 连接结束的原因。只有 [`DisconnectReason::Disconnected`] 是请求断开的结果；
/// 其他原因都表示连接被意外中断。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisconnectReason {
    Disconnected,
    ConnectionLost,
    ConnectionTimeout,
    NoResponse,
    Terminated,
    MiscLocalError,
    MiscRemoteError,
    MiscError,
}

impl DisconnectReason {
    /// Returns `true` when the disconnect was the one the controller asked for.
    /// 当断开是控制器请求的那一次时返回 `true`。
    pub fn is_expected(self) -> bool {
        matches!(self, Self::Disconnected)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

/// A record from the connector's own logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub level: LogLevel,
    pub category: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInterface {
    pub name: String,
    pub address: String,
    pub interface_type: String,
    pub family: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportType {
    Signaling,
    Media,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceState {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkInterfaceEvent {
    Added(NetworkInterface),
    Removed(NetworkInterface),
    Selected(NetworkInterface, TransportType),
    StateUpdated(NetworkInterface, InterfaceState),
}

/// Everything the connector reports asynchronously.
///
/// 连接器异步报告的所有内容。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectorEvent {
    /// The connect attempt succeeded.
    /// 连接尝试成功。
    Success,
    /// The connect attempt failed.
    /// 连接尝试失败。
    Failure(ConnectFailReason),
    /// An established or in-flight connection ended.
    /// 已建立或正在进行的连接结束了。
    Disconnected(DisconnectReason),
    Log(LogRecord),
    NetworkInterface(NetworkInterfaceEvent),
}

impl ConnectorEvent {
    /// Log records and network-interface changes. They never change the
    /// connection state and may be dropped under load.
    ///
    /// 日志记录和网络接口变化。它们从不改变连接状态，负载过高时可被丢弃。
    pub fn is_diagnostic(&self) -> bool {
        matches!(self, Self::Log(_) | Self::NetworkInterface(_))
    }
}

/// The receiving side of a [`CallbackSink`]: connection outcomes and
/// diagnostics on separate queues.
///
/// [`CallbackSink`] 的接收端：连接结果和诊断信息位于不同的队列。
#[derive(Debug)]
pub struct CallbackQueues {
    /// Success, failure and disconnect callbacks. Never dropped.
    /// 成功、失败和断开回调。从不丢弃。
    pub outcomes: mpsc::UnboundedReceiver<ConnectorEvent>,
    /// Log and network-interface callbacks, bounded.
    /// 日志和网络接口回调，有界。
    pub diagnostics: mpsc::Receiver<ConnectorEvent>,
}

/// The sending side of a controller's connector callback channel.
///
/// Cloned into the connector on `connect` and listener registration. Sending
/// never blocks, so it is safe to call from the library's delivery thread;
/// the controller picks the event up on its own task. Diagnostics go through
/// a bounded queue and are dropped while it is full.
///
/// 控制器连接器回调通道的发送端。
///
/// 在 `connect` 和监听器注册时克隆给连接器。发送从不阻塞，
/// 因此可以安全地从库的投递线程调用；控制器在自己的任务中取出事件。
/// 诊断信息经由有界队列，队列满时被丢弃。
#[derive(Debug, Clone)]
pub struct CallbackSink {
    outcomes: mpsc::UnboundedSender<ConnectorEvent>,
    diagnostics: mpsc::Sender<ConnectorEvent>,
}

impl CallbackSink {
    /// Creates a sink together with the queues the controller drains.
    /// `diagnostics_capacity` bounds the diagnostics queue.
    ///
    /// 创建一个接收端及控制器从中读取的队列。`diagnostics_capacity` 限定诊断队列的容量。
    pub fn channel(diagnostics_capacity: usize) -> (Self, CallbackQueues) {
        let (outcomes_tx, outcomes) = mpsc::unbounded_channel();
        let (diagnostics_tx, diagnostics) = mpsc::channel(diagnostics_capacity.max(1));
        (
            Self {
                outcomes: outcomes_tx,
                diagnostics: diagnostics_tx,
            },
            CallbackQueues {
                outcomes,
                diagnostics,
            },
        )
    }

    /// Delivers an event. Events sent after the controller is gone are dropped.
    /// 投递一个事件。控制器消失后发送的事件会被丢弃。
    pub fn deliver(&self, event: ConnectorEvent) {
        if event.is_diagnostic() {
            match self.diagnostics.try_send(event) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(event)) => {
                    trace!(?event, "Diagnostics queue full, dropping connector callback");
                }
                Err(mpsc::error::TrySendError::Closed(event)) => {
                    trace!(?event, "Controller gone, dropping connector callback");
                }
            }
        } else if let Err(e) = self.outcomes.send(event) {
            trace!(event = ?e.0, "Controller gone, dropping connector callback");
        }
    }

    pub fn on_success(&self) {
        self.deliver(ConnectorEvent::Success);
    }

    pub fn on_failure(&self, reason: ConnectFailReason) {
        self.deliver(ConnectorEvent::Failure(reason));
    }

    pub fn on_disconnected(&self, reason: DisconnectReason) {
        self.deliver(ConnectorEvent::Disconnected(reason));
    }

    pub fn on_log(&self, record: LogRecord) {
        self.deliver(ConnectorEvent::Log(record));
    }

    pub fn on_network_interface(&self, event: NetworkInterfaceEvent) {
        self.deliver(ConnectorEvent::NetworkInterface(event));
    }
}
