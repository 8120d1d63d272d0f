//! Outward notifications for connection transitions.
//!
//! Each transition of the controller produces at most one [`ConnectionEvent`],
//! addressed to the component's [`ViewId`] and published to a host
//! [`EventListener`]. The listener is held weakly: when the host context is
//! gone the event is dropped without error.
//!
//! 连接状态转换的对外通知。
//!
//! 控制器的每次转换最多产生一个 [`ConnectionEvent`]，发往组件的 [`ViewId`]，
//! 并发布给宿主的 [`EventListener`]。监听器以弱引用持有：当宿主上下文消失时，
//! 事件会被无错误地丢弃。

use std::fmt;
use std::sync::{Arc, Weak};
use tokio::sync::mpsc;
use tracing::debug;

/// The host-assigned identifier of a component instance.
///
/// 宿主分配的组件实例标识符。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub i32);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub const CONNECTION_START: &str = "onConnect";
pub const CONNECTION_STOP: &str = "onDisconnect";
pub const CONNECTION_FAILURE: &str = "onFailure";

/// An outward connection notification.
///
/// 对外的连接通知。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// The connector reported a successful connect.
    /// 连接器报告连接成功。
    Started,
    /// The connection ended, whether requested or dropped.
    /// 连接结束，无论是请求的还是意外中断的。
    Ended,
    /// The connect attempt failed, with a human-readable reason.
    /// 连接尝试失败，附带可读的原因。
    Failed(String),
}

impl ConnectionEvent {
    /// The event name the host-side component dispatches on.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Started => CONNECTION_START,
            Self::Ended => CONNECTION_STOP,
            Self::Failed(_) => CONNECTION_FAILURE,
        }
    }

    pub fn into_payload(self) -> EventPayload {
        let event = self.name();
        let message = match self {
            Self::Failed(reason) => reason,
            Self::Started | Self::Ended => String::new(),
        };
        EventPayload { event, message }
    }
}

/// The `(event, message)` pair delivered to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventPayload {
    pub event: &'static str,
    pub message: String,
}

/// Receives events on behalf of the host framework.
///
/// Called on the controller's task, in transition order. Implementations must
/// not block.
///
/// 代表宿主框架接收事件。
///
/// 在控制器的任务中按转换顺序调用。实现不得阻塞。
pub trait EventListener: Send + Sync {
    fn receive_event(&self, view_id: ViewId, topic: &str, payload: EventPayload);
}

/// Publishes [`ConnectionEvent`]s for one component.
///
/// 为一个组件发布 [`ConnectionEvent`]。
#[derive(Clone)]
pub struct EventEmitter {
    view_id: ViewId,
    topic: String,
    listener: Weak<dyn EventListener>,
}

impl EventEmitter {
    pub fn new(view_id: ViewId, topic: impl Into<String>, listener: Weak<dyn EventListener>) -> Self {
        Self {
            view_id,
            topic: topic.into(),
            listener,
        }
    }

    pub fn view_id(&self) -> ViewId {
        self.view_id
    }

    /// Emits `event`. Returns `false` when the host context is gone and the
    /// event was dropped.
    ///
    /// 发出 `event`。当宿主上下文消失且事件被丢弃时返回 `false`。
    pub fn emit(&self, event: ConnectionEvent) -> bool {
        let payload = event.into_payload();
        debug!(
            view_id = %self.view_id,
            event = payload.event,
            message = %payload.message,
            "Emitting connection event"
        );
        match self.listener.upgrade() {
            Some(listener) => {
                listener.receive_event(self.view_id, &self.topic, payload);
                true
            }
            None => {
                debug!(view_id = %self.view_id, "Host context gone, dropping event");
                false
            }
        }
    }
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("view_id", &self.view_id)
            .field("topic", &self.topic)
            .field("attached", &(self.listener.strong_count() > 0))
            .finish()
    }
}

/// An event as queued by a [`ChannelListener`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedEvent {
    pub view_id: ViewId,
    pub topic: String,
    pub payload: EventPayload,
}

/// An [`EventListener`] that forwards events into a channel, for hosts that
/// consume them on their own task.
///
/// 将事件转发到通道的 [`EventListener`]，适用于在自己的任务中消费事件的宿主。
#[derive(Debug)]
pub struct ChannelListener {
    tx: mpsc::UnboundedSender<EmittedEvent>,
}

impl ChannelListener {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<EmittedEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Arc::new(Self { tx }), rx)
    }
}

impl EventListener for ChannelListener {
    fn receive_event(&self, view_id: ViewId, topic: &str, payload: EventPayload) {
        let _ = self.tx.send(EmittedEvent {
            view_id,
            topic: topic.to_string(),
            payload,
        });
    }
}
