//! Host lifecycle notifications and the subscription interface controllers
//! use to receive them.
//!
//! 宿主生命周期通知，以及控制器用来接收它们的订阅接口。

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tracing::{debug, trace};

/// A lifecycle or layout notification from the host framework.
///
/// 来自宿主框架的生命周期或布局通知。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    /// The host became active (resume).
    /// 宿主变为活动状态（恢复）。
    Resume,
    /// The host went to the background (pause).
    /// 宿主进入后台（暂停）。
    Pause,
    /// The host is being destroyed.
    /// 宿主正在被销毁。
    Destroy,
    /// Device configuration (e.g. orientation) changed. Geometry is stale
    /// until the next layout pass.
    ///
    /// 设备配置（例如方向）发生变化。在下一次布局之前几何尺寸是过时的。
    ConfigurationChanged,
    /// A layout pass completed.
    /// 一次布局完成。
    LayoutReady,
}

/// Identifies a subscription on a [`LifecycleSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// The receiving end a [`LifecycleSource`] delivers events to.
///
/// 一个 [`LifecycleSource`] 投递事件的接收端。
#[derive(Debug, Clone)]
pub struct LifecycleSink {
    tx: mpsc::UnboundedSender<HostEvent>,
}

impl LifecycleSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<HostEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Delivers `event`. Returns `false` if the subscriber is gone.
    /// 投递 `event`。如果订阅者已不存在则返回 `false`。
    pub fn deliver(&self, event: HostEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// A source of host lifecycle events. A controller subscribes once and
/// unsubscribes when it is torn down.
///
/// 宿主生命周期事件的来源。控制器订阅一次，并在拆除时取消订阅。
pub trait LifecycleSource: Send + Sync {
    fn subscribe(&self, sink: LifecycleSink) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId);
}

/// A [`LifecycleSource`] that fans each published event out to every subscriber.
///
/// 将每个发布的事件扇出给所有订阅者的 [`LifecycleSource`]。
#[derive(Debug, Default)]
pub struct LifecycleBroadcaster {
    next_id: AtomicU64,
    subscribers: DashMap<SubscriptionId, LifecycleSink>,
}

impl LifecycleBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `event` to all subscribers and returns how many received it.
    /// Subscribers whose receiving side has gone away are pruned.
    ///
    /// 向所有订阅者发布 `event`，返回接收到的数量。接收端已消失的订阅者会被清理。
    pub fn publish(&self, event: HostEvent) -> usize {
        let mut delivered = 0;
        self.subscribers.retain(|id, sink| {
            if sink.deliver(event) {
                delivered += 1;
                true
            } else {
                debug!(subscription = id.0, "Pruning closed lifecycle subscriber");
                false
            }
        });
        trace!(?event, delivered, "Published host lifecycle event");
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl LifecycleSource for LifecycleBroadcaster {
    fn subscribe(&self, sink: LifecycleSink) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers.insert(id, sink);
        debug!(subscription = id.0, "Lifecycle subscriber added");
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        if self.subscribers.remove(&id).is_some() {
            debug!(subscription = id.0, "Lifecycle subscriber removed");
        }
    }
}
