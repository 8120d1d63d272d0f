//! The actor that owns a `LifecycleController` and serializes everything that
//! reaches it.
//!
//! 拥有 `LifecycleController` 并将到达它的一切串行化的 actor。

use super::{command::ControllerCommand, machine::LifecycleController};
use crate::{
    connector::{ConnectorEvent, ConnectorLibrary},
    lifecycle::{HostEvent, LifecycleSource, SubscriptionId},
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// The actor that owns the state machine.
///
/// This actor runs in a dedicated task and merges four inbound channels:
/// host lifecycle events, connector outcome callbacks (delivered from the
/// library's own thread), host commands and connector diagnostics. It is the only place the state machine is
/// touched, so no locking is needed.
///
/// 拥有状态机的actor。
///
/// 此actor在专用任务中运行，并合并四个入站通道：宿主生命周期事件、连接器结果回调
/// （从库自己的线程投递）、宿主命令以及连接器诊断信息。这是唯一接触状态机的地方，因此无需加锁。
pub(crate) struct ControllerActor<L: ConnectorLibrary> {
    pub(crate) controller: LifecycleController<L>,
    pub(crate) command_rx: mpsc::Receiver<ControllerCommand>,
    pub(crate) lifecycle_rx: mpsc::UnboundedReceiver<HostEvent>,
    pub(crate) outcome_rx: mpsc::UnboundedReceiver<ConnectorEvent>,
    pub(crate) diagnostics_rx: mpsc::Receiver<ConnectorEvent>,
    pub(crate) subscription: Option<(Arc<dyn LifecycleSource>, SubscriptionId)>,
}

impl<L: ConnectorLibrary> ControllerActor<L> {
    /// Runs the actor's main event loop until every handle is dropped.
    ///
    /// 运行 actor 的主事件循环，直到所有句柄都被丢弃。
    pub(crate) async fn run(mut self) {
        let view_id = self.controller.view_id();
        loop {
            tokio::select! {
                // Lifecycle events and callbacks queued ahead of a command are
                // applied before it.
                // 排在命令之前的生命周期事件和回调会先于该命令被应用。
                biased;

                // 1. Host lifecycle events.
                // 1. 宿主生命周期事件。
                Some(event) = self.lifecycle_rx.recv() => {
                    self.handle_host_event(event);
                }
                // 2. Connector outcome callbacks, re-dispatched from the library's thread.
                // 2. 连接器结果回调，从库的线程重新分派而来。
                Some(event) = self.outcome_rx.recv() => {
                    self.controller.on_connector_event(event);
                }
                // 3. Host commands.
                // 3. 宿主命令。
                command = self.command_rx.recv() => match command {
                    Some(command) => self.handle_command(command),
                    None => break,
                },
                // 4. Connector diagnostics.
                // 4. 连接器诊断信息。
                Some(event) = self.diagnostics_rx.recv() => {
                    self.controller.on_connector_event(event);
                }
            }
            self.release_subscription_if_terminated();
        }

        debug!(%view_id, "All controller handles dropped");
        self.controller.on_host_destroyed();
        self.release_subscription_if_terminated();
        info!(%view_id, "Controller actor stopped");
    }

    fn handle_host_event(&mut self, event: HostEvent) {
        if let Err(e) = self.controller.on_host_event(event) {
            debug!(view_id = %self.controller.view_id(), ?event, error = %e, "Host event not applied");
        }
    }

    fn handle_command(&mut self, command: ControllerCommand) {
        match command {
            ControllerCommand::Execute {
                command,
                response_tx,
            } => {
                let result = self.controller.execute(command);
                let _ = response_tx.send(result);
            }
            ControllerCommand::SetProperty {
                property,
                response_tx,
            } => {
                self.controller.apply_property(property);
                let _ = response_tx.send(Ok(()));
            }
            ControllerCommand::Snapshot { response_tx } => {
                let _ = response_tx.send(self.controller.snapshot());
            }
        }
    }

    /// Unsubscribes from the lifecycle source once the controller is torn down.
    /// 控制器拆除后取消对生命周期来源的订阅。
    fn release_subscription_if_terminated(&mut self) {
        if !self.controller.is_terminated() {
            return;
        }
        if let Some((source, id)) = self.subscription.take() {
            source.unsubscribe(id);
            debug!(view_id = %self.controller.view_id(), "Unsubscribed from host lifecycle");
        }
    }
}
