//! The host-facing API of a controller.

use super::{
    actor::ControllerActor, command::ControllerCommand, machine::LifecycleController,
    state::ControllerSnapshot,
};
use crate::{
    config::Config,
    connector::{CallbackSink, ConnectorLibrary, RenderTarget},
    emitter::{EventEmitter, EventListener, ViewId},
    error::{Error, Result},
    lifecycle::{HostEvent, LifecycleSink, LifecycleSource},
    surface::{Command, Property},
};
use std::sync::{Arc, Weak};
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

/// Where a controller lives in the host: its identity, its render target, and
/// the host collaborators it talks to.
///
/// 控制器在宿主中的位置：其标识、渲染目标以及与之交互的宿主协作者。
pub struct ComponentContext {
    pub view_id: ViewId,
    pub render_target: RenderTarget,
    /// Receives outward events. Held weakly by the controller.
    /// 接收对外事件。控制器以弱引用持有。
    pub listener: Weak<dyn EventListener>,
    /// Subscribed once on spawn, unsubscribed on teardown.
    /// 在启动时订阅一次，拆除时取消订阅。
    pub lifecycle: Option<Arc<dyn LifecycleSource>>,
}

/// A handle to a controller actor.
///
/// Cheap to clone. The actor tears the controller down and stops once the
/// last handle is dropped.
///
/// 控制器actor的句柄。
///
/// 克隆开销很小。最后一个句柄被丢弃后，actor 会拆除控制器并停止。
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    view_id: ViewId,
    command_tx: mpsc::Sender<ControllerCommand>,
    lifecycle_tx: LifecycleSink,
}

impl ControllerHandle {
    /// Initializes the connector client and spawns the controller actor.
    ///
    /// A failed initialization is logged and leaves the controller inert; it
    /// still answers commands and queries. Must be called within a tokio runtime.
    ///
    /// 初始化连接器客户端并启动控制器actor。
    ///
    /// 初始化失败会被记录，控制器保持惰性；它仍会响应命令和查询。必须在 tokio 运行时中调用。
    pub fn spawn<L: ConnectorLibrary>(
        library: L,
        config: Arc<Config>,
        context: ComponentContext,
    ) -> Self {
        let ComponentContext {
            view_id,
            render_target,
            listener,
            lifecycle,
        } = context;

        let capacity = config.controller.command_channel_capacity.max(1);
        let (command_tx, command_rx) = mpsc::channel(capacity);
        let (lifecycle_tx, lifecycle_rx) = LifecycleSink::channel();
        let (callback_sink, callback_queues) =
            CallbackSink::channel(config.controller.diagnostics_capacity);

        let emitter = EventEmitter::new(view_id, config.controller.event_topic.clone(), listener);
        let mut controller =
            LifecycleController::new(library, config, render_target, emitter, callback_sink);
        if let Err(e) = controller.initialize() {
            warn!(%view_id, error = %e, "Controller will stay inert");
        }

        let subscription = lifecycle.map(|source| {
            let id = source.subscribe(lifecycle_tx.clone());
            (source, id)
        });

        let actor = ControllerActor {
            controller,
            command_rx,
            lifecycle_rx,
            outcome_rx: callback_queues.outcomes,
            diagnostics_rx: callback_queues.diagnostics,
            subscription,
        };
        tokio::spawn(actor.run());
        info!(%view_id, %render_target, "Controller actor spawned");

        Self {
            view_id,
            command_tx,
            lifecycle_tx,
        }
    }

    pub fn view_id(&self) -> ViewId {
        self.view_id
    }

    /// Runs a surface command and waits for its outcome.
    ///
    /// 执行一个接口命令并等待其结果。
    pub async fn execute(&self, command: Command) -> Result<()> {
        let (response_tx, response_rx) = oneshot::channel();
        self.command_tx
            .send(ControllerCommand::Execute {
                command,
                response_tx,
            })
            .await
            .map_err(|_| Error::ChannelClosed)?;
        response_rx.await.map_err(|_| Error::ChannelClosed)?
    }

    pub async fn connect(&self) -> Result<()> {
        self.execute(Command::Connect).await
    }

    pub async fn disconnect(&self) -> Result<()> {
        self.execute(Command::Disconnect).await
    }

    /// Tears the controller down. Safe to call more than once.
    /// 拆除控制器。可以安全地多次调用。
    pub async fn clean_up(&self) -> Result<()> {
        self.execute(Command::CleanUp).await
    }

    pub async fn toggle_camera_on(&self) -> Result<()> {
        self.execute(Command::ToggleCameraOn).await
    }

    pub async fn toggle_microphone_on(&self) -> Result<()> {
        self.execute(Command::ToggleMicrophoneOn).await
    }

    pub async fn switch_camera(&self) -> Result<()> {
        self.execute(Command::SwitchCamera).await
    }

    pub async fn refresh_ui(&self) -> Result<()> {
        self.execute(Command::RefreshUi).await
    }

    /// Applies a property setter.
    /// 应用一个属性设置。
    pub async fn set_property(&self, property: Property) -> Result<()> {
        let (response_tx, response_rx) = oneshot::channel();
        self.command_tx
            .send(ControllerCommand::SetProperty {
                property,
                response_tx,
            })
            .await
            .map_err(|_| Error::ChannelClosed)?;
        response_rx.await.map_err(|_| Error::ChannelClosed)?
    }

    pub async fn snapshot(&self) -> Result<ControllerSnapshot> {
        let (response_tx, response_rx) = oneshot::channel();
        self.command_tx
            .send(ControllerCommand::Snapshot { response_tx })
            .await
            .map_err(|_| Error::ChannelClosed)?;
        response_rx.await.map_err(|_| Error::ChannelClosed)
    }

    /// Delivers a host event to this controller only, for hosts whose layout
    /// and configuration notifications are per view.
    ///
    /// 仅向此控制器投递宿主事件，适用于布局和配置通知按视图分发的宿主。
    pub fn notify(&self, event: HostEvent) -> Result<()> {
        if self.lifecycle_tx.deliver(event) {
            Ok(())
        } else {
            Err(Error::ChannelClosed)
        }
    }
}
