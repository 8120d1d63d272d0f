//! The connection lifecycle state machine.
//!
//! [`LifecycleController`] is synchronous and owns everything: the connector
//! library, the constructed connector, the connection state and the local
//! privacy flags. It is driven by a single consumer (the controller actor),
//! so none of its state needs locking.
//!
//! 连接生命周期状态机。
//!
//! [`LifecycleController`] 是同步的并拥有一切：连接器库、已构造的连接器、连接状态
//! 以及本地隐私标志。它由单一消费者（控制器 actor）驱动，因此其状态无需加锁。

use super::state::{ConnectionState, ControllerSnapshot, Phase};
use crate::{
    config::Config,
    connector::{
        CallbackSink, ConnectorEvent, ConnectorHandle, ConnectorLibrary, ConnectorMode, LogLevel,
        LogRecord, NetworkInterfaceEvent, RenderTarget,
    },
    emitter::{ConnectionEvent, EventEmitter, ViewId},
    error::{Error, Result},
    lifecycle::HostEvent,
    params::{ConnectionParameters, ViewportGeometry},
    surface::{Command, Property},
};
use std::sync::Arc;
use tracing::{debug, error, info, trace, warn};

/// The state machine governing one component's connector.
///
/// 管理一个组件连接器的状态机。
pub struct LifecycleController<L: ConnectorLibrary> {
    library: L,
    handle: Option<ConnectorHandle<L::Connector>>,
    config: Arc<Config>,
    render_target: RenderTarget,
    sink: CallbackSink,
    emitter: EventEmitter,
    phase: Phase,
    state: ConnectionState,
    client_released: bool,
    params: ConnectionParameters,
    geometry: ViewportGeometry,
    camera_on: bool,
    microphone_on: bool,
    /// Set by a configuration change; the view is refreshed on the next layout pass.
    /// 由配置变化设置；视图在下一次布局时刷新。
    refresh_pending: bool,
}

impl<L: ConnectorLibrary> LifecycleController<L> {
    pub fn new(
        library: L,
        config: Arc<Config>,
        render_target: RenderTarget,
        emitter: EventEmitter,
        sink: CallbackSink,
    ) -> Self {
        let geometry = config.controller.default_viewport;
        Self {
            library,
            handle: None,
            config,
            render_target,
            sink,
            emitter,
            phase: Phase::Uninitialized,
            state: ConnectionState::Uninitialized,
            client_released: false,
            params: ConnectionParameters::default(),
            geometry,
            camera_on: true,
            microphone_on: true,
            refresh_pending: false,
        }
    }

    pub fn view_id(&self) -> ViewId {
        self.emitter.view_id()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_constructed(&self) -> bool {
        self.handle.is_some()
    }

    pub fn is_terminated(&self) -> bool {
        self.phase == Phase::Terminated
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            phase: self.phase,
            connection_state: self.state,
            camera_on: self.camera_on,
            microphone_on: self.microphone_on,
            geometry: self.geometry,
            params: self.params.clone(),
        }
    }

    /// Performs one-time client-level initialization.
    ///
    /// A failure is permanent for this controller: later construct attempts
    /// are skipped, never retried.
    ///
    /// 执行一次性的客户端级初始化。
    ///
    /// 失败对该控制器是永久性的：之后的构造尝试会被跳过，永不重试。
    pub fn initialize(&mut self) -> Result<()> {
        match self.phase {
            Phase::Uninitialized => {}
            Phase::Idle | Phase::Constructed => return Ok(()),
            Phase::InitFailed => return Err(Error::Initialization),
            Phase::Terminated => return Err(Error::Terminated),
        }

        if self.library.initialize_client() {
            self.phase = Phase::Idle;
            info!(view_id = %self.view_id(), "Connector client initialized");
            Ok(())
        } else {
            self.phase = Phase::InitFailed;
            error!(view_id = %self.view_id(), "Connector client initialization failed");
            Err(Error::Initialization)
        }
    }

    /// Handles the host becoming active. Constructs the connector the first
    /// time this runs after a successful initialization; later calls do nothing.
    ///
    /// 处理宿主变为活动状态。在初始化成功后首次运行时构造连接器；之后的调用不做任何事。
    pub fn on_host_became_active(&mut self) -> Result<()> {
        match self.phase {
            Phase::Idle => {}
            Phase::Constructed => {
                debug!(view_id = %self.view_id(), "Connector already constructed");
                return Ok(());
            }
            Phase::Uninitialized | Phase::InitFailed => {
                error!(
                    view_id = %self.view_id(),
                    "Client initialization failed - not constructing connector"
                );
                return Err(Error::Initialization);
            }
            Phase::Terminated => return Err(Error::Terminated),
        }

        let result = self.construct();
        info!(
            view_id = %self.view_id(),
            constructed = result.is_ok(),
            "Host became active"
        );
        result?;
        self.refresh_view(self.geometry)
    }

    fn construct(&mut self) -> Result<()> {
        let config = Arc::clone(&self.config);
        let connector = self
            .library
            .construct(self.render_target, &config.connector)
            .map_err(|e| {
                error!(view_id = %self.view_id(), error = %e, "Connector construction failed");
                Error::from(e)
            })?;

        let mut handle = ConnectorHandle::new(connector, self.render_target);
        let (network, log) = handle.register_listeners(&self.sink, &config.connector.log_filter);
        if !network {
            error!(view_id = %self.view_id(), "Registering network interface listener failed");
        }
        if !log {
            error!(view_id = %self.view_id(), "Registering log listener failed");
        }

        self.handle = Some(handle);
        self.phase = Phase::Constructed;
        self.state = ConnectionState::Disconnected;
        Ok(())
    }

    /// Puts the connector into background mode. Never disconnects.
    ///
    /// 将连接器置于后台模式。从不断开连接。
    pub fn on_host_backgrounded(&mut self) {
        match self.handle.as_mut() {
            Some(handle) => {
                handle.set_mode(ConnectorMode::Background);
                debug!(view_id = %self.view_id(), "Connector moved to background mode");
            }
            None => trace!(view_id = %self.view_id(), "Host backgrounded without a connector"),
        }
    }

    /// Tears the controller down.
    ///
    /// A live connection is disconnected and its end is announced before the
    /// connector is released. The connector is disabled and the client
    /// uninitialized exactly once; calling this again does nothing. Never fails.
    ///
    /// 拆除控制器。
    ///
    /// 活动连接会被断开，并在释放连接器之前通知其结束。连接器被禁用、客户端被反初始化
    /// 恰好一次；再次调用不做任何事。从不失败。
    pub fn on_host_destroyed(&mut self) {
        if self.phase == Phase::Terminated {
            debug!(view_id = %self.view_id(), "Controller already torn down");
            return;
        }

        if let Some(mut handle) = self.handle.take() {
            if self.state == ConnectionState::Connected {
                handle.disconnect();
                self.emitter.emit(ConnectionEvent::Ended);
            }
            self.state = ConnectionState::Disconnected;
            handle.disable();
        }

        if !self.client_released {
            self.client_released = true;
            self.library.uninitialize_client();
        }

        self.refresh_pending = false;
        self.phase = Phase::Terminated;
        info!(view_id = %self.view_id(), "Controller torn down");
    }

    /// Issues a connect with the current parameters.
    ///
    /// Does nothing while connected or connecting. The room identifier is
    /// validated before the connector is touched. A connect call the
    /// connector rejects moves to [`ConnectionState::ConnectionFailure`] and
    /// announces the failure before returning.
    ///
    /// 使用当前参数发起连接。
    ///
    /// 已连接或正在连接时不做任何事。在接触连接器之前验证房间标识符。
    /// 被连接器拒绝的连接调用会转到 [`ConnectionState::ConnectionFailure`]，并在返回前通知失败。
    pub fn connect(&mut self) -> Result<()> {
        if self.phase == Phase::Terminated {
            return Err(Error::Terminated);
        }
        if matches!(
            self.state,
            ConnectionState::Connected | ConnectionState::Connecting
        ) {
            debug!(view_id = %self.view_id(), state = ?self.state, "Ignoring connect");
            return Ok(());
        }
        if let Err(e) = self.params.validate() {
            warn!(view_id = %self.view_id(), error = %e, "Refusing to connect");
            return Err(e);
        }
        let Some(handle) = self.handle.as_mut() else {
            warn!(view_id = %self.emitter.view_id(), "Connect requested before construction");
            return Err(Error::NotConstructed);
        };
        debug_assert!(self.state.can_connect());

        info!(
            view_id = %self.emitter.view_id(),
            host = %self.params.host,
            display_name = %self.params.display_name,
            room = %self.params.room_identifier,
            "Connecting"
        );
        if handle.connect(&self.params, &self.sink) {
            self.state = ConnectionState::Connecting;
            debug!(view_id = %self.view_id(), "Connect call accepted");
            Ok(())
        } else {
            warn!(view_id = %self.view_id(), "Connect call rejected");
            let message = self.config.controller.failure_message.clone();
            self.transition(
                ConnectionState::ConnectionFailure,
                ConnectionEvent::Failed(message),
            );
            Err(Error::Connect)
        }
    }

    /// Requests a disconnect. The state only changes once the connector
    /// confirms through its disconnect callback.
    ///
    /// 请求断开。状态仅在连接器通过断开回调确认后才改变。
    pub fn disconnect(&mut self) -> Result<()> {
        match self.handle.as_mut() {
            Some(handle) => {
                handle.disconnect();
                info!(view_id = %self.emitter.view_id(), "Disconnect requested");
            }
            None => debug!(view_id = %self.view_id(), "Disconnect without a connector"),
        }
        Ok(())
    }

    /// Flips the camera privacy. The local flag follows only if the connector
    /// accepts the change.
    ///
    /// 切换摄像头隐私。仅当连接器接受更改时本地标志才随之改变。
    pub fn toggle_camera_privacy(&mut self) -> Result<()> {
        let camera_on = !self.camera_on;
        let accepted = self.constructed_handle()?.set_camera_privacy(!camera_on);
        if accepted {
            self.camera_on = camera_on;
            info!(view_id = %self.view_id(), camera_on, "Camera toggled");
        } else {
            warn!(view_id = %self.view_id(), camera_on = self.camera_on, "Camera privacy change rejected");
        }
        Ok(())
    }

    /// Flips the microphone privacy, success-gated like the camera.
    ///
    /// 切换麦克风隐私，与摄像头一样以成功为前提。
    pub fn toggle_microphone_privacy(&mut self) -> Result<()> {
        let microphone_on = !self.microphone_on;
        let accepted = self
            .constructed_handle()?
            .set_microphone_privacy(!microphone_on);
        if accepted {
            self.microphone_on = microphone_on;
            info!(view_id = %self.view_id(), microphone_on, "Microphone toggled");
        } else {
            warn!(
                view_id = %self.view_id(),
                microphone_on = self.microphone_on,
                "Microphone privacy change rejected"
            );
        }
        Ok(())
    }

    pub fn switch_camera(&mut self) -> Result<()> {
        self.constructed_handle()?.cycle_camera();
        debug!(view_id = %self.view_id(), "Camera cycled");
        Ok(())
    }

    /// Reattaches the rendered output at `geometry`.
    ///
    /// 以 `geometry` 重新附加渲染输出。
    pub fn refresh_view(&mut self, geometry: ViewportGeometry) -> Result<()> {
        self.geometry = geometry;
        self.constructed_handle()?.show_view(geometry);
        debug!(
            view_id = %self.view_id(),
            width = geometry.width,
            height = geometry.height,
            "View shown"
        );
        Ok(())
    }

    /// Maps a host lifecycle notification onto the state machine.
    ///
    /// 将宿主生命周期通知映射到状态机上。
    pub fn on_host_event(&mut self, event: HostEvent) -> Result<()> {
        trace!(view_id = %self.view_id(), ?event, "Host event");
        match event {
            HostEvent::Resume => self.on_host_became_active(),
            HostEvent::Pause => {
                self.on_host_backgrounded();
                Ok(())
            }
            HostEvent::Destroy => {
                self.on_host_destroyed();
                Ok(())
            }
            HostEvent::ConfigurationChanged => {
                if self.handle.is_some() {
                    self.refresh_pending = true;
                }
                Ok(())
            }
            HostEvent::LayoutReady => {
                if std::mem::take(&mut self.refresh_pending) {
                    self.refresh_view(self.geometry)
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Applies a callback delivered by the connector.
    ///
    /// Each connect attempt is announced as failed at most once. A rejected
    /// connect call is its own attempt and announces synchronously; a failure
    /// callback only counts while an attempt is in flight
    /// ([`ConnectionState::Connecting`]) and is ignored otherwise.
    ///
    /// 应用连接器投递的回调。
    ///
    /// 每次连接尝试最多通知一次失败。被拒绝的连接调用本身就是一次尝试，并同步通知；
    /// 失败回调仅在有尝试进行中（[`ConnectionState::Connecting`]）时生效，否则被忽略。
    pub fn on_connector_event(&mut self, event: ConnectorEvent) {
        match event {
            ConnectorEvent::Log(record) => self.forward_log(&record),
            ConnectorEvent::NetworkInterface(event) => self.log_network_interface(&event),
            event if self.handle.is_none() => {
                debug!(view_id = %self.view_id(), ?event, "No connector, ignoring callback");
            }
            ConnectorEvent::Success => {
                if self.state == ConnectionState::Connected {
                    debug!(view_id = %self.view_id(), "Duplicate connect success ignored");
                    return;
                }
                info!(view_id = %self.view_id(), "Successfully connected");
                // Rendered output is attached before the host hears about the connection.
                if let Err(e) = self.refresh_view(self.geometry) {
                    warn!(view_id = %self.view_id(), error = %e, "Refresh on connect failed");
                }
                self.transition(ConnectionState::Connected, ConnectionEvent::Started);
            }
            ConnectorEvent::Failure(reason) => {
                if self.state != ConnectionState::Connecting {
                    debug!(
                        view_id = %self.view_id(),
                        %reason,
                        state = ?self.state,
                        "Failure callback without an attempt in flight ignored"
                    );
                    return;
                }
                warn!(view_id = %self.view_id(), %reason, "Connection attempt failed");
                self.transition(
                    ConnectionState::ConnectionFailure,
                    ConnectionEvent::Failed(reason.to_string()),
                );
            }
            ConnectorEvent::Disconnected(reason) => {
                if !matches!(
                    self.state,
                    ConnectionState::Connected | ConnectionState::Connecting
                ) {
                    debug!(view_id = %self.view_id(), ?reason, state = ?self.state, "Disconnect callback ignored");
                    return;
                }
                let next = if reason.is_expected() {
                    info!(view_id = %self.view_id(), ?reason, "Successfully disconnected");
                    ConnectionState::Disconnected
                } else {
                    warn!(view_id = %self.view_id(), ?reason, "Unexpected disconnection");
                    ConnectionState::DisconnectedUnexpected
                };
                self.transition(next, ConnectionEvent::Ended);
            }
        }
    }

    /// Runs a host command.
    ///
    /// 执行一个宿主命令。
    pub fn execute(&mut self, command: Command) -> Result<()> {
        debug!(view_id = %self.view_id(), %command, "Executing command");
        match command {
            Command::Connect => self.connect(),
            Command::CleanUp => {
                self.on_host_destroyed();
                Ok(())
            }
            Command::ToggleCameraOn => self.toggle_camera_privacy(),
            Command::ToggleMicrophoneOn => self.toggle_microphone_privacy(),
            Command::SwitchCamera => self.switch_camera(),
            Command::RefreshUi => self.refresh_view(self.geometry),
            Command::Disconnect => self.disconnect(),
        }
    }

    /// Applies a property. Takes effect on the next connect or view refresh.
    ///
    /// 应用一个属性。在下一次连接或视图刷新时生效。
    pub fn apply_property(&mut self, property: Property) {
        trace!(view_id = %self.view_id(), ?property, "Property set");
        match property {
            Property::Height(height) => self.geometry.height = height,
            Property::Width(width) => self.geometry.width = width,
            Property::Token(token) => self.params.token = token,
            Property::Host(host) => self.params.host = host,
            Property::DisplayName(name) => self.params.display_name = name,
            Property::ResourceId(room) => self.params.room_identifier = room,
        }
    }

    fn transition(&mut self, next: ConnectionState, event: ConnectionEvent) {
        info!(view_id = %self.view_id(), from = ?self.state, to = ?next, "Connection state updated");
        self.state = next;
        self.emitter.emit(event);
    }

    fn constructed_handle(&mut self) -> Result<&mut ConnectorHandle<L::Connector>> {
        match (self.phase, self.handle.as_mut()) {
            (_, Some(handle)) => Ok(handle),
            (Phase::Terminated, None) => Err(Error::Terminated),
            (_, None) => Err(Error::NotConstructed),
        }
    }

    fn forward_log(&self, record: &LogRecord) {
        let view_id = self.view_id();
        let category = record.category.as_str();
        match record.level {
            LogLevel::Debug => {
                debug!(target: "connector_client", %view_id, category, "{}", record.message)
            }
            LogLevel::Info => {
                info!(target: "connector_client", %view_id, category, "{}", record.message)
            }
            LogLevel::Warning => {
                warn!(target: "connector_client", %view_id, category, "{}", record.message)
            }
            LogLevel::Error => {
                error!(target: "connector_client", %view_id, category, "{}", record.message)
            }
        }
    }

    fn log_network_interface(&self, event: &NetworkInterfaceEvent) {
        let (change, interface) = match event {
            NetworkInterfaceEvent::Added(i) => ("added", i),
            NetworkInterfaceEvent::Removed(i) => ("removed", i),
            NetworkInterfaceEvent::Selected(i, _) => ("selected", i),
            NetworkInterfaceEvent::StateUpdated(i, _) => ("state updated", i),
        };
        debug!(
            view_id = %self.view_id(),
            change,
            name = %interface.name,
            address = %interface.address,
            interface_type = %interface.interface_type,
            family = %interface.family,
            detail = ?event,
            "Network interface event"
        );
    }
}
