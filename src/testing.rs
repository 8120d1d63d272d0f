//! 测试辅助工具模块
//! Test utilities module

#![cfg(test)]

use crate::config::{Config, ConnectorConfig};
use crate::connector::{
    CallbackQueues, CallbackSink, ConnectorEvent, ConstructError, Connector, ConnectorLibrary, ConnectorMode,
    RenderTarget,
};
use crate::controller::LifecycleController;
use crate::emitter::{EventEmitter, EventListener, EventPayload, ViewId};
use crate::params::ConnectionParameters;
use std::sync::{Arc, Mutex, MutexGuard};

pub const TEST_VIEW: ViewId = ViewId(11);
pub const TEST_TARGET: RenderTarget = RenderTarget(0xbeef);

/// One observable interaction, either with the connector library or with the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    InitializeClient,
    Construct,
    RegisterNetworkListener,
    RegisterLogListener,
    Connect(String),
    Disconnect,
    SetMode(ConnectorMode),
    SetCameraPrivacy(bool),
    SetMicrophonePrivacy(bool),
    CycleCamera,
    ShowViewAt(u32, u32),
    Disable,
    UninitializeClient,
    Emitted(ViewId, &'static str, String),
}

/// What the mock library answers. Shared, so tests can flip answers after the
/// library has been handed to a controller.
#[derive(Debug, Clone)]
pub struct Behaviour {
    pub init_ok: bool,
    pub construct_ok: bool,
    pub connect_ok: bool,
    pub camera_privacy_ok: bool,
    pub microphone_privacy_ok: bool,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            init_ok: true,
            construct_ok: true,
            connect_ok: true,
            camera_privacy_ok: true,
            microphone_privacy_ok: true,
        }
    }
}

/// A shared, ordered record of every [`Call`].
#[derive(Debug, Clone, Default)]
pub struct Journal {
    calls: Arc<Mutex<Vec<Call>>>,
    behaviour: Arc<Mutex<Behaviour>>,
    last_sink: Arc<Mutex<Option<CallbackSink>>>,
}

impl Journal {
    fn lock(&self) -> MutexGuard<'_, Vec<Call>> {
        self.calls.lock().unwrap()
    }

    pub fn push(&self, call: Call) {
        self.lock().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.lock().iter().filter(|c| *c == call).count()
    }

    pub fn count_connects(&self) -> usize {
        self.lock()
            .iter()
            .filter(|c| matches!(c, Call::Connect(_)))
            .count()
    }

    pub fn emitted(&self) -> Vec<(&'static str, String)> {
        self.lock()
            .iter()
            .filter_map(|c| match c {
                Call::Emitted(_, name, message) => Some((*name, message.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn behaviour(&self) -> MutexGuard<'_, Behaviour> {
        self.behaviour.lock().unwrap()
    }

    fn answer(&self, pick: impl Fn(&Behaviour) -> bool) -> bool {
        pick(&self.behaviour())
    }

    /// The sink handed to the connector's last `connect`.
    pub fn last_sink(&self) -> Option<CallbackSink> {
        self.last_sink.lock().unwrap().clone()
    }
}

pub struct MockLibrary {
    journal: Journal,
}

impl MockLibrary {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
        }
    }
}

impl ConnectorLibrary for MockLibrary {
    type Connector = MockConnector;

    fn initialize_client(&mut self) -> bool {
        self.journal.push(Call::InitializeClient);
        self.journal.answer(|b| b.init_ok)
    }

    fn construct(
        &mut self,
        _target: RenderTarget,
        _config: &ConnectorConfig,
    ) -> Result<MockConnector, ConstructError> {
        self.journal.push(Call::Construct);
        if self.journal.answer(|b| b.construct_ok) {
            Ok(MockConnector {
                journal: self.journal.clone(),
            })
        } else {
            Err(ConstructError("no render surface".into()))
        }
    }

    fn uninitialize_client(&mut self) {
        self.journal.push(Call::UninitializeClient);
    }
}

pub struct MockConnector {
    journal: Journal,
}

impl Connector for MockConnector {
    fn register_network_interface_listener(&mut self, _sink: CallbackSink) -> bool {
        self.journal.push(Call::RegisterNetworkListener);
        true
    }

    fn register_log_listener(&mut self, _sink: CallbackSink, _filter: &str) -> bool {
        self.journal.push(Call::RegisterLogListener);
        true
    }

    fn connect(&mut self, params: &ConnectionParameters, sink: CallbackSink) -> bool {
        self.journal.push(Call::Connect(params.room_identifier.clone()));
        *self.journal.last_sink.lock().unwrap() = Some(sink);
        self.journal.answer(|b| b.connect_ok)
    }

    fn disconnect(&mut self) {
        self.journal.push(Call::Disconnect);
    }

    fn set_mode(&mut self, mode: ConnectorMode) {
        self.journal.push(Call::SetMode(mode));
    }

    fn set_camera_privacy(&mut self, privacy: bool) -> bool {
        self.journal.push(Call::SetCameraPrivacy(privacy));
        self.journal.answer(|b| b.camera_privacy_ok)
    }

    fn set_microphone_privacy(&mut self, privacy: bool) -> bool {
        self.journal.push(Call::SetMicrophonePrivacy(privacy));
        self.journal.answer(|b| b.microphone_privacy_ok)
    }

    fn cycle_camera(&mut self) {
        self.journal.push(Call::CycleCamera);
    }

    fn show_view_at(&mut self, _target: RenderTarget, _x: i32, _y: i32, width: u32, height: u32) {
        self.journal.push(Call::ShowViewAt(width, height));
    }

    fn disable(&mut self) {
        self.journal.push(Call::Disable);
    }
}

/// An [`EventListener`] that writes into the same journal as the connector,
/// so tests can assert on the interleaving of events and connector calls.
pub struct RecordingListener {
    journal: Journal,
}

impl RecordingListener {
    pub fn new(journal: &Journal) -> Arc<dyn EventListener> {
        Arc::new(Self {
            journal: journal.clone(),
        })
    }
}

impl EventListener for RecordingListener {
    fn receive_event(&self, view_id: ViewId, _topic: &str, payload: EventPayload) {
        self.journal
            .push(Call::Emitted(view_id, payload.event, payload.message));
    }
}

/// A harness for driving a single `LifecycleController` synchronously.
pub struct TestHarness {
    pub controller: LifecycleController<MockLibrary>,
    pub journal: Journal,
    _listener: Arc<dyn EventListener>,
    pub callbacks: CallbackQueues,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_behaviour(Behaviour::default())
    }

    pub fn with_behaviour(behaviour: Behaviour) -> Self {
        let journal = Journal::default();
        *journal.behaviour() = behaviour;
        let listener = RecordingListener::new(&journal);
        let config = Arc::new(Config::default());
        let emitter = EventEmitter::new(
            TEST_VIEW,
            config.controller.event_topic.clone(),
            Arc::downgrade(&listener),
        );
        let (sink, callbacks) = CallbackSink::channel(config.controller.diagnostics_capacity);
        let controller =
            LifecycleController::new(MockLibrary::new(&journal), config, TEST_TARGET, emitter, sink);
        Self {
            controller,
            journal,
            _listener: listener,
            callbacks,
        }
    }

    /// Initializes, becomes active and sets valid connection parameters.
    pub fn constructed() -> Self {
        let mut harness = Self::new();
        harness.controller.initialize().unwrap();
        harness.controller.on_host_became_active().unwrap();
        harness.set_room("demoRoom");
        harness
    }

    /// A constructed controller that has received its connect success callback.
    pub fn connected() -> Self {
        let mut harness = Self::constructed();
        harness.controller.connect().unwrap();
        harness.deliver(ConnectorEvent::Success);
        harness
    }

    pub fn set_room(&mut self, room: &str) {
        use crate::surface::Property;
        self.controller
            .apply_property(Property::Host("prod.example.net".into()));
        self.controller.apply_property(Property::Token("tok".into()));
        self.controller
            .apply_property(Property::DisplayName("Ada".into()));
        self.controller
            .apply_property(Property::ResourceId(room.into()));
    }

    /// Feeds a connector callback to the controller, as the actor would.
    pub fn deliver(&mut self, event: ConnectorEvent) {
        self.controller.on_connector_event(event);
    }

    /// Delivers every callback the connector pushed through its sink.
    pub fn drain_callbacks(&mut self) {
        while let Ok(event) = self.callbacks.outcomes.try_recv() {
            self.controller.on_connector_event(event);
        }
        while let Ok(event) = self.callbacks.diagnostics.try_recv() {
            self.controller.on_connector_event(event);
        }
    }
}
