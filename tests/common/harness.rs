//! tests/common/harness.rs
#![allow(dead_code)]

use connector_lifecycle::config::{Config, ConnectorConfig};
use connector_lifecycle::connector::{
    CallbackSink, ConstructError, Connector, ConnectorLibrary, ConnectorMode, RenderTarget,
};
use connector_lifecycle::controller::{ControllerSnapshot, Phase};
use connector_lifecycle::emitter::{EventPayload, ViewId};
use connector_lifecycle::lifecycle::{LifecycleBroadcaster, LifecycleSource};
use connector_lifecycle::params::ConnectionParameters;
use connector_lifecycle::surface::Property;
use connector_lifecycle::{ComponentContext, ConnectionState, ControllerHandle, EventListener};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tracing_subscriber::fmt::format::FmtSpan;

pub const VIEW: ViewId = ViewId(42);
pub const TARGET: RenderTarget = RenderTarget(0x1000);

/// Initializes tracing for tests, ensuring it's only done once.
pub fn init_tracing() {
    static TRACING_INIT: Once = Once::new();
    TRACING_INIT.call_once(|| {
        let filter = std::env::var("RUST_LOG")
            .unwrap_or_else(|_| "connector_lifecycle=debug,connector_client=info".to_string());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .with_test_writer()
            .init();
    });
}

/// One observable interaction with the connector library or the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    InitializeClient,
    Construct,
    Connect(String),
    Disconnect,
    SetMode(ConnectorMode),
    SetCameraPrivacy(bool),
    CycleCamera,
    ShowViewAt(u32, u32),
    Disable,
    UninitializeClient,
    Emitted(ViewId, &'static str, String),
}

#[derive(Debug, Clone)]
pub struct Behaviour {
    pub init_ok: bool,
    pub connect_ok: bool,
    pub camera_privacy_ok: bool,
}

impl Default for Behaviour {
    fn default() -> Self {
        Self {
            init_ok: true,
            connect_ok: true,
            camera_privacy_ok: true,
        }
    }
}

/// An ordered record shared by the recording library, its connector and the
/// recording listener.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    calls: Arc<Mutex<Vec<Call>>>,
    behaviour: Arc<Mutex<Behaviour>>,
    sink: Arc<Mutex<Option<CallbackSink>>>,
}

impl Journal {
    pub fn with_behaviour(behaviour: Behaviour) -> Self {
        let journal = Self::default();
        *journal.behaviour.lock().unwrap() = behaviour;
        journal
    }

    pub fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, call: &Call) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| *c == call).count()
    }

    pub fn connects(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, Call::Connect(_)))
            .count()
    }

    pub fn emitted(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, Call::Emitted(..)))
            .cloned()
            .collect()
    }

    pub fn behaviour(&self) -> Behaviour {
        self.behaviour.lock().unwrap().clone()
    }

    /// The callback sink the connector was handed on its last connect.
    pub fn sink(&self) -> CallbackSink {
        self.sink
            .lock()
            .unwrap()
            .clone()
            .expect("connector was never asked to connect")
    }
}

pub struct RecordingLibrary {
    journal: Journal,
}

impl RecordingLibrary {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
        }
    }
}

impl ConnectorLibrary for RecordingLibrary {
    type Connector = RecordingConnector;

    fn initialize_client(&mut self) -> bool {
        self.journal.push(Call::InitializeClient);
        self.journal.behaviour().init_ok
    }

    fn construct(
        &mut self,
        _target: RenderTarget,
        _config: &ConnectorConfig,
    ) -> Result<RecordingConnector, ConstructError> {
        self.journal.push(Call::Construct);
        Ok(RecordingConnector {
            journal: self.journal.clone(),
        })
    }

    fn uninitialize_client(&mut self) {
        self.journal.push(Call::UninitializeClient);
    }
}

pub struct RecordingConnector {
    journal: Journal,
}

impl Connector for RecordingConnector {
    fn register_network_interface_listener(&mut self, _sink: CallbackSink) -> bool {
        true
    }

    fn register_log_listener(&mut self, _sink: CallbackSink, _filter: &str) -> bool {
        true
    }

    fn connect(&mut self, params: &ConnectionParameters, sink: CallbackSink) -> bool {
        self.journal
            .push(Call::Connect(params.room_identifier.clone()));
        *self.journal.sink.lock().unwrap() = Some(sink);
        self.journal.behaviour().connect_ok
    }

    fn disconnect(&mut self) {
        self.journal.push(Call::Disconnect);
    }

    fn set_mode(&mut self, mode: ConnectorMode) {
        self.journal.push(Call::SetMode(mode));
    }

    fn set_camera_privacy(&mut self, privacy: bool) -> bool {
        self.journal.push(Call::SetCameraPrivacy(privacy));
        self.journal.behaviour().camera_privacy_ok
    }

    fn set_microphone_privacy(&mut self, _privacy: bool) -> bool {
        true
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

pub struct RecordingListener {
    journal: Journal,
}

impl EventListener for RecordingListener {
    fn receive_event(&self, view_id: ViewId, _topic: &str, payload: EventPayload) {
        self.journal
            .push(Call::Emitted(view_id, payload.event, payload.message));
    }
}

/// A spawned controller wired to a recording library, a recording listener
/// and a lifecycle broadcaster.
pub struct TestComponent {
    pub handle: ControllerHandle,
    pub journal: Journal,
    pub lifecycle: Arc<LifecycleBroadcaster>,
    pub listener: Arc<dyn EventListener>,
}

impl TestComponent {
    pub fn spawn() -> Self {
        Self::spawn_with(Behaviour::default())
    }

    pub fn spawn_with(behaviour: Behaviour) -> Self {
        init_tracing();
        let journal = Journal::with_behaviour(behaviour);
        let listener: Arc<dyn EventListener> = Arc::new(RecordingListener {
            journal: journal.clone(),
        });
        let lifecycle = Arc::new(LifecycleBroadcaster::new());
        let source: Arc<dyn LifecycleSource> = lifecycle.clone();
        let handle = ControllerHandle::spawn(
            RecordingLibrary::new(&journal),
            Arc::new(Config::default()),
            ComponentContext {
                view_id: VIEW,
                render_target: TARGET,
                listener: Arc::downgrade(&listener),
                lifecycle: Some(source),
            },
        );
        Self {
            handle,
            journal,
            lifecycle,
            listener,
        }
    }

    pub async fn set_params(&self, room: &str) {
        for property in [
            Property::Host("prod.example.net".into()),
            Property::Token("tok".into()),
            Property::DisplayName("Ada".into()),
            Property::ResourceId(room.into()),
            Property::Width(640),
            Property::Height(360),
        ] {
            self.handle.set_property(property).await.unwrap();
        }
    }

    pub async fn snapshot(&self) -> ControllerSnapshot {
        self.handle.snapshot().await.unwrap()
    }

    /// Waits until the controller reports `state`, failing after a second.
    pub async fn wait_for_state(&self, state: ConnectionState) -> ControllerSnapshot {
        tokio::time::timeout(Duration::from_secs(1), async {
            loop {
                let snapshot = self.snapshot().await;
                if snapshot.connection_state == state {
                    return snapshot;
                }
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("controller never reached {state:?}"))
    }

    /// Resumes the host and sets valid parameters, leaving a constructed,
    /// disconnected controller.
    pub async fn constructed(behaviour: Behaviour) -> Self {
        let component = Self::spawn_with(behaviour);
        component.set_params("demoRoom").await;
        assert_eq!(
            component.lifecycle.publish(connector_lifecycle::lifecycle::HostEvent::Resume),
            1
        );
        let snapshot = component.snapshot().await;
        assert_eq!(snapshot.phase, Phase::Constructed);
        component
    }

    /// A constructed controller whose connect succeeded.
    pub async fn connected() -> Self {
        let component = Self::constructed(Behaviour::default()).await;
        component.handle.connect().await.unwrap();
        component.journal.sink().on_success();
        component.wait_for_state(ConnectionState::Connected).await;
        component
    }
}
