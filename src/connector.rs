//! The capability interface over the third-party connector library, the
//! callback channel it reports on, and the owning handle wrapper.
//!
//! 第三方连接器库的能力接口、其回调通道以及拥有所有权的句柄封装。
pub mod event;
pub mod handle;
pub mod traits;

pub use event::{
    CallbackQueues, CallbackSink, ConnectFailReason, ConnectorEvent, DisconnectReason, InterfaceState, LogLevel,
    LogRecord, NetworkInterface, NetworkInterfaceEvent, TransportType,
};
pub use handle::ConnectorHandle;
pub use traits::{
    ConstructError, Connector, ConnectorLibrary, ConnectorMode, RenderTarget, ViewStyle,
};
