//! Exclusive ownership of a constructed connector.
//!
//! 对已构造连接器的独占所有权。

use super::{
    event::CallbackSink,
    traits::{Connector, ConnectorMode, RenderTarget},
};
use crate::params::{ConnectionParameters, ViewportGeometry};
use tracing::debug;

/// Owns a constructed connector for as long as it is enabled.
///
/// [`ConnectorHandle::disable`] consumes the handle, so a released connector
/// can never be reached again. A handle dropped without being disabled
/// disables its connector on drop.
///
/// 在连接器启用期间拥有它。
///
/// [`ConnectorHandle::disable`] 会消耗句柄，因此已释放的连接器永远无法再被访问。
/// 未禁用就被丢弃的句柄会在丢弃时禁用其连接器。
pub struct ConnectorHandle<C: Connector> {
    connector: C,
    target: RenderTarget,
    disabled: bool,
}

impl<C: Connector> ConnectorHandle<C> {
    pub fn new(connector: C, target: RenderTarget) -> Self {
        Self {
            connector,
            target,
            disabled: false,
        }
    }

    /// Registers the network-interface and log listeners. Returns whether each
    /// registration succeeded, in that order.
    ///
    /// 注册网络接口和日志监听器。按顺序返回每次注册是否成功。
    pub fn register_listeners(&mut self, sink: &CallbackSink, log_filter: &str) -> (bool, bool) {
        let network = self
            .connector
            .register_network_interface_listener(sink.clone());
        let log = self.connector.register_log_listener(sink.clone(), log_filter);
        (network, log)
    }

    pub fn connect(&mut self, params: &ConnectionParameters, sink: &CallbackSink) -> bool {
        self.connector.connect(params, sink.clone())
    }

    pub fn disconnect(&mut self) {
        self.connector.disconnect();
    }

    pub fn set_mode(&mut self, mode: ConnectorMode) {
        self.connector.set_mode(mode);
    }

    pub fn set_camera_privacy(&mut self, privacy: bool) -> bool {
        self.connector.set_camera_privacy(privacy)
    }

    pub fn set_microphone_privacy(&mut self, privacy: bool) -> bool {
        self.connector.set_microphone_privacy(privacy)
    }

    pub fn cycle_camera(&mut self) {
        self.connector.cycle_camera();
    }

    /// Attaches the rendered output to the target at the origin with the given size.
    /// 以给定尺寸将渲染输出附加到目标的原点。
    pub fn show_view(&mut self, geometry: ViewportGeometry) {
        self.connector
            .show_view_at(self.target, 0, 0, geometry.width, geometry.height);
    }

    /// Disables the connector and releases the handle.
    /// 禁用连接器并释放句柄。
    pub fn disable(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if !self.disabled {
            self.disabled = true;
            self.connector.disable();
            debug!(render_target = %self.target, "Connector disabled");
        }
    }
}

impl<C: Connector> Drop for ConnectorHandle<C> {
    fn drop(&mut self) {
        self.release();
    }
}
