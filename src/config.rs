//! 定义了组件和连接器的可配置参数。
//! Defines configurable parameters for the component and its connector.

use crate::connector::ViewStyle;
use crate::params::ViewportGeometry;

/// A structure containing all configurable parameters for a component.
///
/// 包含组件所有可配置参数的结构体。
#[derive(Debug, Clone)]
pub struct Config {
    /// The name the component is registered under with the host framework.
    /// 组件在宿主框架中注册的名称。
    pub component_name: String,

    /// Parameters passed through to connector construction.
    /// 传递给连接器构造的参数。
    pub connector: ConnectorConfig,

    /// Parameters of the controller actor itself.
    /// 控制器 actor 自身的参数。
    pub controller: ControllerConfig,
}

/// Parameters passed through to connector construction.
///
/// 传递给连接器构造的参数。
#[derive(Debug, Clone)]
pub struct ConnectorConfig {
    /// How the connector lays out its rendered participants.
    /// 连接器如何布局其渲染的参与者。
    pub view_style: ViewStyle,
    /// Maximum number of remote participants rendered at once.
    /// 同时渲染的远端参与者的最大数量。
    pub remote_participants: u32,
    /// Log filter handed to the connector and to its log listener.
    /// 传递给连接器及其日志监听器的日志过滤器。
    pub log_filter: String,
    /// Log filter for the connector's own log file. Empty disables file logging.
    /// 连接器自身日志文件的过滤器。为空则禁用文件日志。
    pub log_file_filter: String,
    /// Opaque user data forwarded to the connector.
    /// 转发给连接器的不透明用户数据。
    pub user_data: u64,
}

/// Parameters of the controller actor.
///
/// 控制器 actor 的参数。
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Capacity of the bounded host command channel.
    /// 有界宿主命令通道的容量。
    pub command_channel_capacity: usize,
    /// Geometry used until the host sets `width`/`height`.
    /// 在宿主设置 `width`/`height` 之前使用的几何尺寸。
    pub default_viewport: ViewportGeometry,
    /// Topic name outward events are published under.
    /// 对外事件发布所用的主题名。
    pub event_topic: String,
    /// Capacity of the bounded diagnostics queue (connector log records and
    /// network-interface changes). Diagnostics beyond it are dropped.
    /// 有界诊断队列（连接器日志记录和网络接口变化）的容量。超出部分被丢弃。
    pub diagnostics_capacity: usize,
    /// Message carried by a failure event when the connector gives no detail.
    /// 连接器未给出细节时，失败事件携带的消息。
    pub failure_message: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            component_name: "RNTVideo".to_string(),
            connector: ConnectorConfig::default(),
            controller: ControllerConfig::default(),
        }
    }
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            view_style: ViewStyle::Default,
            remote_participants: 15,
            log_filter: "info@Client info@Connector warning".to_string(),
            log_file_filter: String::new(),
            user_data: 0,
        }
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            command_channel_capacity: 128,
            diagnostics_capacity: 256,
            default_viewport: ViewportGeometry::default(),
            event_topic: "topChange".to_string(),
            failure_message: "cannot connect".to_string(),
        }
    }
}
