//! The command and property surface a host framework drives a component through.
//!
//! 宿主框架驱动组件所用的命令和属性接口。

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A command the host dispatches to a component.
///
/// 宿主分派给组件的命令。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Connect,
    /// Full teardown: disconnect if connected, release the connector and
    /// uninitialize the client.
    ///
    /// 完全拆除：如已连接则断开，释放连接器并反初始化客户端。
    CleanUp,
    ToggleCameraOn,
    ToggleMicrophoneOn,
    SwitchCamera,
    RefreshUi,
    Disconnect,
}

impl Command {
    pub const ALL: [Command; 7] = [
        Command::Connect,
        Command::CleanUp,
        Command::ToggleCameraOn,
        Command::ToggleMicrophoneOn,
        Command::SwitchCamera,
        Command::RefreshUi,
        Command::Disconnect,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::Connect => "connect",
            Command::CleanUp => "cleanUp",
            Command::ToggleCameraOn => "toggleCameraOn",
            Command::ToggleMicrophoneOn => "toggleMicrophoneOn",
            Command::SwitchCamera => "switchCamera",
            Command::RefreshUi => "refreshUI",
            Command::Disconnect => "disconnect",
        }
    }

    /// The numeric id used by hosts that dispatch commands by number.
    /// 按编号分派命令的宿主所用的数字ID。
    pub fn id(self) -> u32 {
        match self {
            Command::Connect => 1,
            Command::CleanUp => 2,
            Command::ToggleCameraOn => 3,
            Command::ToggleMicrophoneOn => 4,
            Command::SwitchCamera => 5,
            Command::RefreshUi => 6,
            Command::Disconnect => 7,
        }
    }

    pub fn from_id(id: u32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|command| command.id() == id)
            .ok_or_else(|| Error::UnsupportedCommand(id.to_string()))
    }
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|command| command.name() == name)
            .ok_or_else(|| Error::UnsupportedCommand(name.to_string()))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A raw property value as the host framework hands it over.
///
/// 宿主框架传入的原始属性值。
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
    Number(f64),
    Text(String),
}

/// A typed property setter.
///
/// 类型化的属性设置器。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Property {
    Height(u32),
    Width(u32),
    Token(String),
    Host(String),
    DisplayName(String),
    ResourceId(String),
}

impl Property {
    /// Parses a named property. Unknown names and values of the wrong kind
    /// are integration errors.
    ///
    /// 解析具名属性。未知名称和类型错误的值属于集成错误。
    pub fn from_raw(name: &str, value: PropValue) -> Result<Self> {
        match (name, value) {
            ("height", PropValue::Number(n)) => Ok(Property::Height(dimension(name, n)?)),
            ("width", PropValue::Number(n)) => Ok(Property::Width(dimension(name, n)?)),
            ("token", PropValue::Text(s)) => Ok(Property::Token(s)),
            ("host", PropValue::Text(s)) => Ok(Property::Host(s)),
            ("displayName", PropValue::Text(s)) => Ok(Property::DisplayName(s)),
            ("resourceId", PropValue::Text(s)) => Ok(Property::ResourceId(s)),
            (name, value) => Err(Error::UnsupportedProperty(format!("{name}={value:?}"))),
        }
    }
}

fn dimension(name: &str, n: f64) -> Result<u32> {
    if !n.is_finite() || n < 0.0 || n > f64::from(u32::MAX) {
        return Err(Error::UnsupportedProperty(format!("{name}={n}")));
    }
    Ok(n.round() as u32)
}
