//! Commands sent to the controller actor.

use super::state::ControllerSnapshot;
use crate::{
    error::Result,
    surface::{Command, Property},
};
use tokio::sync::oneshot;

/// Commands sent to the `ControllerActor`.
///
/// Host lifecycle notifications and connector callbacks travel on their own
/// channels; this one carries requests that expect a reply.
///
/// 发送到 `ControllerActor` 的命令。
///
/// 宿主生命周期通知和连接器回调走各自的通道；此通道承载需要回复的请求。
#[derive(Debug)]
pub enum ControllerCommand {
    /// Run a surface command.
    /// 执行一个接口命令。
    Execute {
        command: Command,
        response_tx: oneshot::Sender<Result<()>>,
    },
    /// Apply a property setter.
    /// 应用一个属性设置。
    SetProperty {
        property: Property,
        response_tx: oneshot::Sender<Result<()>>,
    },
    /// Report the controller's current state.
    /// 报告控制器的当前状态。
    Snapshot {
        response_tx: oneshot::Sender<ControllerSnapshot>,
    },
}
