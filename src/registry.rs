//! The view manager: creates a controller per host view and routes commands
//! and properties to it by view id.
//!
//! 视图管理器：为每个宿主视图创建控制器，并按视图ID将命令和属性路由给它。

use crate::{
    config::Config,
    connector::{ConnectorLibrary, RenderTarget},
    controller::{ComponentContext, ControllerHandle},
    emitter::{EventListener, ViewId},
    error::{Error, Result},
    lifecycle::LifecycleSource,
    surface::{Command, PropValue, Property},
};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Creates and tracks one controller per host view.
///
/// `factory` builds a fresh connector library for each view.
///
/// 为每个宿主视图创建并跟踪一个控制器。
///
/// `factory` 为每个视图构建一个新的连接器库。
pub struct ComponentRegistry<L, F>
where
    L: ConnectorLibrary,
    F: Fn(ViewId) -> L + Send + Sync,
{
    factory: F,
    config: Arc<Config>,
    listener: Arc<dyn EventListener>,
    lifecycle: Arc<dyn LifecycleSource>,
    views: DashMap<ViewId, ControllerHandle>,
}

impl<L, F> ComponentRegistry<L, F>
where
    L: ConnectorLibrary,
    F: Fn(ViewId) -> L + Send + Sync,
{
    pub fn new(
        factory: F,
        config: Arc<Config>,
        listener: Arc<dyn EventListener>,
        lifecycle: Arc<dyn LifecycleSource>,
    ) -> Self {
        Self {
            factory,
            config,
            listener,
            lifecycle,
            views: DashMap::new(),
        }
    }

    /// The name the component is registered under with the host.
    pub fn name(&self) -> &str {
        &self.config.component_name
    }

    /// The command name to numeric id table advertised to the host.
    /// 向宿主公布的命令名称到数字ID的映射表。
    pub fn commands_map(&self) -> Vec<(&'static str, u32)> {
        Command::ALL
            .into_iter()
            .map(|command| (command.name(), command.id()))
            .collect()
    }

    /// Creates the controller for a new view. A view id that is already in
    /// use has its previous controller replaced; the old one is torn down
    /// when its last handle goes away.
    ///
    /// 为新视图创建控制器。已在使用的视图ID会替换其先前的控制器；
    /// 旧控制器在其最后一个句柄消失时被拆除。
    pub fn create_view(&self, view_id: ViewId, render_target: RenderTarget) -> ControllerHandle {
        let context = ComponentContext {
            view_id,
            render_target,
            listener: Arc::downgrade(&self.listener),
            lifecycle: Some(Arc::clone(&self.lifecycle)),
        };
        let handle = ControllerHandle::spawn((self.factory)(view_id), Arc::clone(&self.config), context);
        if self.views.insert(view_id, handle.clone()).is_some() {
            warn!(%view_id, "Replaced existing controller for view");
        }
        info!(%view_id, component = self.name(), "View created");
        handle
    }

    pub fn handle(&self, view_id: ViewId) -> Result<ControllerHandle> {
        self.views
            .get(&view_id)
            .map(|entry| entry.value().clone())
            .ok_or(Error::UnknownView(view_id.0))
    }

    pub fn view_count(&self) -> usize {
        self.views.len()
    }

    /// Dispatches a command by numeric id.
    /// 按数字ID分派命令。
    pub async fn receive_command(&self, view_id: ViewId, command_id: u32) -> Result<()> {
        let command = Command::from_id(command_id)?;
        self.handle(view_id)?.execute(command).await
    }

    /// Dispatches a command by name.
    /// 按名称分派命令。
    pub async fn receive_command_by_name(&self, view_id: ViewId, name: &str) -> Result<()> {
        let command: Command = name.parse()?;
        self.handle(view_id)?.execute(command).await
    }

    pub async fn set_property(&self, view_id: ViewId, name: &str, value: PropValue) -> Result<()> {
        let property = Property::from_raw(name, value)?;
        self.handle(view_id)?.set_property(property).await
    }

    /// Tears down and forgets the controller of a view the host has dropped.
    ///
    /// 拆除并遗忘宿主已丢弃视图的控制器。
    pub async fn drop_view(&self, view_id: ViewId) -> Result<()> {
        let (_, handle) = self
            .views
            .remove(&view_id)
            .ok_or(Error::UnknownView(view_id.0))?;
        handle.clean_up().await?;
        debug!(%view_id, "View dropped");
        Ok(())
    }
}
