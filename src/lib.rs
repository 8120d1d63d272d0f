#![deny(clippy::expect_used, clippy::unwrap_used)]

//! A lifecycle controller that exposes a third-party video-conferencing
//! connector as a host UI component.
//! 将第三方视频会议连接器暴露为宿主UI组件的生命周期控制器。

pub mod config;
pub mod connector;
pub mod controller;
pub mod emitter;
pub mod error;
pub mod lifecycle;
pub mod params;
pub mod registry;
pub mod surface;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use controller::{ComponentContext, ConnectionState, ControllerHandle, Phase};
pub use emitter::{ConnectionEvent, EventListener, ViewId};
pub use error::{Error, Result};
pub use registry::ComponentRegistry;
