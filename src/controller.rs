//! The connection lifecycle controller: the state machine, the actor that
//! drives it, and the handle the host talks to.
mod actor;
pub mod command;
pub mod handle;
pub mod machine;
pub mod state;

pub use command::ControllerCommand;
pub use handle::{ComponentContext, ControllerHandle};
pub use machine::LifecycleController;
pub use state::{ConnectionState, ControllerSnapshot, Phase};
