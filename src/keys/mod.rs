pub mod action;
pub mod bindings;
pub mod dispatch;
pub mod key_name;

pub use action::{Action, ActionArg, Context};
pub use bindings::{Binding, KeyBindings, default_bindings_toml};
pub use dispatch::{Dispatcher, Handler};
pub use key_name::key_name;
