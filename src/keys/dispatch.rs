use std::collections::HashMap;

use super::action::{Action, ActionArg, Context};
use super::bindings::KeyBindings;

/// A handler for one `(context, action)` pair
pub type Handler<T> = fn(&mut T, ActionArg);

/// Routes a key name to the handler bound to it in a context.
///
/// The `(context, key)` index is built once from a [`KeyBindings`] table.
/// A context with no binding for a key defers to its parent context.
pub struct Dispatcher<T> {
    index: HashMap<Context, HashMap<String, (Action, ActionArg)>>,
    handlers: HashMap<(Context, Action), Handler<T>>,
}

impl<T> Dispatcher<T> {
    pub fn new(bindings: &KeyBindings) -> Self {
        let mut index: HashMap<Context, HashMap<String, (Action, ActionArg)>> = HashMap::new();
        for (name, binding) in bindings.iter() {
            for &(context, action, arg) in binding.targets {
                let keys = index.entry(context).or_default();
                for key in &binding.keys {
                    match keys.get(key) {
                        Some((existing, _)) => log::warn!(
                            "key '{}' in {} already bound to {:?}, ignoring for {}",
                            key,
                            context.name(),
                            existing,
                            name
                        ),
                        None => {
                            keys.insert(key.clone(), (action, arg));
                        }
                    }
                }
            }
        }
        Dispatcher {
            index,
            handlers: HashMap::new(),
        }
    }

    pub fn register(&mut self, context: Context, action: Action, handler: Handler<T>) {
        self.handlers.insert((context, action), handler);
    }

    /// Builder form of [`register`](Self::register)
    pub fn on(mut self, context: Context, action: Action, handler: Handler<T>) -> Self {
        self.register(context, action, handler);
        self
    }

    /// The binding `key` triggers in `context`, with the context it was found
    /// in after walking the fallback chain
    pub fn resolve(&self, key: &str, context: Context) -> Option<(Context, Action, ActionArg)> {
        context.chain().find_map(|ctx| {
            self.index
                .get(&ctx)
                .and_then(|keys| keys.get(key))
                .map(|&(action, arg)| (ctx, action, arg))
        })
    }

    /// Invoke the handler for `key` in `context`. Returns whether the key was
    /// consumed.
    pub fn dispatch(&self, target: &mut T, key: &str, context: Context) -> bool {
        let Some((found_in, action, arg)) = self.resolve(key, context) else {
            return false;
        };
        match self.handlers.get(&(found_in, action)) {
            Some(handler) => {
                log::debug!("{} in {}: {:?}", key, found_in.name(), action);
                handler(target, arg);
                true
            }
            None => {
                log::debug!(
                    "{} in {}: {:?} has no handler",
                    key,
                    found_in.name(),
                    action
                );
                false
            }
        }
    }
}
