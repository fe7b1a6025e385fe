//! # Actions
//!
//! Everything that can happen to the browser becomes an `Action`.
//! User presses a key? That's `Action::Key(key)`.
//! Symbols fetch settles? That's `Action::SymbolsLoaded(registry)`.
//!
//! The `update()` function applies an action to the [`App`] and returns
//! the side effect the frontend must perform. No I/O happens here.
//!
//! ```text
//! App + Action  →  update()  →  Effect
//! ```

use std::sync::Arc;

use log::{debug, error};

use crate::app::{Activation, App};
use crate::registry::Registry;
use crate::ui::component::Key;
use crate::ui::dom::Element;

#[derive(Debug, Clone)]
pub enum Action {
    Key(Key),
    Navigate(String),
    Back,
    Forward,
    /// The user clicked / pressed Enter on a rendered element.
    Activate(Element),
    /// The secondary fetch finished; carries the decorated registry, or
    /// the plain one if symbols were unavailable.
    SymbolsLoaded(Arc<Registry>),
    Quit,
}

/// Work the frontend carries out after `update`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Copy(String),
    OpenExternal(String),
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    let result = match action {
        Action::Key(key) => match app.handle_key(key) {
            Ok(true) => Ok(Effect::None),
            Ok(false) if key == Key::Char('q') => Ok(Effect::Quit),
            Ok(false) => Ok(Effect::None),
            Err(e) => Err(e),
        },
        Action::Navigate(location) => app.navigate(&location).map(|_| Effect::None),
        Action::Back => app.back().map(|_| Effect::None),
        Action::Forward => app.forward().map(|_| Effect::None),
        Action::Activate(el) => app.activate(&el).map(|activation| match activation {
            Activation::Copy(text) => Effect::Copy(text),
            Activation::External(url) => Effect::OpenExternal(url),
            Activation::Navigated | Activation::Toggled | Activation::None => Effect::None,
        }),
        Action::SymbolsLoaded(registry) => app.symbols_loaded(registry).map(|_| Effect::None),
        Action::Quit => Ok(Effect::Quit),
    };
    result.unwrap_or_else(|e| {
        error!("update failed: {e}");
        Effect::None
    })
}
