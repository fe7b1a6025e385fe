//! # Navigation Framework
//!
//! Maps fragment paths onto a tree of lazily created view components.
//!
//! ```text
//!   Router ──Route──▶ root.go
//!                        │
//!                     Select ── consumes "modules" ──▶ ModulesTab.go
//!                                                        │
//!                                                     Select ── "foo" ──▶ ...
//! ```
//!
//! Nothing here knows about the registry beyond [`treeview`], which renders
//! dependency trees. Concrete tabs live in `crate::app`; frontends consume
//! the rendered [`dom::Element`] tree.
//!
//! ## Modules
//!
//! - [`route`]: cursor over path segments, route events
//! - [`component`]: the `Component` capability trait and lifecycle
//! - [`select`]: tab sets, lazy installation, deferred selection
//! - [`tab_base`]: select + navigation menu
//! - [`router`]: history and dispatch
//! - [`search`]: search providers and index

pub mod component;
pub mod dom;
pub mod route;
pub mod router;
pub mod search;
pub mod select;
pub mod tab_base;
pub mod treeview;

pub use component::{Component, ComponentBase, ComponentId, Env, Key, UiError};
pub use dom::Element;
pub use route::{Route, RouteEvent, RouteEventKind};
pub use router::Router;
pub use select::{LazyOutcome, Select};
pub use tab_base::TabBase;
