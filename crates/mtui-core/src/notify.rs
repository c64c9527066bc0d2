#![forbid(unsafe_code)]

//! Notification bus.
//!
//! Every window (and any other interested object) owns a *notifier*. A
//! notifier may have a parent; an event sent to a notifier is delivered to
//! its own observers first and then to each ancestor's observers in turn, so
//! an observer on the root sees everything that happens below it.
//!
//! # Delivery
//!
//! - Synchronous, on the calling thread.
//! - Within one notifier, observers run in registration order.
//! - An observer that fails does not stop delivery; every observer runs and
//!   the failure is logged.
//!
//! Notifiers live in an arena owned by [`NotifyBus`] and are addressed by
//! [`NotifierId`]. Observers receive only the event, never the bus, so they
//! cannot free the emitter while it is being delivered.

use std::fmt;

use bitflags::bitflags;

use crate::event::{MenuId, Op};
use crate::geometry::{StateFlags, WindowId};

/// Handle to a notifier in a [`NotifyBus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NotifierId(pub u32);

/// Handle returned by [`NotifyBus::observer_add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub u64);

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Kind of window event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WindowEventKind {
    /// A window was attached to a parent.
    Add,
    /// A window is about to be freed.
    Delete,
    /// A window's geometry or visibility changed.
    State,
    /// A dialog was shown or hidden by the dialog stack.
    Dialog,
    /// The focused leaf changed.
    Focus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowEvent {
    pub kind: WindowEventKind,
    pub win: WindowId,
    pub flags: StateFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigEventKind {
    Set,
    Reset,
}

/// A configuration option changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ConfigEvent {
    pub kind: ConfigEventKind,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorEventKind {
    Set,
    Reset,
}

/// A colour definition changed. `color` is the numeric colour id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorEvent {
    pub kind: ColorEventKind,
    pub color: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingEventKind {
    Add,
    Delete,
    DeleteAll,
    MacroAdd,
    MacroDelete,
    MacroDeleteAll,
}

/// A key binding or macro changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingEvent {
    pub kind: BindingEventKind,
    pub menu: MenuId,
    /// The key string as the user typed it, if a single key was affected.
    pub key: Option<String>,
    pub op: Op,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PagerEventKind {
    /// The visible part of the pager changed.
    View,
}

/// An event delivered through the bus.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Event {
    Window(WindowEvent),
    Config(ConfigEvent),
    Color(ColorEvent),
    Binding(BindingEvent),
    Pager { kind: PagerEventKind, win: WindowId },
    Resize { cols: u16, rows: u16 },
    Timeout,
}

impl Event {
    /// The type bit this event is filtered by.
    pub fn event_type(&self) -> EventTypes {
        match self {
            Event::Window(_) => EventTypes::WINDOW,
            Event::Config(_) => EventTypes::CONFIG,
            Event::Color(_) => EventTypes::COLOR,
            Event::Binding(_) => EventTypes::BINDING,
            Event::Pager { .. } => EventTypes::PAGER,
            Event::Resize { .. } => EventTypes::RESIZE,
            Event::Timeout => EventTypes::TIMEOUT,
        }
    }
}

bitflags! {
    /// Event types an observer subscribes to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EventTypes: u8 {
        const WINDOW  = 1 << 0;
        const CONFIG  = 1 << 1;
        const COLOR   = 1 << 2;
        const BINDING = 1 << 3;
        const PAGER   = 1 << 4;
        const RESIZE  = 1 << 5;
        const TIMEOUT = 1 << 6;
        const ALL     = 0x7F;
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure reported by an observer callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObserverError {
    message: String,
}

impl ObserverError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ObserverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "observer failed: {}", self.message)
    }
}

impl std::error::Error for ObserverError {}

// ---------------------------------------------------------------------------
// Bus
// ---------------------------------------------------------------------------

/// Observer callback.
pub type ObserverFn = Box<dyn FnMut(&Event) -> Result<(), ObserverError>>;

struct Observer {
    id: ObserverId,
    types: EventTypes,
    callback: ObserverFn,
}

#[derive(Default)]
struct Notifier {
    parent: Option<NotifierId>,
    observers: Vec<Observer>,
}

/// Arena of notifiers.
#[derive(Default)]
pub struct NotifyBus {
    nodes: Vec<Option<Notifier>>,
    free_slots: Vec<u32>,
    next_observer: u64,
}

impl fmt::Debug for NotifyBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotifyBus")
            .field("live", &self.nodes.iter().filter(|n| n.is_some()).count())
            .finish()
    }
}

impl NotifyBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached notifier.
    pub fn create(&mut self) -> NotifierId {
        let node = Some(Notifier::default());
        if let Some(slot) = self.free_slots.pop() {
            self.nodes[slot as usize] = node;
            NotifierId(slot)
        } else {
            self.nodes.push(node);
            NotifierId((self.nodes.len() - 1) as u32)
        }
    }

    /// Free a notifier. Its children become detached roots.
    pub fn free(&mut self, id: NotifierId) {
        let Some(slot) = self.nodes.get_mut(id.0 as usize) else {
            return;
        };
        if slot.take().is_none() {
            return;
        }
        for node in self.nodes.iter_mut().flatten() {
            if node.parent == Some(id) {
                node.parent = None;
            }
        }
        self.free_slots.push(id.0);
    }

    pub fn contains(&self, id: NotifierId) -> bool {
        matches!(self.nodes.get(id.0 as usize), Some(Some(_)))
    }

    /// Re-point a notifier's parent. Returns `false` if `id` is unknown.
    pub fn set_parent(&mut self, id: NotifierId, parent: Option<NotifierId>) -> bool {
        match self.node_mut(id) {
            Some(node) => {
                node.parent = parent;
                true
            }
            None => false,
        }
    }

    pub fn parent(&self, id: NotifierId) -> Option<NotifierId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Register an observer for the given event types.
    pub fn observer_add(
        &mut self,
        id: NotifierId,
        types: EventTypes,
        callback: ObserverFn,
    ) -> Option<ObserverId> {
        let observer_id = ObserverId(self.next_observer);
        let node = self.node_mut(id)?;
        node.observers.push(Observer {
            id: observer_id,
            types,
            callback,
        });
        self.next_observer += 1;
        Some(observer_id)
    }

    /// Remove an observer. Returns `false` if it was not registered here.
    pub fn observer_remove(&mut self, id: NotifierId, observer: ObserverId) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        let before = node.observers.len();
        node.observers.retain(|o| o.id != observer);
        node.observers.len() != before
    }

    pub fn observer_count(&self, id: NotifierId) -> usize {
        self.node(id).map_or(0, |n| n.observers.len())
    }

    /// Deliver `event` to `from` and then to each of its ancestors.
    ///
    /// Returns `true` if every observer succeeded.
    pub fn send(&mut self, from: NotifierId, event: &Event) -> bool {
        tracing::trace!(notifier = from.0, ?event, "notify");
        let ty = event.event_type();
        let mut ok = true;
        let mut current = Some(from);
        let mut hops = 0usize;
        while let Some(id) = current {
            let Some(node) = self.node_mut(id) else {
                break;
            };
            for observer in node.observers.iter_mut() {
                if !observer.types.intersects(ty) {
                    continue;
                }
                if let Err(err) = (observer.callback)(event) {
                    tracing::warn!(notifier = id.0, error = %err, "observer failed");
                    ok = false;
                }
            }
            current = node.parent;
            hops += 1;
            if hops > self.nodes.len() {
                tracing::error!(notifier = from.0, "notifier parent chain has a cycle");
                break;
            }
        }
        ok
    }

    fn node(&self, id: NotifierId) -> Option<&Notifier> {
        self.nodes.get(id.0 as usize).and_then(Option::as_ref)
    }

    fn node_mut(&mut self, id: NotifierId) -> Option<&mut Notifier> {
        self.nodes.get_mut(id.0 as usize).and_then(Option::as_mut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder(log: &Rc<RefCell<Vec<String>>>, tag: &'static str) -> ObserverFn {
        let log = Rc::clone(log);
        Box::new(move |ev| {
            log.borrow_mut().push(format!("{tag}:{:?}", ev.event_type()));
            Ok(())
        })
    }

    #[test]
    fn send_walks_up_in_registration_order() {
        let mut bus = NotifyBus::new();
        let root = bus.create();
        let child = bus.create();
        bus.set_parent(child, Some(root));

        let log = Rc::new(RefCell::new(Vec::new()));
        bus.observer_add(root, EventTypes::ALL, recorder(&log, "root"));
        bus.observer_add(child, EventTypes::ALL, recorder(&log, "c1"));
        bus.observer_add(child, EventTypes::ALL, recorder(&log, "c2"));

        assert!(bus.send(child, &Event::Timeout));
        let log = log.borrow();
        assert_eq!(log.len(), 3);
        assert!(log[0].starts_with("c1"));
        assert!(log[1].starts_with("c2"));
        assert!(log[2].starts_with("root"));
    }

    #[test]
    fn filtered_by_type() {
        let mut bus = NotifyBus::new();
        let n = bus.create();
        let log = Rc::new(RefCell::new(Vec::new()));
        bus.observer_add(n, EventTypes::CONFIG, recorder(&log, "cfg"));
        bus.send(n, &Event::Timeout);
        assert!(log.borrow().is_empty());
        bus.send(
            n,
            &Event::Config(ConfigEvent {
                kind: ConfigEventKind::Set,
                name: "wrap".into(),
            }),
        );
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn failing_observer_does_not_stop_delivery() {
        let mut bus = NotifyBus::new();
        let n = bus.create();
        let log = Rc::new(RefCell::new(Vec::new()));
        bus.observer_add(
            n,
            EventTypes::ALL,
            Box::new(|_| Err(ObserverError::new("nope"))),
        );
        bus.observer_add(n, EventTypes::ALL, recorder(&log, "after"));
        assert!(!bus.send(n, &Event::Timeout));
        assert_eq!(log.borrow().len(), 1);
    }

    #[test]
    fn remove_and_free() {
        let mut bus = NotifyBus::new();
        let root = bus.create();
        let child = bus.create();
        bus.set_parent(child, Some(root));
        let log = Rc::new(RefCell::new(Vec::new()));
        let obs = bus
            .observer_add(child, EventTypes::ALL, recorder(&log, "x"))
            .unwrap();
        assert!(bus.observer_remove(child, obs));
        assert!(!bus.observer_remove(child, obs));

        bus.free(root);
        assert!(!bus.contains(root));
        assert_eq!(bus.parent(child), None);
        assert!(bus.send(child, &Event::Timeout));

        let reused = bus.create();
        assert_eq!(reused, root);
        assert_eq!(bus.observer_count(reused), 0);
    }
}
