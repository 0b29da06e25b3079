//! Push-driven input emitter with scoped subscriptions.
//!
//! The host feeds events in with [`Emitter::emit`], which never blocks: each
//! subscription owns a bounded queue and events that do not fit are dropped.
//! A [`Subscription`] is a [`Stream`] of matching events and unsubscribes
//! itself when dropped, so the losing branch of a race never leaves a
//! listener behind.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll};

use futures::{Stream, StreamExt};
use log::{debug, warn};
use tokio::sync::mpsc::{self, error::TrySendError};

use super::events::{EventType, InputEvent, Sequenced, Target};
use crate::error::SessionError;

struct Listener {
    id: u64,
    event_type: EventType,
    target: Target,
    tx: mpsc::Sender<Sequenced<InputEvent>>,
}

impl Listener {
    /// Document listeners see every event of their type, as if events bubbled.
    fn wants(&self, event: &InputEvent) -> bool {
        self.event_type == event.event_type()
            && (self.target == Target::Document || self.target == event.target())
    }
}

struct Registry {
    next_id: u64,
    /// Sequence number for the next emitted event
    next_seq: u64,
    capacity: usize,
    closed: bool,
    listeners: Vec<Listener>,
    /// Mounted elements and whether each is enabled.
    mounted: HashMap<Target, bool>,
}

/// Shared handle to the input event target.
#[derive(Clone)]
pub struct Emitter {
    registry: Arc<Mutex<Registry>>,
}

impl Emitter {
    /// Creates an emitter whose subscriptions buffer up to `queue_capacity` events.
    pub fn new(queue_capacity: usize) -> Self {
        let mut mounted = HashMap::new();
        mounted.insert(Target::Document, true);
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                next_seq: 1,
                capacity: queue_capacity.max(1),
                closed: false,
                listeners: Vec::new(),
                mounted,
            })),
        }
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes `target` available for subscriptions. Mounted elements start enabled.
    pub fn mount(&self, target: Target) {
        self.registry().mounted.entry(target).or_insert(true);
        debug!("Mounted {}", target);
    }

    /// Removes `target`; its listeners are dropped and their streams end.
    pub fn unmount(&self, target: Target) {
        if target == Target::Document {
            return;
        }
        let mut registry = self.registry();
        registry.mounted.remove(&target);
        registry.listeners.retain(|listener| listener.target != target);
        debug!("Unmounted {}", target);
    }

    pub fn is_mounted(&self, target: Target) -> bool {
        self.registry().mounted.contains_key(&target)
    }

    /// Enables or disables an element. Disabled elements emit no clicks.
    pub fn set_enabled(&self, target: Target, enabled: bool) -> Result<(), SessionError> {
        let mut registry = self.registry();
        match registry.mounted.get_mut(&target) {
            Some(state) => {
                *state = enabled;
                Ok(())
            }
            None => Err(SessionError::EmptyTargetElement(target.to_string())),
        }
    }

    pub fn is_enabled(&self, target: Target) -> bool {
        self.registry().mounted.get(&target).copied().unwrap_or(false)
    }

    /// Subscribes to `event_type` on `target`, or on the document when `None`.
    ///
    /// # Errors
    /// Returns [`SessionError::EmptyTargetElement`] if `target` is not mounted.
    pub fn subscribe(
        &self,
        event_type: EventType,
        target: Option<Target>,
    ) -> Result<Subscription, SessionError> {
        let target = target.unwrap_or(Target::Document);
        let mut registry = self.registry();
        if !registry.mounted.contains_key(&target) {
            return Err(SessionError::EmptyTargetElement(target.to_string()));
        }

        let id = registry.next_id;
        registry.next_id += 1;
        let (tx, rx) = mpsc::channel(registry.capacity);
        if registry.closed {
            // Dropping the sender right away ends the stream on first poll.
            drop(tx);
        } else {
            registry.listeners.push(Listener {
                id,
                event_type,
                target,
                tx,
            });
        }
        debug!("Subscribed #{} to {:?} on {}", id, event_type, target);

        Ok(Subscription {
            id,
            rx,
            registry: Arc::clone(&self.registry),
        })
    }

    /// Subscribes to `event_type` on the document, which is always present.
    pub fn subscribe_document(&self, event_type: EventType) -> Subscription {
        match self.subscribe(event_type, None) {
            Ok(subscription) => subscription,
            Err(_) => unreachable!("the document is always mounted"),
        }
    }

    /// Delivers `event` to every matching listener without blocking.
    ///
    /// The event is stamped with the next sequence number first. Returns
    /// `true` if at least one listener accepted it.
    pub fn emit(&self, event: InputEvent) -> bool {
        let mut registry = self.registry();
        if registry.closed {
            return false;
        }
        let target = event.target();
        let available = registry.mounted.get(&target).copied().unwrap_or(false);
        if event.event_type() == EventType::Click && !available {
            debug!("Dropping click on unavailable {}", target);
            return false;
        }

        let sequenced = Sequenced::new(registry.next_seq, event);
        registry.next_seq += 1;

        let mut delivered = false;
        for listener in registry.listeners.iter().filter(|l| l.wants(&event)) {
            match listener.tx.try_send(sequenced) {
                Ok(()) => delivered = true,
                Err(TrySendError::Full(_)) => {
                    warn!(
                        "Input queue full for subscription #{}, dropping {:?}",
                        listener.id,
                        event.event_type()
                    );
                }
                Err(TrySendError::Closed(_)) => {}
            }
        }
        delivered
    }

    /// Whether anyone currently listens for `event_type` on `target`.
    pub fn has_listener(&self, event_type: EventType, target: Option<Target>) -> bool {
        let target = target.unwrap_or(Target::Document);
        self.registry()
            .listeners
            .iter()
            .any(|l| l.event_type == event_type && l.target == target)
    }

    /// Number of live subscriptions.
    pub fn listener_count(&self) -> usize {
        self.registry().listeners.len()
    }

    /// Ends every event sequence. Buffered events are still delivered.
    pub fn close(&self) {
        let mut registry = self.registry();
        registry.closed = true;
        registry.listeners.clear();
        debug!("Emitter closed");
    }

    pub fn is_closed(&self) -> bool {
        self.registry().closed
    }
}

/// Cancellable, possibly infinite sequence of events for one listener.
pub struct Subscription {
    id: u64,
    rx: mpsc::Receiver<Sequenced<InputEvent>>,
    registry: Arc<Mutex<Registry>>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }
}

impl Stream for Subscription {
    type Item = Sequenced<InputEvent>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().rx.poll_recv(cx)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        registry.listeners.retain(|listener| listener.id != self.id);
        debug!("Unsubscribed #{}", self.id);
    }
}

/// Released keys whose code is in `key_codes`, subscribed immediately.
pub fn key_presses(
    emitter: &Emitter,
    key_codes: &[u32],
) -> impl Stream<Item = Sequenced<u32>> + 'static + use<> {
    let keys = emitter.subscribe_document(EventType::KeyUp);
    let key_codes = key_codes.to_vec();
    debug!("Waiting for key codes {:?}", key_codes);
    keys.filter_map(move |event| {
        let code = event.value.key_code().filter(|code| key_codes.contains(code));
        futures::future::ready(code.map(|code| Sequenced::new(event.seq, code)))
    })
}

/// Resolves with the first released key whose code is in `key_codes`.
///
/// The document subscription is taken immediately and released as soon as
/// the returned future completes or is dropped. Resolves to `None` if input
/// ends first.
pub fn wait_for_key_press(
    emitter: &Emitter,
    key_codes: &[u32],
) -> impl Future<Output = Option<Sequenced<u32>>> + 'static + use<> {
    let matching = key_presses(emitter, key_codes);
    async move {
        let mut matching = std::pin::pin!(matching);
        matching.next().await
    }
}
