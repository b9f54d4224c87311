//! Boolean state plus broadcast: the propagation workhorse.
//!
//! A publisher is split into two capabilities over the same shared state:
//!
//! - [`Publisher`]: read and subscribe. Handed out freely to consumers.
//! - [`Driver`]: mutate. Kept by the owning component only, usually as a
//!   [`WeakDriver`] inside the component's core.
//!
//! # Settling contract
//!
//! [`Driver::drive`] and [`Driver::refresh`] return only after every
//! handler, and everything those handlers transitively trigger, has
//! finished. A caller can read any downstream output immediately after a
//! drive returns.
//!
//! # Locking
//!
//! The level is an atomic, so reads never block. Each publisher owns one
//! transition lock, held only while its next level is derived and stored;
//! the broadcast itself runs after the lock is released. A derivation may
//! read other publishers' levels but never takes another transition lock,
//! so feedback wiring cannot produce a lock cycle.

use std::any::Any;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use relaykit_core::{
    CircuitError, ComponentId, Emitter, Signal, SubscriptionId, Wave, WaveId, WireEvent,
};
use smallvec::SmallVec;

use crate::board::Board;
use crate::fanout;

/// What a handler reports back after a delivery.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// The handler processed the signal.
    Delivered,
    /// The handler's owner is gone; drop this subscription.
    Detached,
}

pub(crate) type Handler = Arc<dyn Fn(&Signal) -> Delivery + Send + Sync>;

#[derive(Clone)]
pub(crate) struct Subscriber {
    pub(crate) id: SubscriptionId,
    pub(crate) handler: Handler,
}

pub(crate) type SubscriberSnapshot = SmallVec<[Subscriber; 4]>;

struct Shared {
    id: ComponentId,
    label: String,
    board: Board,
    current: AtomicBool,
    /// Raw [`WaveId`] of the last accepted transition.
    last_wave: AtomicU64,
    transition: Mutex<()>,
    subscribers: Mutex<Vec<Subscriber>>,
    /// Owners kept alive for as long as this publisher is reachable.
    keepalive: Mutex<SmallVec<[Arc<dyn Any + Send + Sync>; 1]>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Shared {
    fn transition_to(&self, wave: &Wave, eval: impl FnOnce(bool) -> bool) {
        let (next, subscribers) = {
            let _guard = lock(&self.transition);
            let held = self.current.load(Ordering::SeqCst);
            let next = eval(held);
            if next == held {
                if self.last_wave.load(Ordering::SeqCst) == wave.id().get() {
                    wave.record_suppressed();
                    self.board.emit(&WireEvent::Suppressed {
                        component: self.id,
                        label: &self.label,
                        value: held,
                        wave: wave.id(),
                    });
                }
                return;
            }
            self.current.store(next, Ordering::SeqCst);
            self.last_wave.store(wave.id().get(), Ordering::SeqCst);
            wave.record_transition();
            self.board.emit(&WireEvent::Transition {
                component: self.id,
                label: &self.label,
                value: next,
                wave: wave.id(),
            });
            let subscribers: SubscriberSnapshot = lock(&self.subscribers).iter().cloned().collect();
            (next, subscribers)
        };

        if subscribers.is_empty() {
            return;
        }
        let signal = Signal::new(next, wave.clone());
        let detached = fanout::broadcast(&self.board, &subscribers, &signal);
        if !detached.is_empty() {
            lock(&self.subscribers).retain(|s| !detached.contains(&s.id));
        }
    }

    fn remove(&self, id: SubscriptionId) -> bool {
        let mut subs = lock(&self.subscribers);
        let before = subs.len();
        subs.retain(|s| s.id != id);
        subs.len() != before
    }
}

// ── Publisher ──────────────────────────────────────────────────────

/// Read/subscribe handle on a boolean state.
///
/// Cloning is cheap and yields a handle to the same state. Holding a
/// `Publisher` keeps the component that drives it alive.
#[derive(Clone)]
pub struct Publisher {
    shared: Arc<Shared>,
}

// Compile-time assertion: Publisher must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<Publisher>();
    assert::<Driver>();
};

impl Publisher {
    /// Unique identity of this publisher.
    pub fn id(&self) -> ComponentId {
        self.shared.id
    }

    /// Human-readable label given at construction.
    pub fn label(&self) -> &str {
        &self.shared.label
    }

    /// The current level. Never blocks.
    pub fn emitting(&self) -> bool {
        self.shared.current.load(Ordering::SeqCst)
    }

    /// Wave of the most recently accepted transition, or [`WaveId::NONE`].
    pub fn last_wave(&self) -> WaveId {
        WaveId::from_raw(self.shared.last_wave.load(Ordering::SeqCst))
    }

    /// Number of attached handlers.
    pub fn subscriber_count(&self) -> usize {
        lock(&self.shared.subscribers).len()
    }

    /// Whether `self` and `other` are handles on the same state.
    pub fn ptr_eq(&self, other: &Publisher) -> bool {
        Arc::ptr_eq(&self.shared, &other.shared)
    }

    /// Attach `handler` and deliver the current level to it once.
    ///
    /// The hot-wire delivery runs in a fresh wave which settles before
    /// this returns, so a consumer wired to an energized source never
    /// misses its state. If that wave ends with an outstanding fault the
    /// subscription is removed again and the fault is returned.
    ///
    /// Attaching and the hot-wire wave both run under the wave lock of
    /// this publisher's board, so must not be called from inside a
    /// handler reached by a wave on that board.
    pub fn subscribe<F>(&self, handler: F) -> Result<SubscriptionId, CircuitError>
    where
        F: Fn(&Signal) -> Delivery + Send + Sync + 'static,
    {
        let _waves = self.shared.board.lock_waves();
        let subscriber = Subscriber {
            id: SubscriptionId::next(),
            handler: Arc::new(handler),
        };
        lock(&self.shared.subscribers).push(subscriber.clone());
        self.shared.board.emit(&WireEvent::Subscribed {
            component: self.shared.id,
            label: &self.shared.label,
            subscription: subscriber.id,
        });

        let wave = Wave::begin();
        let signal = Signal::new(self.emitting(), wave.clone());
        if fanout::deliver(&subscriber, &signal).is_some() {
            self.shared.remove(subscriber.id);
        }
        match wave.settle() {
            Ok(_) => Ok(subscriber.id),
            Err(err) => {
                self.shared.remove(subscriber.id);
                Err(err)
            }
        }
    }

    /// Detach a handler. Returns `false` if it was not attached.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.shared.remove(id)
    }
}

impl Emitter for Publisher {
    fn emitting(&self) -> bool {
        Publisher::emitting(self)
    }
}

impl fmt::Debug for Publisher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Publisher")
            .field("id", &self.shared.id)
            .field("label", &self.shared.label)
            .field("current", &self.emitting())
            .finish()
    }
}

// ── Driver ─────────────────────────────────────────────────────────

/// Write handle on a publisher's state.
///
/// Only the owning component holds one. Consumers receive the
/// [`Publisher`] side via [`publisher()`](Driver::publisher).
pub struct Driver {
    shared: Arc<Shared>,
}

impl Driver {
    /// Create a new publisher state on `board` with level `initial`.
    pub fn new(board: &Board, label: impl Into<String>, initial: bool) -> Self {
        Self {
            shared: Arc::new(Shared {
                id: ComponentId::next(),
                label: label.into(),
                board: board.clone(),
                current: AtomicBool::new(initial),
                last_wave: AtomicU64::new(WaveId::NONE.get()),
                transition: Mutex::new(()),
                subscribers: Mutex::new(Vec::new()),
                keepalive: Mutex::new(SmallVec::new()),
            }),
        }
    }

    /// The read/subscribe side of this state.
    pub fn publisher(&self) -> Publisher {
        Publisher {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Unique identity of this publisher.
    pub fn id(&self) -> ComponentId {
        self.shared.id
    }

    /// The current level.
    pub fn emitting(&self) -> bool {
        self.shared.current.load(Ordering::SeqCst)
    }

    /// Accept `value` within `wave` and broadcast it.
    ///
    /// A no-op if `value` equals the current level; otherwise blocks
    /// until the whole transitive fan-out has settled.
    pub fn drive(&self, value: bool, wave: &Wave) {
        self.shared.transition_to(wave, |_| value);
    }

    /// Derive the next level from `eval(current)` under the transition
    /// lock, then behave like [`drive`](Driver::drive).
    ///
    /// `eval` must only read levels; it must not drive anything.
    pub fn refresh(&self, wave: &Wave, eval: impl FnOnce(bool) -> bool) {
        self.shared.transition_to(wave, eval);
    }

    /// Keep `owner` alive for as long as this publisher is reachable.
    pub fn retain<T: Send + Sync + 'static>(&self, owner: Arc<T>) {
        lock(&self.shared.keepalive).push(owner);
    }

    /// A non-owning handle for use inside the component's own core.
    pub fn downgrade(&self) -> WeakDriver {
        WeakDriver {
            shared: Arc::downgrade(&self.shared),
        }
    }
}

impl fmt::Debug for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Driver")
            .field("id", &self.shared.id)
            .field("label", &self.shared.label)
            .finish()
    }
}

/// Non-owning [`Driver`].
#[derive(Clone)]
pub struct WeakDriver {
    shared: Weak<Shared>,
}

impl WeakDriver {
    /// Recover the driver if the publisher is still reachable.
    pub fn upgrade(&self) -> Option<Driver> {
        self.shared.upgrade().map(|shared| Driver { shared })
    }
}

impl fmt::Debug for WeakDriver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WeakDriver")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn counter(publisher: &Publisher) -> Arc<AtomicUsize> {
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        publisher
            .subscribe(move |_| {
                c.fetch_add(1, Ordering::SeqCst);
                Delivery::Delivered
            })
            .unwrap();
        calls
    }

    #[test]
    fn subscribe_delivers_current_level_once() {
        let board = Board::default();
        let driver = Driver::new(&board, "src", true);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        driver
            .publisher()
            .subscribe(move |sig| {
                s.lock().unwrap().push(sig.value());
                Delivery::Delivered
            })
            .unwrap();
        assert_eq!(*seen.lock().unwrap(), vec![true]);
    }

    #[test]
    fn driving_same_level_is_silent() {
        let board = Board::default();
        let driver = Driver::new(&board, "src", false);
        let calls = counter(&driver.publisher());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        driver.drive(false, &Wave::begin());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        driver.drive(true, &Wave::begin());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn zero_subscribers_still_updates() {
        let board = Board::default();
        let driver = Driver::new(&board, "lonely", false);
        let wave = Wave::begin();
        driver.drive(true, &wave);
        assert!(driver.publisher().emitting());
        assert_eq!(driver.publisher().last_wave(), wave.id());
        assert_eq!(wave.report().transitions, 1);
    }

    #[test]
    fn refresh_sees_held_level() {
        let board = Board::default();
        let driver = Driver::new(&board, "toggle", true);
        driver.refresh(&Wave::begin(), |held| !held);
        assert!(!driver.emitting());
    }

    #[test]
    fn detached_handlers_are_pruned() {
        let board = Board::default();
        let driver = Driver::new(&board, "src", false);
        let publisher = driver.publisher();
        publisher
            .subscribe(|sig| {
                if sig.value() {
                    Delivery::Detached
                } else {
                    Delivery::Delivered
                }
            })
            .unwrap();
        assert_eq!(publisher.subscriber_count(), 1);
        driver.drive(true, &Wave::begin());
        assert_eq!(publisher.subscriber_count(), 0);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let board = Board::default();
        let driver = Driver::new(&board, "src", false);
        let publisher = driver.publisher();
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        let id = publisher
            .subscribe(move |_| {
                c.fetch_add(1, Ordering::SeqCst);
                Delivery::Delivered
            })
            .unwrap();
        assert!(publisher.unsubscribe(id));
        assert!(!publisher.unsubscribe(id));
        driver.drive(true, &Wave::begin());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn echo_within_same_wave_is_suppressed() {
        let board = Board::default();
        let driver = Driver::new(&board, "src", false);
        let wave = Wave::begin();
        driver.drive(true, &wave);
        driver.refresh(&wave, |_| true);
        assert_eq!(wave.report().suppressed, 1);

        let other = Wave::begin();
        driver.refresh(&other, |_| true);
        assert_eq!(other.report().suppressed, 0);
    }

    #[test]
    fn hot_wire_fault_removes_subscription() {
        let board = Board::default();
        let driver = Driver::new(&board, "src", true);
        let publisher = driver.publisher();
        let err = publisher.subscribe(|sig| {
            sig.wave().raise(
                ComponentId::next(),
                CircuitError::EmptyGate { gate: "TEST" },
            );
            Delivery::Delivered
        });
        assert_eq!(err, Err(CircuitError::EmptyGate { gate: "TEST" }));
        assert_eq!(publisher.subscriber_count(), 0);
    }

    #[test]
    fn weak_driver_dies_with_publisher() {
        let board = Board::default();
        let driver = Driver::new(&board, "src", false);
        let weak = driver.downgrade();
        assert!(weak.upgrade().is_some());
        drop(driver);
        assert!(weak.upgrade().is_none());
    }
}
