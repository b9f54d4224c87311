//! Delivery of one signal to a snapshot of subscribers.
//!
//! Both strategies are barriers: [`broadcast`] returns only once every
//! handler has returned. Threaded delivery spawns scoped workers, so
//! the scope join is the barrier; detach notices come back over a
//! crossbeam channel and are pruned by the caller.

use std::thread;

use crossbeam_channel::Sender;
use relaykit_core::{Signal, SubscriptionId};
use smallvec::SmallVec;

use crate::board::Board;
use crate::config::FanOut;
use crate::publisher::{Delivery, Subscriber};

pub(crate) type Detached = SmallVec<[SubscriptionId; 2]>;

/// Invoke one handler. Returns its id if it asked to be detached.
pub(crate) fn deliver(subscriber: &Subscriber, signal: &Signal) -> Option<SubscriptionId> {
    signal.wave().record_delivery();
    match (subscriber.handler)(signal) {
        Delivery::Delivered => None,
        Delivery::Detached => Some(subscriber.id),
    }
}

/// Deliver `signal` to every subscriber according to the board's strategy.
pub(crate) fn broadcast(board: &Board, subscribers: &[Subscriber], signal: &Signal) -> Detached {
    match board.fan_out() {
        FanOut::Threaded { min_subscribers } if subscribers.len() >= min_subscribers => {
            threaded(subscribers, signal)
        }
        _ => inline(subscribers, signal),
    }
}

fn inline(subscribers: &[Subscriber], signal: &Signal) -> Detached {
    subscribers
        .iter()
        .filter_map(|s| deliver(s, signal))
        .collect()
}

fn threaded(subscribers: &[Subscriber], signal: &Signal) -> Detached {
    let Some((last, rest)) = subscribers.split_last() else {
        return Detached::new();
    };
    let (tx, rx) = crossbeam_channel::unbounded();

    thread::scope(|scope| {
        for subscriber in rest {
            let worker_tx = tx.clone();
            let spawned = thread::Builder::new()
                .name(format!("relaykit-fanout-{}", subscriber.id))
                .spawn_scoped(scope, move || {
                    notify(&worker_tx, deliver(subscriber, signal));
                });
            if let Err(err) = spawned {
                tracing::warn!(
                    target: "relaykit::wire",
                    subscription = %subscriber.id,
                    error = %err,
                    "fan-out worker spawn failed, delivering inline"
                );
                notify(&tx, deliver(subscriber, signal));
            }
        }
        notify(&tx, deliver(last, signal));
    });

    drop(tx);
    rx.try_iter().collect()
}

fn notify(tx: &Sender<SubscriptionId>, detached: Option<SubscriptionId>) {
    if let Some(id) = detached {
        // Receiver outlives the scope; a send can only fail after it is dropped.
        let _ = tx.send(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relaykit_core::Wave;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn subscriber(calls: &Arc<AtomicUsize>, detach: bool) -> Subscriber {
        let c = Arc::clone(calls);
        Subscriber {
            id: SubscriptionId::next(),
            handler: Arc::new(move |_| {
                c.fetch_add(1, Ordering::SeqCst);
                if detach {
                    Delivery::Detached
                } else {
                    Delivery::Delivered
                }
            }),
        }
    }

    #[test]
    fn threaded_delivers_to_all_before_returning() {
        let calls = Arc::new(AtomicUsize::new(0));
        let subs: Vec<_> = (0..6).map(|i| subscriber(&calls, i == 2)).collect();
        let wave = Wave::begin();
        let signal = Signal::new(true, wave.clone());
        let detached = threaded(&subs, &signal);
        assert_eq!(calls.load(Ordering::SeqCst), 6);
        assert_eq!(detached.as_slice(), &[subs[2].id]);
        assert_eq!(wave.report().deliveries, 6);
    }

    #[test]
    fn inline_preserves_order() {
        let order = Arc::new(std::sync::Mutex::new(Vec::new()));
        let subs: Vec<_> = (0..4)
            .map(|i| {
                let o = Arc::clone(&order);
                Subscriber {
                    id: SubscriptionId::next(),
                    handler: Arc::new(move |_| {
                        o.lock().unwrap().push(i);
                        Delivery::Delivered
                    }),
                }
            })
            .collect();
        let signal = Signal::new(false, Wave::begin());
        assert!(inline(&subs, &signal).is_empty());
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn small_broadcast_stays_inline_on_threaded_board() {
        let board = Board::threaded();
        let calls = Arc::new(AtomicUsize::new(0));
        let subs = vec![subscriber(&calls, false)];
        let signal = Signal::new(true, Wave::begin());
        assert!(broadcast(&board, &subs, &signal).is_empty());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_threaded_broadcast_is_noop() {
        let signal = Signal::new(true, Wave::begin());
        assert!(threaded(&[], &signal).is_empty());
    }
}
