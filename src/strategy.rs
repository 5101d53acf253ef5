//! # Strategy Engine
//!
//! Three ways to pick up two forks, one broken on purpose:
//!
//! - [`Strategy::Deadlock`]: everyone goes left first, then right, with
//!   a forced pause in between. With N philosophers started together,
//!   the pause all but guarantees the circular wait (philosopher *i*
//!   holds fork *i* and waits on fork *i+1*, closing the ring). This is
//!   the canonical deadlock being demonstrated, not a bug.
//! - [`Strategy::Hierarchy`]: Dijkstra's resource ordering: always the
//!   lower-numbered fork first. A total order over forks, respected by
//!   every philosopher, makes a cycle in the wait-for graph impossible.
//! - [`Strategy::Asymmetric`]: even seats go left-first, odd seats
//!   right-first. Adjacent philosophers reach in opposite directions, so
//!   no uniform ring of waiters can form. Holds for any N, either parity.
//!
//! The pure decision of which hand goes first lives in
//! [`Strategy::pickup_order`]. The blocking protocol around it lives in
//! the [`AcquireProtocol`] trait: one implementation per strategy,
//! selected once at philosopher construction, so the hot cycle never
//! branches on the strategy.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::debug;

use crate::error::SimulationError;
use crate::fork::{Fork, ForkGuard};
use crate::philosopher::{Phase, PhaseCell};

/// Which of a philosopher's two forks to reach for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hand {
    Left,
    Right,
}

/// The selectable acquisition strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Deadlock,
    Hierarchy,
    Asymmetric,
}

impl Strategy {
    /// Pure acquisition-order decision for the philosopher at seat
    /// `philosopher` whose forks carry ids `left_fork` and `right_fork`.
    pub fn pickup_order(
        &self,
        philosopher: usize,
        left_fork: usize,
        right_fork: usize,
    ) -> (Hand, Hand) {
        match self {
            Strategy::Deadlock => (Hand::Left, Hand::Right),
            Strategy::Hierarchy => {
                if left_fork < right_fork {
                    (Hand::Left, Hand::Right)
                } else {
                    (Hand::Right, Hand::Left)
                }
            }
            Strategy::Asymmetric => {
                if philosopher % 2 == 0 {
                    (Hand::Left, Hand::Right)
                } else {
                    (Hand::Right, Hand::Left)
                }
            }
        }
    }

    /// Builds the protocol object a philosopher will use for every
    /// cycle. `pause` is only consulted by the deadlock variant.
    pub fn protocol(&self, pause: Duration) -> Box<dyn AcquireProtocol> {
        match self {
            Strategy::Deadlock => Box::new(NaiveLeftRight { pause }),
            Strategy::Hierarchy => Box::new(ForkHierarchy),
            Strategy::Asymmetric => Box::new(Alternating),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Deadlock => "deadlock",
            Strategy::Hierarchy => "hierarchy",
            Strategy::Asymmetric => "asymmetric",
        };
        f.write_str(name)
    }
}

impl FromStr for Strategy {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "deadlock" => Ok(Strategy::Deadlock),
            "hierarchy" => Ok(Strategy::Hierarchy),
            "asymmetric" => Ok(Strategy::Asymmetric),
            other => Err(SimulationError::InvalidConfiguration(format!(
                "unknown strategy '{other}' (expected deadlock, hierarchy or asymmetric)"
            ))),
        }
    }
}

/// One philosopher's view of the table, handed to the protocol each
/// cycle: its seat number, its two forks, and its phase cell so the
/// protocol can record where the philosopher is waiting.
pub struct TableSeat<'a> {
    pub id: usize,
    pub left: &'a Fork,
    pub right: &'a Fork,
    pub phase: &'a PhaseCell,
}

impl<'a> TableSeat<'a> {
    fn fork(&self, hand: Hand) -> &'a Fork {
        match hand {
            Hand::Left => self.left,
            Hand::Right => self.right,
        }
    }

    /// Acquires both forks in the given order, recording the
    /// `AcquiringFirst`/`AcquiringSecond` phases around the waits.
    async fn acquire_in_order(&self, order: (Hand, Hand)) -> (ForkGuard<'a>, ForkGuard<'a>) {
        let (first, second) = (self.fork(order.0), self.fork(order.1));

        self.phase.set(Phase::AcquiringFirst);
        debug!(philosopher = self.id, fork = first.id(), "waiting for first fork");
        let first_guard = first.acquire(self.id).await;
        debug!(philosopher = self.id, fork = first.id(), "picked up first fork");

        self.phase.set(Phase::AcquiringSecond);
        debug!(philosopher = self.id, fork = second.id(), "waiting for second fork");
        let second_guard = second.acquire(self.id).await;
        debug!(philosopher = self.id, fork = second.id(), "picked up second fork");

        (first_guard, second_guard)
    }
}

/// The blocking half of a strategy: how to go from empty hands to both
/// forks held. Implementations return guards in acquisition order; the
/// philosopher drops them in reverse to release.
///
/// There is deliberately no cancellation path in here. A philosopher
/// parked inside `acquire_both` does not observe the stop signal; that
/// is what lets a deadlocked philosopher stay observably blocked past
/// the grace period.
#[async_trait]
pub trait AcquireProtocol: Send + Sync {
    /// Short name for logs and the run summary.
    fn name(&self) -> &'static str;

    /// Suspends until both of the seat's forks are held.
    async fn acquire_both<'a>(&self, seat: &TableSeat<'a>) -> (ForkGuard<'a>, ForkGuard<'a>);
}

/// Left then right, with a forced pause holding the left fork.
/// Deliberately deadlock-prone.
struct NaiveLeftRight {
    pause: Duration,
}

#[async_trait]
impl AcquireProtocol for NaiveLeftRight {
    fn name(&self) -> &'static str {
        "deadlock"
    }

    async fn acquire_both<'a>(&self, seat: &TableSeat<'a>) -> (ForkGuard<'a>, ForkGuard<'a>) {
        seat.phase.set(Phase::AcquiringFirst);
        debug!(philosopher = seat.id, fork = seat.left.id(), "waiting for left fork");
        let left = seat.left.acquire(seat.id).await;
        debug!(philosopher = seat.id, fork = seat.left.id(), "picked up left fork");

        // Give every other philosopher time to take its own left fork
        // before anyone reaches right. Raises the circular wait from
        // likely to near-certain within the observation window.
        sleep(self.pause).await;

        seat.phase.set(Phase::AcquiringSecond);
        debug!(philosopher = seat.id, fork = seat.right.id(), "waiting for right fork");
        let right = seat.right.acquire(seat.id).await;
        debug!(philosopher = seat.id, fork = seat.right.id(), "picked up right fork");

        (left, right)
    }
}

/// Lower fork id first, always.
struct ForkHierarchy;

#[async_trait]
impl AcquireProtocol for ForkHierarchy {
    fn name(&self) -> &'static str {
        "hierarchy"
    }

    async fn acquire_both<'a>(&self, seat: &TableSeat<'a>) -> (ForkGuard<'a>, ForkGuard<'a>) {
        let order = Strategy::Hierarchy.pickup_order(seat.id, seat.left.id(), seat.right.id());
        seat.acquire_in_order(order).await
    }
}

/// Even seats left-first, odd seats right-first.
struct Alternating;

#[async_trait]
impl AcquireProtocol for Alternating {
    fn name(&self) -> &'static str {
        "asymmetric"
    }

    async fn acquire_both<'a>(&self, seat: &TableSeat<'a>) -> (ForkGuard<'a>, ForkGuard<'a>) {
        let order = Strategy::Asymmetric.pickup_order(seat.id, seat.left.id(), seat.right.id());
        seat.acquire_in_order(order).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadlock_always_goes_left_first() {
        for id in 0..5 {
            let order = Strategy::Deadlock.pickup_order(id, id, (id + 1) % 5);
            assert_eq!(order, (Hand::Left, Hand::Right));
        }
    }

    #[test]
    fn hierarchy_prefers_the_lower_fork() {
        // Interior seats: left fork id < right fork id.
        assert_eq!(
            Strategy::Hierarchy.pickup_order(1, 1, 2),
            (Hand::Left, Hand::Right)
        );
        // The wrap-around seat holds fork N-1 on the left and fork 0 on
        // the right, so it must reach right first. This seat is what
        // breaks the ring.
        assert_eq!(
            Strategy::Hierarchy.pickup_order(4, 4, 0),
            (Hand::Right, Hand::Left)
        );
    }

    #[test]
    fn asymmetric_alternates_by_seat_parity() {
        assert_eq!(
            Strategy::Asymmetric.pickup_order(0, 0, 1),
            (Hand::Left, Hand::Right)
        );
        assert_eq!(
            Strategy::Asymmetric.pickup_order(1, 1, 2),
            (Hand::Right, Hand::Left)
        );
        assert_eq!(
            Strategy::Asymmetric.pickup_order(2, 2, 3),
            (Hand::Left, Hand::Right)
        );
    }

    #[test]
    fn parses_strategy_names_case_insensitively() {
        assert_eq!("deadlock".parse::<Strategy>().unwrap(), Strategy::Deadlock);
        assert_eq!("HIERARCHY".parse::<Strategy>().unwrap(), Strategy::Hierarchy);
        assert_eq!(
            "Asymmetric".parse::<Strategy>().unwrap(),
            Strategy::Asymmetric
        );
    }

    #[test]
    fn rejects_unknown_strategy_names() {
        let err = "optimistic".parse::<Strategy>().unwrap_err();
        assert!(matches!(
            err,
            SimulationError::InvalidConfiguration(msg) if msg.contains("optimistic")
        ));
    }

    #[test]
    fn display_matches_the_parseable_names() {
        for strategy in [Strategy::Deadlock, Strategy::Hierarchy, Strategy::Asymmetric] {
            let round_tripped: Strategy = strategy.to_string().parse().unwrap();
            assert_eq!(round_tripped, strategy);
        }
    }
}
