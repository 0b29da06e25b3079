//! Cancellable stream and future combinators.
//!
//! Input arrives on separate per-subscription queues, so "which came first"
//! cannot be read off the order in which queues become ready. Combinators
//! that pick between several ready inputs compare [`Ordered::seq`] instead.

use std::pin::Pin;
use std::task::Poll;

use futures::future::{Either, maybe_done};
use futures::{Stream, StreamExt, stream};

use super::events::Sequenced;

/// Values that know their position in emission order.
pub trait Ordered {
    /// Sequence number, or `None` for values not caused by an event
    /// (a timer, closed input).
    fn seq(&self) -> Option<u64>;
}

impl<T> Ordered for Sequenced<T> {
    fn seq(&self) -> Option<u64> {
        Some(self.seq)
    }
}

impl<T: Ordered> Ordered for Option<T> {
    fn seq(&self) -> Option<u64> {
        self.as_ref().and_then(Ordered::seq)
    }
}

impl Ordered for () {
    fn seq(&self) -> Option<u64> {
        None
    }
}

/// Yields items from `source` until `terminator` resolves.
///
/// While the terminator is pending every source item is passed through. Once
/// it resolves, source items that are already queued and were emitted before
/// the terminating event are still yielded; then the stream ends for good.
/// A terminator without a sequence number ends the stream immediately. The
/// terminator's value is discarded.
pub fn take_until<F, S>(terminator: F, source: S) -> impl Stream<Item = S::Item>
where
    F: Future,
    F::Output: Ordered,
    S: Stream,
    S::Item: Ordered,
{
    let state = (Box::pin(maybe_done(terminator)), Box::pin(source.peekable()));
    stream::unfold(state, |(mut terminator, mut source)| async move {
        let item = futures::future::poll_fn(|cx| {
            let cutoff = match terminator.as_mut().poll(cx) {
                Poll::Ready(()) => Some(terminator.as_mut().output_mut().and_then(|out| out.seq())),
                Poll::Pending => None,
            };
            let take = match (cutoff, source.as_mut().poll_peek(cx)) {
                (_, Poll::Ready(None)) => false,
                (None, Poll::Pending) => return Poll::Pending,
                (None, Poll::Ready(Some(_))) => true,
                (Some(cutoff), Poll::Ready(Some(item))) => {
                    matches!((item.seq(), cutoff), (Some(seq), Some(cutoff)) if seq < cutoff)
                }
                (Some(_), Poll::Pending) => false,
            };
            if take {
                source.as_mut().poll_next(cx)
            } else {
                Poll::Ready(None)
            }
        })
        .await?;
        Some((item, (terminator, source)))
    })
}

/// Interleaves two streams in emission order.
///
/// When both have an item ready the one with the lower sequence number goes
/// first. Ends when both sources end.
pub fn merge_ordered<A, B>(a: A, b: B) -> impl Stream<Item = A::Item>
where
    A: Stream,
    B: Stream<Item = A::Item>,
    A::Item: Ordered,
{
    let state = (Box::pin(a.peekable()), Box::pin(b.peekable()));
    stream::unfold(state, |(mut a, mut b)| async move {
        let item = futures::future::poll_fn(|cx| {
            let left = match (a.as_mut().poll_peek(cx), b.as_mut().poll_peek(cx)) {
                (Poll::Ready(Some(x)), Poll::Ready(Some(y))) => {
                    x.seq().unwrap_or(u64::MAX) <= y.seq().unwrap_or(u64::MAX)
                }
                (Poll::Ready(Some(_)), _) => true,
                (_, Poll::Ready(Some(_))) => false,
                (Poll::Ready(None), Poll::Ready(None)) => return Poll::Ready(None),
                _ => return Poll::Pending,
            };
            if left {
                a.as_mut().poll_next(cx)
            } else {
                b.as_mut().poll_next(cx)
            }
        })
        .await?;
        Some((item, (a, b)))
    })
}

/// Merges any number of streams in emission order.
pub fn merge_all_ordered<'a, T: Ordered + 'a>(
    streams: Vec<Pin<Box<dyn Stream<Item = T> + 'a>>>,
) -> Pin<Box<dyn Stream<Item = T> + 'a>> {
    streams
        .into_iter()
        .reduce(|merged, next| merge_ordered(merged, next).boxed_local())
        .unwrap_or_else(|| stream::empty().boxed_local())
}

/// Resolves with whichever of `a` and `b` completes first (`a` on a tie).
///
/// The loser is dropped, which releases any subscription it holds.
pub async fn race<A, B>(a: A, b: B) -> Either<A::Output, B::Output>
where
    A: Future,
    B: Future,
{
    tokio::select! {
        biased;
        a = a => Either::Left(a),
        b = b => Either::Right(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::{Instant, sleep, sleep_until};

    fn timed_source(start: Instant, at_ms: &'static [u64]) -> impl Stream<Item = Sequenced<u64>> {
        stream::iter(at_ms.iter().copied()).then(move |ms| async move {
            sleep_until(start + Duration::from_millis(ms)).await;
            Sequenced::new(ms, ms)
        })
    }

    fn values(items: Vec<Sequenced<u64>>) -> Vec<u64> {
        items.into_iter().map(|item| item.value).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn take_until_stops_when_terminator_fires_between_items() {
        let start = Instant::now();
        let source = timed_source(start, &[10, 20, 30]);
        let terminator = sleep_until(start + Duration::from_millis(25));

        let items = take_until(terminator, source).collect().await;
        assert_eq!(values(items), vec![10, 20]);
    }

    #[tokio::test(start_paused = true)]
    async fn take_until_is_empty_if_terminator_fires_first() {
        let start = Instant::now();
        let source = timed_source(start, &[10, 20]);
        let items = take_until(async {}, source).collect().await;
        assert!(values(items).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn take_until_ends_with_finite_source() {
        let start = Instant::now();
        let source = timed_source(start, &[5]);
        let items = take_until(futures::future::pending::<()>(), source)
            .collect()
            .await;
        assert_eq!(values(items), vec![5]);
    }

    #[tokio::test]
    async fn take_until_keeps_queued_items_emitted_before_terminator() {
        let source = stream::iter([1, 2, 4, 5].map(|seq| Sequenced::new(seq, seq)));
        let terminator = futures::future::ready(Some(Sequenced::new(3, "save")));

        let items = take_until(terminator, source).collect().await;
        assert_eq!(values(items), vec![1, 2]);
    }

    #[tokio::test]
    async fn merge_ordered_interleaves_by_sequence() {
        let a = stream::iter([1, 4, 5].map(|seq| Sequenced::new(seq, seq)));
        let b = stream::iter([2, 3, 6].map(|seq| Sequenced::new(seq, seq)));

        let merged = merge_ordered(a, b).collect().await;
        assert_eq!(values(merged), vec![1, 2, 3, 4, 5, 6]);
    }

    #[tokio::test(start_paused = true)]
    async fn merge_ordered_waits_for_the_slower_source() {
        let start = Instant::now();
        let a = timed_source(start, &[30]);
        let b = timed_source(start, &[10, 20]);

        let merged = merge_all_ordered(vec![a.boxed_local(), b.boxed_local()])
            .collect()
            .await;
        assert_eq!(values(merged), vec![10, 20, 30]);
    }

    #[tokio::test(start_paused = true)]
    async fn race_returns_first_to_complete() {
        let slow = async {
            sleep(Duration::from_millis(50)).await;
            "slow"
        };
        let fast = async {
            sleep(Duration::from_millis(10)).await;
            7
        };
        match race(slow, fast).await {
            Either::Right(value) => assert_eq!(value, 7),
            Either::Left(_) => panic!("slow branch should lose"),
        }
    }

    #[tokio::test]
    async fn race_prefers_left_on_tie() {
        assert!(matches!(race(async { 1 }, async { 2 }).await, Either::Left(1)));
    }
}
