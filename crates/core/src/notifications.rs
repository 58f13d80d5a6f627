//! Back-office notification counts.
//!
//! The dashboard badge shows how much is waiting on staff: unread contact
//! messages, testimonials awaiting moderation and quote requests nobody has
//! picked up. [`aggregate`] derives the counts from the three collections;
//! [`NotificationAggregator`] remembers the last result and only derives it
//! again when one of the collections changed.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::Serialize;

/// Counts shown on the back-office badge.
///
/// `total` is computed by [`NotificationCounts::new`] and cannot be set on
/// its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct NotificationCounts {
    unread_messages: u64,
    pending_testimonials: u64,
    pending_quote_requests: u64,
    total: u64,
}

impl NotificationCounts {
    #[must_use]
    pub const fn new(
        unread_messages: u64,
        pending_testimonials: u64,
        pending_quote_requests: u64,
    ) -> Self {
        Self {
            unread_messages,
            pending_testimonials,
            pending_quote_requests,
            total: unread_messages
                .saturating_add(pending_testimonials)
                .saturating_add(pending_quote_requests),
        }
    }

    #[must_use]
    pub const fn unread_messages(&self) -> u64 {
        self.unread_messages
    }

    #[must_use]
    pub const fn pending_testimonials(&self) -> u64 {
        self.pending_testimonials
    }

    #[must_use]
    pub const fn pending_quote_requests(&self) -> u64 {
        self.pending_quote_requests
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.total
    }

    /// Nothing needs attention.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Something that can sit unread in an inbox.
pub trait Unread {
    fn is_unread(&self) -> bool;
}

/// Something that waits for a staff decision.
pub trait AwaitingReview {
    fn is_pending(&self) -> bool;
}

impl<T: Unread + ?Sized> Unread for &T {
    fn is_unread(&self) -> bool {
        (**self).is_unread()
    }
}

impl<T: AwaitingReview + ?Sized> AwaitingReview for &T {
    fn is_pending(&self) -> bool {
        (**self).is_pending()
    }
}

/// Count what needs attention across the three collections.
#[must_use]
pub fn aggregate<M, T, Q>(messages: &[M], testimonials: &[T], quotes: &[Q]) -> NotificationCounts
where
    M: Unread,
    T: AwaitingReview,
    Q: AwaitingReview,
{
    NotificationCounts::new(
        count(messages.iter().filter(|m| m.is_unread())),
        count(testimonials.iter().filter(|t| t.is_pending())),
        count(quotes.iter().filter(|q| q.is_pending())),
    )
}

fn count<I: Iterator>(items: I) -> u64 {
    u64::try_from(items.count()).unwrap_or(u64::MAX)
}

/// Fingerprint of a collection's contents.
///
/// Two slices with equal items in the same order have the same revision.
/// Only meaningful within one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Revision(u64);

impl Revision {
    #[must_use]
    pub fn of<T: Hash>(items: &[T]) -> Self {
        let mut hasher = DefaultHasher::new();
        items.hash(&mut hasher);
        Self(hasher.finish())
    }
}

/// Memoized [`aggregate`].
///
/// Keeps the counts from the previous call together with the revisions of
/// the collections they were derived from.
#[derive(Debug, Default)]
pub struct NotificationAggregator {
    memo: Option<([Revision; 3], NotificationCounts)>,
    recomputations: u64,
}

impl NotificationAggregator {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            memo: None,
            recomputations: 0,
        }
    }

    /// Current counts, derived again only if a collection changed since the
    /// previous call.
    pub fn counts<M, T, Q>(
        &mut self,
        messages: &[M],
        testimonials: &[T],
        quotes: &[Q],
    ) -> NotificationCounts
    where
        M: Unread + Hash,
        T: AwaitingReview + Hash,
        Q: AwaitingReview + Hash,
    {
        let revisions = [
            Revision::of(messages),
            Revision::of(testimonials),
            Revision::of(quotes),
        ];

        if let Some((previous, counts)) = self.memo
            && previous == revisions
        {
            return counts;
        }

        let counts = aggregate(messages, testimonials, quotes);
        self.memo = Some((revisions, counts));
        self.recomputations += 1;
        counts
    }

    /// How many times counts were actually derived.
    #[must_use]
    pub const fn recomputations(&self) -> u64 {
        self.recomputations
    }

    /// Forget the memoized result.
    pub fn invalidate(&mut self) {
        self.memo = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Hash)]
    struct Msg(bool);

    impl Unread for Msg {
        fn is_unread(&self) -> bool {
            !self.0
        }
    }

    #[derive(Hash)]
    struct Review(bool);

    impl AwaitingReview for Review {
        fn is_pending(&self) -> bool {
            self.0
        }
    }

    #[test]
    fn test_total_is_sum() {
        for (a, b, c) in [(0, 0, 0), (1, 0, 0), (0, 2, 0), (0, 0, 3), (4, 5, 6)] {
            let counts = NotificationCounts::new(a, b, c);
            assert_eq!(counts.total(), a + b + c);
        }
        assert!(NotificationCounts::new(0, 0, 0).is_empty());
        assert!(!NotificationCounts::new(0, 0, 1).is_empty());
    }

    #[test]
    fn test_total_saturates() {
        let counts = NotificationCounts::new(u64::MAX, 1, 1);
        assert_eq!(counts.total(), u64::MAX);
    }

    #[test]
    fn test_aggregate_counts_only_attention_items() {
        let messages = [Msg(true), Msg(false), Msg(false)];
        let testimonials = [Review(true), Review(false)];
        let quotes = [Review(false)];

        let counts = aggregate(&messages, &testimonials, &quotes);
        assert_eq!(counts.unread_messages(), 2);
        assert_eq!(counts.pending_testimonials(), 1);
        assert_eq!(counts.pending_quote_requests(), 0);
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_aggregate_empty() {
        let counts = aggregate::<Msg, Review, Review>(&[], &[], &[]);
        assert_eq!(counts, NotificationCounts::default());
        assert_eq!(counts.total(), 0);
    }

    #[test]
    fn test_memoizes_until_a_collection_changes() {
        let mut aggregator = NotificationAggregator::new();
        let messages = vec![Msg(false)];
        let mut testimonials = vec![Review(true)];
        let quotes = vec![Review(true), Review(true)];

        let first = aggregator.counts(&messages, &testimonials, &quotes);
        let second = aggregator.counts(&messages, &testimonials, &quotes);
        assert_eq!(first, second);
        assert_eq!(aggregator.recomputations(), 1);

        testimonials.push(Review(true));
        let third = aggregator.counts(&messages, &testimonials, &quotes);
        assert_eq!(third.pending_testimonials(), 2);
        assert_eq!(third.total(), 5);
        assert_eq!(aggregator.recomputations(), 2);

        aggregator.invalidate();
        aggregator.counts(&messages, &testimonials, &quotes);
        assert_eq!(aggregator.recomputations(), 3);
    }

    #[test]
    fn test_state_change_without_length_change_recomputes() {
        let mut aggregator = NotificationAggregator::new();
        let quotes = [Review(false)];

        let before = aggregator.counts(&[Msg(false)], &[Review(false)], &quotes);
        let after = aggregator.counts(&[Msg(true)], &[Review(false)], &quotes);

        assert_eq!(before.unread_messages(), 1);
        assert_eq!(after.unread_messages(), 0);
        assert_eq!(aggregator.recomputations(), 2);
    }

    #[test]
    fn test_serializes_total() {
        let json = serde_json::to_value(NotificationCounts::new(1, 2, 3)).unwrap_or_default();
        assert_eq!(json["total"], 6);
        assert_eq!(json["unread_messages"], 1);
    }
}
