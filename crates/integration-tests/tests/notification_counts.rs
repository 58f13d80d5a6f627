//! Notification badge counts.

#![allow(clippy::unwrap_used)]

use keystone_core::notifications::{
    AwaitingReview, NotificationAggregator, NotificationCounts, Unread, aggregate,
};

#[derive(Debug, Clone, Hash)]
struct Message {
    id: u32,
    read: bool,
}

impl Unread for Message {
    fn is_unread(&self) -> bool {
        !self.read
    }
}

#[derive(Debug, Clone, Hash)]
struct Submission {
    id: u32,
    pending: bool,
}

impl AwaitingReview for Submission {
    fn is_pending(&self) -> bool {
        self.pending
    }
}

fn messages(flags: &[bool]) -> Vec<Message> {
    (0..)
        .zip(flags)
        .map(|(id, &read)| Message { id, read })
        .collect()
}

fn submissions(flags: &[bool]) -> Vec<Submission> {
    (0..)
        .zip(flags)
        .map(|(id, &pending)| Submission { id, pending })
        .collect()
}

#[test]
fn test_total_is_the_sum_for_every_combination() {
    let patterns: [&[bool]; 5] = [&[], &[true], &[false], &[true, false, true], &[false; 4]];

    for m in patterns {
        for t in patterns {
            for q in patterns {
                let counts = aggregate(&messages(m), &submissions(t), &submissions(q));
                assert_eq!(
                    counts.total(),
                    counts.unread_messages()
                        + counts.pending_testimonials()
                        + counts.pending_quote_requests()
                );
            }
        }
    }
}

#[test]
fn test_all_zero() {
    let counts = aggregate::<Message, Submission, Submission>(&[], &[], &[]);
    assert_eq!(counts, NotificationCounts::new(0, 0, 0));
    assert_eq!(counts.total(), 0);
    assert!(counts.is_empty());
}

#[test]
fn test_counts_only_what_needs_attention() {
    let counts = aggregate(
        &messages(&[false, true, false]),
        &submissions(&[true, false]),
        &submissions(&[true, true, true, false]),
    );
    assert_eq!(counts.unread_messages(), 2);
    assert_eq!(counts.pending_testimonials(), 1);
    assert_eq!(counts.pending_quote_requests(), 3);
    assert_eq!(counts.total(), 6);
}

#[test]
fn test_counts_serialize_with_total() {
    let json = serde_json::to_value(NotificationCounts::new(2, 1, 3)).unwrap();
    assert_eq!(json["total"], 6);
    assert_eq!(json["unread_messages"], 2);
}

#[test]
fn test_memo_recomputes_only_on_change() {
    let mut aggregator = NotificationAggregator::new();
    let inbox = messages(&[false, true]);
    let testimonials = submissions(&[true]);
    let mut quotes = submissions(&[true, false]);

    let first = aggregator.counts(&inbox, &testimonials, &quotes);
    let again = aggregator.counts(&inbox.clone(), &testimonials, &quotes);
    assert_eq!(first, again);
    assert_eq!(aggregator.recomputations(), 1);

    quotes[1].pending = true;
    let changed = aggregator.counts(&inbox, &testimonials, &quotes);
    assert_eq!(changed.pending_quote_requests(), 2);
    assert_eq!(changed.total(), first.total() + 1);
    assert_eq!(aggregator.recomputations(), 2);

    let mut inbox = inbox;
    inbox.push(Message { id: 9, read: true });
    aggregator.counts(&inbox, &testimonials, &quotes);
    assert_eq!(aggregator.recomputations(), 3);

    aggregator.invalidate();
    aggregator.counts(&inbox, &testimonials, &quotes);
    assert_eq!(aggregator.recomputations(), 4);
}
