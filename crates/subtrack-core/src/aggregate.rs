//! Total-cost aggregation
//!
//! Price is a monthly rate: each subscription contributes its price times the
//! number of months between its start and end.

use subtrack_types::Subscription;

/// Aggregated cost over a set of subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TotalCost {
    pub total: i64,
    /// Number of subscriptions that contributed
    pub count: usize,
}

/// Cost of one subscription over its active months
pub fn subscription_cost(sub: &Subscription) -> i64 {
    i64::from(sub.price) * i64::from(sub.active_months())
}

/// Sum the cost of every subscription
pub fn total_cost(subs: &[Subscription]) -> TotalCost {
    TotalCost {
        total: subs.iter().map(subscription_cost).sum(),
        count: subs.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use subtrack_types::{Period, SubscriptionId, UserId};

    fn sub(price: i32, start: Period, end: Period) -> Subscription {
        Subscription {
            id: SubscriptionId(1),
            service_name: "Yandex".to_string(),
            price,
            user_id: UserId::new(),
            start,
            end,
        }
    }

    #[test]
    fn test_cost_is_price_times_months() {
        let s = sub(400, Period::new(12, 2025), Period::new(8, 2026));
        assert_eq!(subscription_cost(&s), 3200);
    }

    #[test]
    fn test_total_sums_subscriptions() {
        let subs = vec![
            sub(100, Period::new(1, 2026), Period::new(2, 2026)),
            sub(250, Period::new(1, 2026), Period::new(5, 2026)),
        ];
        assert_eq!(total_cost(&subs), TotalCost { total: 1100, count: 2 });
    }

    #[test]
    fn test_empty_total_is_zero() {
        assert_eq!(total_cost(&[]), TotalCost::default());
    }

    proptest! {
        #[test]
        fn prop_total_is_additive(
            a in 0..10_000i32,
            b in 0..10_000i32,
            months_a in 1..240i32,
            months_b in 1..240i32,
        ) {
            let start = Period::new(1, 2000);
            let x = sub(a, start, start.add_months(0, months_a));
            let y = sub(b, start, start.add_months(0, months_b));

            let combined = total_cost(&[x.clone(), y.clone()]).total;
            prop_assert_eq!(combined, total_cost(&[x]).total + total_cost(&[y]).total);
        }
    }
}
