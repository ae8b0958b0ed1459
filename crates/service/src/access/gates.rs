use chrono::{DateTime, Utc};

use super::errors::AccessError;
use super::principal::Principal;
use super::store::{AccessStore, SubscriptionState};

/// Resource-state gates a route can declare after the role check. Routes
/// declare zero, one, or both; they run in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Gate {
    /// Provider record must exist and carry `is_approved = true`.
    ProviderApproved,
    /// Provider must have at least one active, paid, unexpired subscription.
    ActiveSubscription,
}

/// True when a single subscription row satisfies the gate: active, paid,
/// and not past its end date. Historical, pending, or expired rows never
/// count, no matter how many there are.
pub fn satisfies_subscription(sub: &SubscriptionState, now: DateTime<Utc>) -> bool {
    sub.status == "Active" && sub.payment_status == "paid" && sub.end_date > now
}

/// Run one gate against the store. Read-only; a stale read (state changing
/// right after the check) is an accepted race, not a correctness bug.
pub async fn check<S: AccessStore>(
    store: &S,
    principal: &Principal,
    gate: Gate,
) -> Result<(), AccessError> {
    match gate {
        Gate::ProviderApproved => {
            let state = store
                .provider_state(principal.id)
                .await?
                .ok_or(AccessError::ProviderNotFound)?;
            if !state.approved {
                return Err(AccessError::ProviderNotApproved);
            }
            Ok(())
        }
        Gate::ActiveSubscription => {
            let state = store
                .provider_state(principal.id)
                .await?
                .ok_or(AccessError::ProviderNotFound)?;
            let now = Utc::now();
            let subs = store.subscription_states(state.id).await?;
            if subs.iter().any(|s| satisfies_subscription(s, now)) {
                Ok(())
            } else {
                Err(AccessError::SubscriptionRequired)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn sub(status: &str, payment: &str, days_from_now: i64) -> SubscriptionState {
        SubscriptionState {
            status: status.into(),
            payment_status: payment.into(),
            end_date: Utc::now() + Duration::days(days_from_now),
        }
    }

    #[test]
    fn only_active_paid_unexpired_counts() {
        let now = Utc::now();
        assert!(satisfies_subscription(&sub("Active", "paid", 30), now));
        assert!(!satisfies_subscription(&sub("Expired", "paid", 30), now));
        assert!(!satisfies_subscription(&sub("Cancelled", "paid", 30), now));
        assert!(!satisfies_subscription(&sub("Active", "pending", 30), now));
        assert!(!satisfies_subscription(&sub("Active", "refunded", 30), now));
        assert!(!satisfies_subscription(&sub("Active", "paid", -1), now));
    }
}
