//! Order policy configuration.
//!
//! Orders historically accept any status change and keep `total_price` as a value the
//! caller maintains. Both behaviours can be tightened through environment variables:
//!
//! * `ORDER_STRICT_STATUS` - only allow `NEW -> IN_PROGRESS -> DONE`
//! * `ORDER_RECOMPUTE_TOTAL` - derive `total_price` from the line items on every change
//!
//! Accepted truthy values are `1`, `true`, `yes` and `on` (case-insensitive).
//!
//! The `shop-store` binary only prepares the schema and seeds the catalog, so it never
//! reads these variables. Code embedding the store loads the policy with
//! [`OrderPolicy::from_env`] and passes it to the order and catalog operations.

use tracing::debug;

/// Flags controlling how strictly the order aggregate behaves.
///
/// The default keeps the permissive behaviour: unguarded status and a caller-set total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderPolicy {
    /// Reject status changes that leave the forward path
    pub strict_status: bool,
    /// Recompute `total_price` as the sum of `quantity * price` after line item changes
    pub recompute_total: bool,
}

impl OrderPolicy {
    /// Policy with both guards switched on.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            strict_status: true,
            recompute_total: true,
        }
    }

    /// Reads the policy from `ORDER_STRICT_STATUS` and `ORDER_RECOMPUTE_TOTAL`.
    #[must_use]
    pub fn from_env() -> Self {
        let policy = Self {
            strict_status: env_flag("ORDER_STRICT_STATUS"),
            recompute_total: env_flag("ORDER_RECOMPUTE_TOTAL"),
        };
        debug!(?policy, "Loaded order policy");
        policy
    }
}

fn env_flag(key: &str) -> bool {
    std::env::var(key).is_ok_and(|value| parse_flag(&value))
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
