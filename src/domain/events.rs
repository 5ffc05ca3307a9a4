//! Event-type vocabulary shared by producers and endpoint registrations.
//!
//! Names follow the `<entity>.<action>` convention. The dispatch path
//! treats event types as opaque strings matched exactly, so this catalog
//! is the convention's single home rather than a closed enum.

// ============================================================================
// Organization events
// ============================================================================

pub const BRANCH_CREATED: &str = "branch.created";
pub const BRANCH_UPDATED: &str = "branch.updated";
pub const BRANCH_DELETED: &str = "branch.deleted";

pub const MEMBER_CREATED: &str = "member.created";
pub const MEMBER_UPDATED: &str = "member.updated";

// ============================================================================
// Finance events
// ============================================================================

pub const PAYMENT_CREATED: &str = "payment.created";

pub const DEPOSIT_CREATED: &str = "deposit.created";
pub const DEPOSIT_UPDATED: &str = "deposit.updated";
pub const MEMBER_DEPOSIT_CREATED: &str = "member_deposit.created";

pub const LOAN_CREATED: &str = "loan.created";
pub const LOAN_UPDATED: &str = "loan.updated";
pub const MEMBER_LOAN_CREATED: &str = "member_loan.created";

// ============================================================================
// Communication events
// ============================================================================

pub const ANNOUNCEMENT_CREATED: &str = "announcement.created";
pub const ANNOUNCEMENT_UPDATED: &str = "announcement.updated";

pub const EVENT_CREATED: &str = "event.created";
pub const EVENT_UPDATED: &str = "event.updated";

pub const DOCUMENT_UPLOADED: &str = "document.uploaded";

pub const MINUTE_CREATED: &str = "minute.created";
pub const MINUTE_UPDATED: &str = "minute.updated";

pub const FEEDBACK_CREATED: &str = "feedback.created";

pub const MESSAGE_SENT: &str = "message.sent";
pub const MESSAGE_READ: &str = "message.read";

/// Every event type the system emits, in catalog order. Used for
/// catch-all registrations and sanity checks.
pub const ALL_EVENT_TYPES: &[&str] = &[
    BRANCH_CREATED,
    BRANCH_UPDATED,
    BRANCH_DELETED,
    MEMBER_CREATED,
    MEMBER_UPDATED,
    PAYMENT_CREATED,
    DEPOSIT_CREATED,
    DEPOSIT_UPDATED,
    MEMBER_DEPOSIT_CREATED,
    LOAN_CREATED,
    LOAN_UPDATED,
    MEMBER_LOAN_CREATED,
    ANNOUNCEMENT_CREATED,
    ANNOUNCEMENT_UPDATED,
    EVENT_CREATED,
    EVENT_UPDATED,
    DOCUMENT_UPLOADED,
    MINUTE_CREATED,
    MINUTE_UPDATED,
    FEEDBACK_CREATED,
    MESSAGE_SENT,
    MESSAGE_READ,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_types_follow_naming_convention() {
        for event_type in ALL_EVENT_TYPES {
            let mut parts = event_type.splitn(2, '.');
            let entity = parts.next().unwrap_or_default();
            let action = parts.next().unwrap_or_default();

            assert!(!entity.is_empty(), "bad event type: {event_type}");
            assert!(!action.is_empty(), "bad event type: {event_type}");
            assert_eq!(*event_type, event_type.to_lowercase());
        }
    }

    #[test]
    fn test_catalog_has_no_duplicates() {
        let mut seen = std::collections::HashSet::new();
        for event_type in ALL_EVENT_TYPES {
            assert!(seen.insert(event_type), "duplicate event type: {event_type}");
        }
    }
}
