use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

/// A loaded foreign reference: the referenced record's primary key plus
/// its human-readable display form
#[derive(Debug, Clone, PartialEq)]
pub struct RecordRef {
    pub key: i64,
    pub display: String,
}

impl RecordRef {
    pub fn new(key: i64, display: impl Into<String>) -> Self {
        Self {
            key,
            display: display.into(),
        }
    }
}

/// Semantically typed field value, the unit the payload serializer
/// dispatches on
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(Option<String>),
    Integer(Option<i64>),
    /// Canonical decimal string, e.g. "2500.00"; money never travels as a float
    Decimal(Option<String>),
    Boolean(Option<bool>),
    Date(Option<NaiveDate>),
    DateTime(Option<DateTime<Utc>>),
    Reference(Option<RecordRef>),
    /// Resolved public URL of an uploaded file or image
    File(Option<String>),
    /// Passthrough for anything without a dedicated semantic type
    Json(Value),
}

/// One declared field of a domain record
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub value: FieldValue,
}

impl Field {
    pub fn new(name: &'static str, value: FieldValue) -> Self {
        Self { name, value }
    }

    pub fn text(name: &'static str, value: impl Into<Option<String>>) -> Self {
        Self::new(name, FieldValue::Text(value.into()))
    }

    pub fn integer(name: &'static str, value: impl Into<Option<i64>>) -> Self {
        Self::new(name, FieldValue::Integer(value.into()))
    }

    pub fn decimal(name: &'static str, value: impl Into<Option<String>>) -> Self {
        Self::new(name, FieldValue::Decimal(value.into()))
    }

    pub fn boolean(name: &'static str, value: impl Into<Option<bool>>) -> Self {
        Self::new(name, FieldValue::Boolean(value.into()))
    }

    pub fn date(name: &'static str, value: impl Into<Option<NaiveDate>>) -> Self {
        Self::new(name, FieldValue::Date(value.into()))
    }

    pub fn date_time(name: &'static str, value: impl Into<Option<DateTime<Utc>>>) -> Self {
        Self::new(name, FieldValue::DateTime(value.into()))
    }

    pub fn reference(name: &'static str, value: impl Into<Option<RecordRef>>) -> Self {
        Self::new(name, FieldValue::Reference(value.into()))
    }

    pub fn file(name: &'static str, value: impl Into<Option<String>>) -> Self {
        Self::new(name, FieldValue::File(value.into()))
    }

    pub fn json(name: &'static str, value: Value) -> Self {
        Self::new(name, FieldValue::Json(value))
    }
}

/// A domain record observable through webhooks.
///
/// Each entity declares its fields as an explicit table instead of being
/// introspected at runtime; the serializer walks the table in declaration
/// order, which keeps the produced document stable for a given state.
pub trait Record: Send + Sync {
    /// Declared fields in serialization order
    fn fields(&self) -> Vec<Field>;

    /// Creation timestamp, for records that carry one. The event envelope
    /// puts a null timestamp on events for records that do not.
    fn created_at(&self) -> Option<DateTime<Utc>> {
        None
    }
}

// ============================================================================
// Organization records
// ============================================================================

/// An organizational branch; branches form a tree via `branch_parent`
#[derive(Debug, Clone)]
pub struct Branch {
    pub branch_id: i64,
    pub branch_name: String,
    pub contact_email: Option<String>,
    pub branch_parent: Option<RecordRef>,
    pub branch_logo: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Record for Branch {
    fn fields(&self) -> Vec<Field> {
        vec![
            Field::integer("branch_id", self.branch_id),
            Field::text("branch_name", self.branch_name.clone()),
            Field::text("contact_email", self.contact_email.clone()),
            Field::reference("branch_parent", self.branch_parent.clone()),
            Field::file("branch_logo", self.branch_logo.clone()),
            Field::date_time("created_at", self.created_at),
        ]
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}

/// A registered member; carries no creation timestamp of its own
#[derive(Debug, Clone)]
pub struct Member {
    pub id: i64,
    pub username: String,
    pub branch: Option<RecordRef>,
    pub phone_number: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub status: String,
    pub bio: Option<String>,
    pub profile_pic: Option<String>,
}

impl Record for Member {
    fn fields(&self) -> Vec<Field> {
        vec![
            Field::integer("id", self.id),
            Field::text("username", self.username.clone()),
            Field::reference("branch", self.branch.clone()),
            Field::text("phone_number", self.phone_number.clone()),
            Field::date("birthday", self.birthday),
            Field::text("status", self.status.clone()),
            Field::text("bio", self.bio.clone()),
            Field::file("profile_pic", self.profile_pic.clone()),
        ]
    }
}

// ============================================================================
// Finance records
// ============================================================================

/// A loan product offered by a branch
#[derive(Debug, Clone)]
pub struct Loan {
    pub loan_id: i64,
    pub loan_name: String,
    pub loan_branch: Option<RecordRef>,
    pub interest_rate: f64,
    pub is_active: bool,
    pub status: String,
}

impl Record for Loan {
    fn fields(&self) -> Vec<Field> {
        vec![
            Field::integer("loan_id", self.loan_id),
            Field::text("loan_name", self.loan_name.clone()),
            Field::reference("loan_branch", self.loan_branch.clone()),
            Field::json("interest_rate", self.interest_rate.into()),
            Field::boolean("is_active", self.is_active),
            Field::text("status", self.status.clone()),
        ]
    }
}

/// A payment recorded against a member's account
#[derive(Debug, Clone)]
pub struct MemberPayment {
    pub payment_id: i64,
    pub member: RecordRef,
    pub payment_amount: String,
    pub payment_date: NaiveDate,
    pub created_by: Option<RecordRef>,
    pub created_at: DateTime<Utc>,
}

impl Record for MemberPayment {
    fn fields(&self) -> Vec<Field> {
        vec![
            Field::integer("payment_id", self.payment_id),
            Field::reference("member", self.member.clone()),
            Field::decimal("payment_amount", self.payment_amount.clone()),
            Field::date("payment_date", self.payment_date),
            Field::reference("created_by", self.created_by.clone()),
            Field::date_time("created_at", self.created_at),
        ]
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}

// ============================================================================
// Communication records
// ============================================================================

/// A branch-scoped announcement with a display window
#[derive(Debug, Clone)]
pub struct Announcement {
    pub announcement_id: i64,
    pub title: String,
    pub content: String,
    pub branch: Option<RecordRef>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_by: Option<RecordRef>,
    pub created_at: DateTime<Utc>,
}

impl Record for Announcement {
    fn fields(&self) -> Vec<Field> {
        vec![
            Field::integer("announcement_id", self.announcement_id),
            Field::text("title", self.title.clone()),
            Field::text("content", self.content.clone()),
            Field::reference("branch", self.branch.clone()),
            Field::date("start_date", self.start_date),
            Field::date("end_date", self.end_date),
            Field::reference("created_by", self.created_by.clone()),
            Field::date_time("created_at", self.created_at),
        ]
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}

/// A direct message between two members
#[derive(Debug, Clone)]
pub struct Message {
    pub message_id: i64,
    pub sender: RecordRef,
    pub recipient: RecordRef,
    pub subject: Option<String>,
    pub body: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Record for Message {
    fn fields(&self) -> Vec<Field> {
        vec![
            Field::integer("message_id", self.message_id),
            Field::reference("sender", self.sender.clone()),
            Field::reference("recipient", self.recipient.clone()),
            Field::text("subject", self.subject.clone()),
            Field::text("body", self.body.clone()),
            Field::boolean("is_read", self.is_read),
            Field::date_time("created_at", self.created_at),
        ]
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        Some(self.created_at)
    }
}
