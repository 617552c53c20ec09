//! # Domain Types
//!
//! Core domain types used throughout AESCOMPT.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  Transaction    │   │    Product      │   │     Debt        │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  kind           │   │  sku (QR load)  │   │  amount         │       │
//! │  │  amount         │   │  stock/minStock │   │  remaining      │       │
//! │  │  date           │   │  price          │   │  status         │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Supplier      │   │  UserProfile    │   │   AuditEntry    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  balance        │   │  singleton      │   │  append-only    │       │
//! │  │  totalBusiness  │   │  receiptConfig  │   │  severity       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! Every type serializes with camelCase field names because the persisted
//! collection documents use that convention. Optional fields carry
//! `#[serde(default)]` so defaulting happens exactly once, at decode time,
//! instead of being scattered through consuming code.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Transaction
// =============================================================================

/// The business meaning of a recorded transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    /// Money in: a counter sale.
    Sale,
    /// Money out: stock purchased from a supplier.
    Purchase,
    /// Money out: an operating expense.
    Expense,
    /// Money in: a customer paying down a credit debt.
    CreditRepayment,
    /// Money out: settling a supplier balance.
    SupplierPayment,
    /// Money out: community/social contribution.
    SocialContribution,
}

impl TransactionType {
    /// Whether this transaction brings money into the till.
    pub const fn is_inflow(&self) -> bool {
        matches!(self, TransactionType::Sale | TransactionType::CreditRepayment)
    }
}

/// A recorded sale, purchase or expense.
///
/// Transactions are immutable once created: there is no update path, only
/// the append into the transactions collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// When the transaction was recorded.
    pub date: DateTime<Utc>,

    /// Business meaning of the transaction.
    #[serde(rename = "type")]
    pub kind: TransactionType,

    /// Amount in whole francs. Never negative.
    pub amount: Money,

    /// Free-text description.
    pub description: String,

    /// Category label (defaults to "Vente Directe").
    pub category: String,

    /// Payment method label (defaults to "Cash").
    pub payment_method: String,

    /// Customer name, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,

    /// Discount granted on this transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount: Option<Money>,

    /// Tax portion of the amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<Money>,
}

// =============================================================================
// Product
// =============================================================================

/// A product tracked in inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Sale price in francs.
    pub price: Money,

    /// Purchase (cost) price in francs.
    pub purchase_price: Money,

    /// Current stock level, in `unit`s.
    pub stock: i64,

    /// Low-stock alarm threshold.
    pub min_stock: i64,

    /// Unit label ("pcs", "kg", ...).
    pub unit: String,

    /// Category label.
    pub category: String,

    /// Stock-keeping identifier. This is the payload encoded into the
    /// product's QR code, so it must stay stable for the product's lifetime.
    pub sku: String,

    /// Product photo (data URL), if one was captured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Rendered QR code image (data URL), if one was generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
}

impl Product {
    /// Whether the product has hit its low-stock alarm.
    ///
    /// This is a derived read-only view (`stock <= min_stock`), never
    /// stored as an authoritative flag.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }

    /// Gross margin per unit (sale price minus purchase price).
    #[inline]
    pub fn unit_margin(&self) -> Money {
        self.price - self.purchase_price
    }
}

// =============================================================================
// Debt
// =============================================================================

/// Settlement state of a customer debt.
///
/// Derived, never set directly: `Paid` exactly when the remaining
/// amount reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebtStatus {
    /// Some amount is still owed.
    Pending,
    /// Fully repaid.
    Paid,
}

/// A customer credit debt.
///
/// ## Invariants
/// - `0 <= remaining_amount <= amount` at all times
/// - `status == Paid` iff `remaining_amount` is zero
///
/// Both are maintained by [`Debt::apply_repayment`], the only mutation path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Debt {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Customer name.
    pub customer_name: String,

    /// Customer phone contact.
    pub phone: String,

    /// Original debt amount.
    pub amount: Money,

    /// Amount still owed. Monotonically non-increasing, floored at zero.
    pub remaining_amount: Money,

    /// Free-text description of what was bought on credit.
    pub description: String,

    /// When the debt was created.
    pub date: DateTime<Utc>,

    /// Agreed repayment deadline.
    pub due_date: DateTime<Utc>,

    /// Settlement state, derived from `remaining_amount`.
    pub status: DebtStatus,
}

impl Debt {
    /// Applies a repayment, clamping the remaining amount at zero and
    /// re-deriving the status.
    ///
    /// ## Example
    /// ```rust
    /// # use aescompt_core::{Debt, DebtStatus, Money};
    /// # use chrono::Utc;
    /// let mut debt = Debt {
    ///     id: "d1".into(),
    ///     customer_name: "Awa".into(),
    ///     phone: "+223 70 00 00 00".into(),
    ///     amount: Money::from_francs(1000),
    ///     remaining_amount: Money::from_francs(1000),
    ///     description: "Riz 25kg".into(),
    ///     date: Utc::now(),
    ///     due_date: Utc::now(),
    ///     status: DebtStatus::Pending,
    /// };
    ///
    /// debt.apply_repayment(Money::from_francs(400));
    /// assert_eq!(debt.remaining_amount, Money::from_francs(600));
    /// assert_eq!(debt.status, DebtStatus::Pending);
    ///
    /// debt.apply_repayment(Money::from_francs(600));
    /// assert_eq!(debt.status, DebtStatus::Paid);
    /// ```
    pub fn apply_repayment(&mut self, payment: Money) {
        self.remaining_amount = self.remaining_amount.deduct_clamped(payment);
        self.status = if self.remaining_amount.is_zero() {
            DebtStatus::Paid
        } else {
            DebtStatus::Pending
        };
    }

    /// Whether the debt is fully repaid.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.status == DebtStatus::Paid
    }
}

// =============================================================================
// Supplier
// =============================================================================

/// A supplier/partner the business buys from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Supplier name.
    pub name: String,

    /// Phone or other contact.
    pub contact: String,

    /// What the supplier provides.
    pub category: String,

    /// Physical address.
    pub address: String,

    /// Cumulative business volume with this supplier.
    pub total_business: Money,

    /// Outstanding balance. Positive means the business owes the
    /// supplier; adjustments are signed deltas, so it can go negative
    /// (supplier credit).
    pub balance: Money,

    /// Date of the most recent delivery, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_delivery: Option<DateTime<Utc>>,
}

// =============================================================================
// User Profile
// =============================================================================

/// Role of the signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Owner,
    Manager,
    Cashier,
}

/// Kind of business the profile describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessType {
    Boutique,
    Restaurant,
    Hotel,
    Supermarket,
    General,
    Warehouse,
}

/// Receipt layout configuration.
///
/// Every field is optional with a declared default so that older
/// persisted profiles missing a field decode cleanly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptConfig {
    /// Text printed above the line items.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_note: Option<String>,

    /// Text printed below the totals.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer_note: Option<String>,

    /// Whether to print the tax breakdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_tax: Option<bool>,

    /// Whether to print the receipt QR code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub show_qr: Option<bool>,

    /// Receipt logo (data URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

/// Language and interaction preferences attached to the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningProfile {
    /// Preferred interface/assistant language.
    pub preferred_language: String,
}

impl Default for LearningProfile {
    fn default() -> Self {
        LearningProfile {
            preferred_language: "Français".to_string(),
        }
    }
}

/// The singleton user profile.
///
/// Created once at sign-in, mutated by settings actions, never deleted
/// within a session. Absent from the Persisted Store exactly when no
/// user has ever authenticated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// User role.
    pub role: UserRole,

    /// Business name shown in the header and on receipts.
    pub business_name: String,

    /// Kind of business.
    pub business_type: BusinessType,

    /// City/location label.
    pub location: String,

    /// Business logo (data URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,

    /// Whether the simplified single-screen mode is active.
    pub is_simplified_mode: bool,

    /// Receipt layout configuration.
    #[serde(default)]
    pub receipt_config: ReceiptConfig,

    /// Language preferences.
    #[serde(default)]
    pub learning_profile: LearningProfile,
}

// =============================================================================
// Audit Log
// =============================================================================

/// Severity of an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// One entry in the append-only audit log.
///
/// Produced by both user actions (finance entries) and the integrity
/// scrubber's healing step. The log is kept newest-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEntry {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// When the entry was recorded.
    pub timestamp: DateTime<Utc>,

    /// Short action label ("Finance", "Système", ...).
    pub action: String,

    /// Human-readable detail text.
    pub details: String,

    /// Severity of the event.
    pub severity: Severity,
}

// =============================================================================
// Unit Tests
// =============================================================================
