//! # Application Store
//!
//! The single owner of the canonical in-memory collections.
//!
//! ## Write-Through Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         AppStore Data Flow                              │
//! │                                                                         │
//! │  Application boot                                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Integrity scrubber heals the Persisted Store                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Collections load into memory (the canonical state)                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  User action ──► mutation method ──► memory updated                    │
//! │                                          │                              │
//! │                                          ▼                              │
//! │                              affected collection(s) rewritten           │
//! │                              wholesale to the Persisted Store           │
//! │                              in the same call                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! There is exactly one logical writer (the UI thread of control), so no
//! locking discipline is needed; the only rule is that every write
//! supplies the full current snapshot of the collection it targets.

use chrono::Utc;
use tracing::{debug, info};

use aescompt_core::ids::new_record_id;
use aescompt_core::validation::{
    validate_amount, validate_payment, validate_stock_quantity, validate_text,
};
use aescompt_core::{
    BusinessType, CoreError, Debt, DebtStatus, Money, Product, ReceiptConfig, Severity, Supplier,
    Transaction, TransactionType, UserProfile, UserRole, DEFAULT_MIN_STOCK,
    DEFAULT_PAYMENT_METHOD, DEFAULT_PRODUCT_CATEGORY, DEFAULT_PRODUCT_UNIT,
    DEFAULT_TRANSACTION_CATEGORY,
};

use crate::audit::{AuditSink, AuditTrail};
use crate::collections::CollectionStore;
use crate::error::StoreResult;
use crate::kv::{KvStore, StoreConfig};
use crate::scrubber;

// =============================================================================
// Sign-In Defaults
// =============================================================================

/// Business name stamped onto a freshly created profile.
const DEFAULT_BUSINESS_NAME: &str = "AESCOMPT Business";

/// Location stamped onto a freshly created profile.
const DEFAULT_LOCATION: &str = "Bamako";

/// Receipt footer stamped onto a freshly created profile.
const DEFAULT_RECEIPT_FOOTER: &str = "Merci de votre fidélité !";

// =============================================================================
// Mutation Drafts
// =============================================================================

/// Input for recording a new transaction.
///
/// Identity, timestamp and label defaults are filled by the store, not
/// by callers.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub kind: TransactionType,
    pub amount: Money,
    pub description: String,
    /// Defaults to "Vente Directe".
    pub category: Option<String>,
    /// Defaults to "Cash".
    pub payment_method: Option<String>,
    pub customer_name: Option<String>,
    pub discount: Option<Money>,
    pub tax_amount: Option<Money>,
}

/// Input for adding a product to inventory.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub price: Money,
    pub purchase_price: Money,
    pub stock: i64,
    /// Defaults to [`DEFAULT_MIN_STOCK`].
    pub min_stock: Option<i64>,
    /// Defaults to "pcs".
    pub unit: Option<String>,
    /// Defaults to "Général".
    pub category: Option<String>,
    /// Stock-keeping identifier; derived from the record identity when
    /// absent. Becomes the QR payload, so it never changes afterwards.
    pub sku: Option<String>,
    pub image: Option<String>,
    pub qr_code: Option<String>,
}

/// Input for registering a customer debt.
#[derive(Debug, Clone)]
pub struct NewDebt {
    pub customer_name: String,
    pub phone: String,
    pub amount: Money,
    pub description: String,
    pub due_date: chrono::DateTime<Utc>,
}

/// Input for registering a supplier.
#[derive(Debug, Clone)]
pub struct NewSupplier {
    pub name: String,
    pub contact: String,
    pub category: String,
    pub address: String,
}

/// Input for the authentication flow's profile creation.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub role: UserRole,
}

// =============================================================================
// AppStore
// =============================================================================

/// Canonical application state plus its write-through persistence.
#[derive(Debug)]
pub struct AppStore {
    collections: CollectionStore,
    transactions: Vec<Transaction>,
    products: Vec<Product>,
    debts: Vec<Debt>,
    suppliers: Vec<Supplier>,
    profile: Option<UserProfile>,
    audit: AuditTrail,
}

impl AppStore {
    /// Opens the Persisted Store, heals it, and loads every collection
    /// into memory.
    ///
    /// The scrubber runs to completion before anything is loaded, so the
    /// in-memory state always starts from well-formed documents.
    pub async fn open(config: StoreConfig) -> StoreResult<Self> {
        let kv = KvStore::open(config).await?;
        Self::attach(kv).await
    }

    /// Heals and loads from an already-open key/value store.
    pub async fn attach(kv: KvStore) -> StoreResult<Self> {
        let mut audit = AuditTrail::new();
        scrubber::heal(&kv, &mut audit).await?;

        let collections = CollectionStore::new(kv);
        let transactions = collections.load_transactions().await?;
        let products = collections.load_products().await?;
        let debts = collections.load_debts().await?;
        let suppliers = collections.load_suppliers().await?;
        let profile = collections.load_profile().await?;

        info!(
            transactions = transactions.len(),
            products = products.len(),
            debts = debts.len(),
            suppliers = suppliers.len(),
            signed_in = profile.is_some(),
            "Application state loaded"
        );

        Ok(AppStore {
            collections,
            transactions,
            products,
            debts,
            suppliers,
            profile,
            audit,
        })
    }

    // -------------------------------------------------------------------------
    // Read Access
    // -------------------------------------------------------------------------

    /// All transactions, newest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// All products, in insertion order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// All debts, in insertion order.
    pub fn debts(&self) -> &[Debt] {
        &self.debts
    }

    /// All suppliers, in insertion order.
    pub fn suppliers(&self) -> &[Supplier] {
        &self.suppliers
    }

    /// The signed-in profile, if any.
    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// The session audit trail, newest first.
    pub fn audit_log(&self) -> &[aescompt_core::AuditEntry] {
        self.audit.entries()
    }

    /// Products at or below their low-stock threshold.
    pub fn low_stock_products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.is_low_stock())
    }

    /// Typed access to the underlying collections (for diagnostics and
    /// tests; normal callers go through the mutation methods).
    pub fn collections(&self) -> &CollectionStore {
        &self.collections
    }

    // -------------------------------------------------------------------------
    // Transactions
    // -------------------------------------------------------------------------

    /// Records a transaction: prepends it to the in-memory collection
    /// (newest first), persists the full snapshot, and appends a finance
    /// audit entry.
    pub async fn add_transaction(&mut self, draft: NewTransaction) -> StoreResult<Transaction> {
        validate_amount("amount", draft.amount).map_err(CoreError::from)?;
        validate_text("description", &draft.description).map_err(CoreError::from)?;

        let tx = Transaction {
            id: new_record_id(),
            date: Utc::now(),
            kind: draft.kind,
            amount: draft.amount,
            description: draft.description,
            category: draft
                .category
                .unwrap_or_else(|| DEFAULT_TRANSACTION_CATEGORY.to_string()),
            payment_method: draft
                .payment_method
                .unwrap_or_else(|| DEFAULT_PAYMENT_METHOD.to_string()),
            customer_name: draft.customer_name,
            discount: draft.discount,
            tax_amount: draft.tax_amount,
        };

        debug!(id = %tx.id, kind = ?tx.kind, amount = %tx.amount, "Recording transaction");

        self.transactions.insert(0, tx.clone());
        self.collections.save_transactions(&self.transactions).await?;

        let direction = if tx.kind.is_inflow() {
            "Encaissement"
        } else {
            "Décaissement"
        };
        self.audit.record(
            "Finance",
            &format!("{direction}: {}", tx.amount),
            Severity::Low,
        );

        Ok(tx)
    }

    // -------------------------------------------------------------------------
    // Inventory
    // -------------------------------------------------------------------------

    /// Adds a product to inventory and persists the collection.
    pub async fn add_product(&mut self, draft: NewProduct) -> StoreResult<Product> {
        validate_text("name", &draft.name).map_err(CoreError::from)?;
        validate_amount("price", draft.price).map_err(CoreError::from)?;
        validate_amount("purchase price", draft.purchase_price).map_err(CoreError::from)?;
        validate_stock_quantity(draft.stock).map_err(CoreError::from)?;

        let id = new_record_id();
        let product = Product {
            sku: draft
                .sku
                .unwrap_or_else(|| format!("AES-{}", &id[..8].to_uppercase())),
            id,
            name: draft.name,
            price: draft.price,
            purchase_price: draft.purchase_price,
            stock: draft.stock,
            min_stock: draft.min_stock.unwrap_or(DEFAULT_MIN_STOCK),
            unit: draft
                .unit
                .unwrap_or_else(|| DEFAULT_PRODUCT_UNIT.to_string()),
            category: draft
                .category
                .unwrap_or_else(|| DEFAULT_PRODUCT_CATEGORY.to_string()),
            image: draft.image,
            qr_code: draft.qr_code,
        };

        debug!(id = %product.id, sku = %product.sku, "Adding product");

        self.products.push(product.clone());
        self.collections.save_products(&self.products).await?;

        Ok(product)
    }

    /// Sets a product's stock to an absolute count (the result of a
    /// physical count or a scan), then persists.
    pub async fn set_stock(&mut self, product_id: &str, quantity: i64) -> StoreResult<Product> {
        validate_stock_quantity(quantity).map_err(CoreError::from)?;

        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or_else(|| CoreError::ProductNotFound(product_id.to_string()))?;

        product.stock = quantity;
        let updated = product.clone();

        self.collections.save_products(&self.products).await?;
        Ok(updated)
    }

    // -------------------------------------------------------------------------
    // Debts
    // -------------------------------------------------------------------------

    /// Registers a customer debt. The remaining amount starts equal to
    /// the original amount and the status starts pending.
    pub async fn add_debt(&mut self, draft: NewDebt) -> StoreResult<Debt> {
        validate_text("customer name", &draft.customer_name).map_err(CoreError::from)?;
        validate_payment("amount", draft.amount).map_err(CoreError::from)?;

        let debt = Debt {
            id: new_record_id(),
            customer_name: draft.customer_name,
            phone: draft.phone,
            amount: draft.amount,
            remaining_amount: draft.amount,
            description: draft.description,
            date: Utc::now(),
            due_date: draft.due_date,
            status: DebtStatus::Pending,
        };

        debug!(id = %debt.id, amount = %debt.amount, "Registering debt");

        self.debts.push(debt.clone());
        self.collections.save_debts(&self.debts).await?;

        Ok(debt)
    }

    /// Applies a repayment to a debt: the remaining amount clamps at
    /// zero and the status derives from it.
    pub async fn repay_debt(&mut self, debt_id: &str, payment: Money) -> StoreResult<Debt> {
        validate_payment("payment", payment).map_err(CoreError::from)?;

        let debt = self
            .debts
            .iter_mut()
            .find(|d| d.id == debt_id)
            .ok_or_else(|| CoreError::DebtNotFound(debt_id.to_string()))?;

        debt.apply_repayment(payment);
        let updated = debt.clone();

        debug!(id = %debt_id, remaining = %updated.remaining_amount, "Debt repayment applied");

        self.collections.save_debts(&self.debts).await?;
        Ok(updated)
    }

    // -------------------------------------------------------------------------
    // Suppliers
    // -------------------------------------------------------------------------

    /// Registers a supplier with zeroed business volume and balance.
    pub async fn add_supplier(&mut self, draft: NewSupplier) -> StoreResult<Supplier> {
        validate_text("name", &draft.name).map_err(CoreError::from)?;

        let supplier = Supplier {
            id: new_record_id(),
            name: draft.name,
            contact: draft.contact,
            category: draft.category,
            address: draft.address,
            total_business: Money::zero(),
            balance: Money::zero(),
            last_delivery: None,
        };

        debug!(id = %supplier.id, "Registering supplier");

        self.suppliers.push(supplier.clone());
        self.collections.save_suppliers(&self.suppliers).await?;

        Ok(supplier)
    }

    /// Applies a signed adjustment to a supplier's outstanding balance.
    pub async fn adjust_supplier_balance(
        &mut self,
        supplier_id: &str,
        delta: Money,
    ) -> StoreResult<Supplier> {
        let supplier = self
            .suppliers
            .iter_mut()
            .find(|s| s.id == supplier_id)
            .ok_or_else(|| CoreError::SupplierNotFound(supplier_id.to_string()))?;

        supplier.balance += delta;
        let updated = supplier.clone();

        self.collections.save_suppliers(&self.suppliers).await?;
        Ok(updated)
    }

    /// Records a delivery from a supplier: stamps the delivery date and
    /// accumulates the business volume.
    pub async fn record_delivery(
        &mut self,
        supplier_id: &str,
        amount: Money,
    ) -> StoreResult<Supplier> {
        validate_payment("delivery amount", amount).map_err(CoreError::from)?;

        let supplier = self
            .suppliers
            .iter_mut()
            .find(|s| s.id == supplier_id)
            .ok_or_else(|| CoreError::SupplierNotFound(supplier_id.to_string()))?;

        supplier.total_business += amount;
        supplier.last_delivery = Some(Utc::now());
        let updated = supplier.clone();

        self.collections.save_suppliers(&self.suppliers).await?;
        Ok(updated)
    }

    // -------------------------------------------------------------------------
    // User Profile
    // -------------------------------------------------------------------------

    /// Creates the singleton profile at sign-in and persists it.
    ///
    /// A fresh profile carries the standard business defaults; settings
    /// actions refine it afterwards.
    pub async fn sign_in(&mut self, draft: NewUser) -> StoreResult<UserProfile> {
        validate_text("name", &draft.name).map_err(CoreError::from)?;

        let profile = UserProfile {
            id: new_record_id(),
            name: draft.name,
            role: draft.role,
            business_name: DEFAULT_BUSINESS_NAME.to_string(),
            business_type: BusinessType::General,
            location: DEFAULT_LOCATION.to_string(),
            logo: None,
            is_simplified_mode: false,
            receipt_config: ReceiptConfig {
                header_note: Some(DEFAULT_BUSINESS_NAME.to_string()),
                footer_note: Some(DEFAULT_RECEIPT_FOOTER.to_string()),
                show_tax: None,
                show_qr: Some(true),
                logo: None,
            },
            learning_profile: Default::default(),
        };

        info!(name = %profile.name, role = ?profile.role, "User signed in");

        self.profile = Some(profile.clone());
        self.collections.save_profile(&profile).await?;

        Ok(profile)
    }

    /// Drops the in-memory profile. The persisted profile is left in
    /// place so the next sign-in on this device can restore the session.
    pub fn sign_out(&mut self) {
        info!("User signed out");
        self.profile = None;
    }

    /// Renames the business and persists the profile.
    pub async fn update_business_name(&mut self, name: &str) -> StoreResult<UserProfile> {
        validate_text("business name", name).map_err(CoreError::from)?;
        self.update_profile(|p| p.business_name = name.to_string())
            .await
    }

    /// Changes the business type and persists the profile.
    pub async fn update_business_type(&mut self, kind: BusinessType) -> StoreResult<UserProfile> {
        self.update_profile(|p| p.business_type = kind).await
    }

    /// Replaces the receipt configuration and persists the profile.
    pub async fn update_receipt_config(
        &mut self,
        config: ReceiptConfig,
    ) -> StoreResult<UserProfile> {
        self.update_profile(|p| p.receipt_config = config).await
    }

    /// Flips the simplified-mode flag and persists the profile.
    pub async fn toggle_simplified_mode(&mut self) -> StoreResult<UserProfile> {
        self.update_profile(|p| p.is_simplified_mode = !p.is_simplified_mode)
            .await
    }

    /// Changes the preferred language and persists the profile.
    pub async fn update_preferred_language(&mut self, language: &str) -> StoreResult<UserProfile> {
        validate_text("language", language).map_err(CoreError::from)?;
        self.update_profile(|p| p.learning_profile.preferred_language = language.to_string())
            .await
    }

    /// Shared settings-mutation path: apply the change in memory, then
    /// persist the whole profile document.
    async fn update_profile(
        &mut self,
        apply: impl FnOnce(&mut UserProfile),
    ) -> StoreResult<UserProfile> {
        let profile = self.profile.as_mut().ok_or(CoreError::NotSignedIn)?;
        apply(profile);
        let updated = profile.clone();

        self.collections.save_profile(&updated).await?;
        Ok(updated)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::TRANSACTIONS_KEY;
    use crate::error::StoreError;

    async fn open_store() -> AppStore {
        AppStore::open(StoreConfig::in_memory()).await.unwrap()
    }

    fn sale(amount: i64) -> NewTransaction {
        NewTransaction {
            kind: TransactionType::Sale,
            amount: Money::from_francs(amount),
            description: "Vente comptoir".to_string(),
            category: None,
            payment_method: None,
            customer_name: None,
            discount: None,
            tax_amount: None,
        }
    }

    #[tokio::test]
    async fn test_add_transaction_defaults_and_persists() {
        let mut store = open_store().await;

        let tx = store.add_transaction(sale(2500)).await.unwrap();
        assert_eq!(tx.category, "Vente Directe");
        assert_eq!(tx.payment_method, "Cash");

        // The full snapshot was written through
        let persisted = store.collections().load_transactions().await.unwrap();
        assert_eq!(persisted.len(), 1);
        assert_eq!(persisted[0], tx);
    }

    #[tokio::test]
    async fn test_transactions_are_newest_first() {
        let mut store = open_store().await;

        let first = store.add_transaction(sale(100)).await.unwrap();
        let second = store.add_transaction(sale(200)).await.unwrap();

        assert_eq!(store.transactions()[0].id, second.id);
        assert_eq!(store.transactions()[1].id, first.id);
    }

    #[tokio::test]
    async fn test_finance_audit_entries() {
        let mut store = open_store().await;

        store.add_transaction(sale(500)).await.unwrap();
        store
            .add_transaction(NewTransaction {
                kind: TransactionType::Expense,
                ..sale(200)
            })
            .await
            .unwrap();

        let log = store.audit_log();
        assert_eq!(log.len(), 2);
        // Newest first: the expense is on top
        assert_eq!(log[0].details, "Décaissement: 200 F");
        assert_eq!(log[1].details, "Encaissement: 500 F");
        assert!(log.iter().all(|e| e.action == "Finance"));
        assert!(log.iter().all(|e| e.severity == Severity::Low));
    }

    #[tokio::test]
    async fn test_negative_amount_rejected() {
        let mut store = open_store().await;

        let err = store
            .add_transaction(sale(-100))
            .await
            .expect_err("negative amount must be rejected");
        assert!(matches!(err, StoreError::Core(CoreError::Validation(_))));

        // Nothing was recorded or persisted
        assert!(store.transactions().is_empty());
        assert!(store.audit_log().is_empty());
    }

    #[tokio::test]
    async fn test_product_lifecycle() {
        let mut store = open_store().await;

        let product = store
            .add_product(NewProduct {
                name: "Savon 200g".to_string(),
                price: Money::from_francs(500),
                purchase_price: Money::from_francs(350),
                stock: 20,
                min_stock: None,
                unit: None,
                category: None,
                sku: None,
                image: None,
                qr_code: None,
            })
            .await
            .unwrap();

        assert_eq!(product.min_stock, DEFAULT_MIN_STOCK);
        assert_eq!(product.unit, "pcs");
        assert!(product.sku.starts_with("AES-"));
        assert!(!product.is_low_stock());

        let updated = store.set_stock(&product.id, 3).await.unwrap();
        assert!(updated.is_low_stock());
        assert_eq!(store.low_stock_products().count(), 1);

        let persisted = store.collections().load_products().await.unwrap();
        assert_eq!(persisted[0].stock, 3);
    }

    #[tokio::test]
    async fn test_set_stock_unknown_product() {
        let mut store = open_store().await;
        let err = store.set_stock("missing", 5).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::ProductNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_debt_repayment_flow() {
        let mut store = open_store().await;

        let debt = store
            .add_debt(NewDebt {
                customer_name: "Awa Traoré".to_string(),
                phone: "+223 70 11 22 33".to_string(),
                amount: Money::from_francs(1000),
                description: "Riz 25kg".to_string(),
                due_date: Utc::now(),
            })
            .await
            .unwrap();

        assert_eq!(debt.remaining_amount, debt.amount);
        assert_eq!(debt.status, DebtStatus::Pending);

        let after_partial = store
            .repay_debt(&debt.id, Money::from_francs(400))
            .await
            .unwrap();
        assert_eq!(after_partial.remaining_amount, Money::from_francs(600));
        assert_eq!(after_partial.status, DebtStatus::Pending);

        // Overpayment clamps at zero and settles the debt
        let settled = store
            .repay_debt(&debt.id, Money::from_francs(900))
            .await
            .unwrap();
        assert_eq!(settled.remaining_amount, Money::zero());
        assert_eq!(settled.status, DebtStatus::Paid);

        let persisted = store.collections().load_debts().await.unwrap();
        assert_eq!(persisted[0].status, DebtStatus::Paid);
    }

    #[tokio::test]
    async fn test_supplier_balance_and_delivery() {
        let mut store = open_store().await;

        let supplier = store
            .add_supplier(NewSupplier {
                name: "Mali Distribution".to_string(),
                contact: "+223 66 00 00 00".to_string(),
                category: "Boissons".to_string(),
                address: "Zone Industrielle, Bamako".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(supplier.balance, Money::zero());
        assert_eq!(supplier.last_delivery, None);

        let after_credit = store
            .adjust_supplier_balance(&supplier.id, Money::from_francs(30_000))
            .await
            .unwrap();
        assert_eq!(after_credit.balance, Money::from_francs(30_000));

        // Negative delta: paying the supplier down
        let after_payment = store
            .adjust_supplier_balance(&supplier.id, Money::from_francs(-10_000))
            .await
            .unwrap();
        assert_eq!(after_payment.balance, Money::from_francs(20_000));

        let after_delivery = store
            .record_delivery(&supplier.id, Money::from_francs(50_000))
            .await
            .unwrap();
        assert_eq!(after_delivery.total_business, Money::from_francs(50_000));
        assert!(after_delivery.last_delivery.is_some());

        let persisted = store.collections().load_suppliers().await.unwrap();
        assert_eq!(persisted[0].balance, Money::from_francs(20_000));
    }

    #[tokio::test]
    async fn test_profile_lifecycle() {
        let mut store = open_store().await;
        assert!(store.profile().is_none());

        let profile = store
            .sign_in(NewUser {
                name: "Fatou".to_string(),
                role: UserRole::Owner,
            })
            .await
            .unwrap();

        assert_eq!(profile.business_name, "AESCOMPT Business");
        assert_eq!(profile.location, "Bamako");
        assert_eq!(profile.receipt_config.show_qr, Some(true));

        store.update_business_name("Chez Fatou").await.unwrap();
        store
            .update_business_type(BusinessType::Boutique)
            .await
            .unwrap();
        let toggled = store.toggle_simplified_mode().await.unwrap();
        assert!(toggled.is_simplified_mode);

        let persisted = store.collections().load_profile().await.unwrap().unwrap();
        assert_eq!(persisted.business_name, "Chez Fatou");
        assert_eq!(persisted.business_type, BusinessType::Boutique);

        // Sign-out drops memory but keeps the persisted profile
        store.sign_out();
        assert!(store.profile().is_none());
        assert!(store.collections().load_profile().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_settings_require_sign_in() {
        let mut store = open_store().await;
        let err = store.update_business_name("Chez Fatou").await.unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::NotSignedIn)));
    }

    #[tokio::test]
    async fn test_open_heals_before_loading() {
        // Seed a store with a corrupted collection and duplicate
        // transactions, then attach the AppStore to it.
        let kv = KvStore::open(StoreConfig::in_memory()).await.unwrap();
        kv.save("aes_products", "corrupted beyond repair").await.unwrap();

        let tx = |id: &str, amount: i64| Transaction {
            id: id.to_string(),
            date: Utc::now(),
            kind: TransactionType::Sale,
            amount: Money::from_francs(amount),
            description: "Vente comptoir".to_string(),
            category: "Vente Directe".to_string(),
            payment_method: "Cash".to_string(),
            customer_name: None,
            discount: None,
            tax_amount: None,
        };
        kv.save(
            TRANSACTIONS_KEY,
            &serde_json::to_string(&[tx("A1", 100), tx("A1", 500), tx("B2", 200)]).unwrap(),
        )
        .await
        .unwrap();

        let store = AppStore::attach(kv).await.unwrap();

        // Corrupted products were reset, duplicates collapsed
        assert!(store.products().is_empty());
        assert_eq!(store.transactions().len(), 2);
        assert_eq!(store.transactions()[0].amount, Money::from_francs(500));

        // Exactly one aggregated system entry for the two repairs
        assert_eq!(store.audit_log().len(), 1);
        assert_eq!(store.audit_log()[0].action, "Système");
        assert_eq!(store.audit_log()[0].severity, Severity::Medium);
        assert!(store.audit_log()[0]
            .details
            .contains("2 anomalies structurelles"));
    }
}
