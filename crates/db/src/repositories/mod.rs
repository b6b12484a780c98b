//! Repository abstractions for data access.

pub mod category;
pub mod credit_payment;
pub mod finance;
pub mod manual_entry;
pub mod opening_balance;
pub mod operation;
pub mod rule;
pub mod sale;
pub mod statement;

pub use category::CategoryRepository;
pub use credit_payment::CreditPaymentRepository;
pub use finance::FinanceRepository;
pub use manual_entry::ManualEntryRepository;
pub use opening_balance::OpeningBalanceRepository;
pub use operation::OperationRepository;
pub use rule::RuleRepository;
pub use sale::SaleRepository;
pub use statement::StatementRepository;
