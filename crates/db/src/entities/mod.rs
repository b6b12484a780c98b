//! `SeaORM` entity definitions.

pub mod sea_orm_active_enums;

pub mod classification_rules;
pub mod credit_payments;
pub mod expense_categories;
pub mod income_categories;
pub mod manual_expenses;
pub mod manual_revenues;
pub mod opening_balances;
pub mod operations;
pub mod sales;
pub mod statement_expenses;
