// Storage layer for persistent data

pub mod database;
pub mod expenses;

pub use database::Database;
pub use expenses::{CategoryTotal, Expense, ExpenseRepository};
