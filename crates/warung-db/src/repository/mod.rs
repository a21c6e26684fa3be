//! # Repository Module
//!
//! One repository per aggregate:
//!
//! - [`catalog`] - products (read-side; the catalog is owned elsewhere)
//! - [`customer`] - the people who can owe money
//! - [`sale`] - atomic checkout writes and readbacks
//! - [`receivable`] - outstanding balances and installment settlement
//! - [`report`] - date-ranged aggregation reads

pub mod catalog;
pub mod customer;
pub mod receivable;
pub mod report;
pub mod sale;
