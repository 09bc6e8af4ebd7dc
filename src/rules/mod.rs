//! Business rules for the clinic, F&B and wallet modules.
//!
//! These are pure functions over model records. Persistence and
//! tenant lookup happen in the API layer inside store transactions.

mod codes;
mod credit_ledger;
mod line_items;
mod timer_accounting;
mod vip_discount;

pub use codes::CodeKind;
pub use credit_ledger::{approve_request, reject_request, spend_credit, submit_request};
pub use line_items::{LineItem, items_total, line_total};
pub use timer_accounting::{
    billable_seconds, pause_timer, resume_timer, start_timer, stop_timer, timer_charge,
};
pub use vip_discount::{apply_vip_discount, validate_discount_percent, vip_discount_percent};
