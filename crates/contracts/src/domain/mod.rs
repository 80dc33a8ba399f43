pub mod a001_waitlist_entry;
pub mod common;
