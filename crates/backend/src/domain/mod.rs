pub mod a001_waitlist_entry;
