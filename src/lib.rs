pub mod config;
pub mod error;
pub mod google_calendar;
pub mod handlers;
pub mod startup;
