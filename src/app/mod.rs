pub mod counters;
pub mod record_service;
