//! Background services

pub mod scheduled_checkout;
