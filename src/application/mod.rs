pub mod classify;
pub mod guide;
pub mod prompt;
pub mod resolve;
pub mod sms;
pub mod weather;
