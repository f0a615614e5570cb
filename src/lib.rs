pub mod attendee;
pub mod data;
pub mod request;
