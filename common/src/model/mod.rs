pub mod fundraising;
pub mod status;
