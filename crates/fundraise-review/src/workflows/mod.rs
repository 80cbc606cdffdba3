pub mod fundraising;
pub mod review;
