pub mod mock;
pub mod price_feed;
pub mod yahoo;
