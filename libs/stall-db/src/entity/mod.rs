pub mod review;
pub mod stall;

// Re-exports for convenience
pub use review::{NewReview, Review};
pub use stall::{NearbyStall, Stall};
