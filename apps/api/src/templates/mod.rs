// HR document template library, limited by plan tier.

pub mod handlers;
pub mod seed;
