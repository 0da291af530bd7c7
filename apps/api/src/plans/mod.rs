// Subscription plans: CRUD, default seeding and the feature-check endpoint.

pub mod handlers;
