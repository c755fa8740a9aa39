mod fetch;
mod mutation;

pub use fetch::FetchController;
pub use mutation::{Acknowledge, FormStatus, MutationController};
