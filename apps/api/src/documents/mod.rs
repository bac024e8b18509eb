// Multi-document persistence: store, startup migration, active session.
// All document state flows through `Session`; handlers never touch the store directly.

pub mod examples;
pub mod handlers;
pub mod migration;
pub mod session;
pub mod store;

pub use examples::{DocumentRef, ExampleKey};
pub use session::Session;
pub use store::DocumentStore;
