pub mod backend;

pub use backend::{FakeBackend, EXISTING_PHONE, FAILING_PHONE, VALID_CODE};
