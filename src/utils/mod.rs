//! Small helpers: an assertion check and component key generation.

mod assert;
mod key;

pub use assert::{assert, Comparator};
pub use key::{generate_random_key, uuid, ComponentMeta, ANONYMOUS};
