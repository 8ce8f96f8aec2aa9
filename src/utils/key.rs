use crate::action::ComponentKey;

/// Name used for components that carry no display name.
pub const ANONYMOUS: &str = "Anonymous";

/// Static description of a component type, handed to key generators.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ComponentMeta {
    pub display_name: Option<&'static str>,
}

impl ComponentMeta {
    /// Display name, falling back to [`ANONYMOUS`].
    pub fn name(&self) -> &'static str {
        self.display_name.unwrap_or(ANONYMOUS)
    }
}

/// A random version 4 UUID in hyphenated form.
pub fn uuid() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Default key generator: `"<name>__<uuid>"`.
///
/// Keys are random, not checked for uniqueness.
pub fn generate_random_key(meta: &ComponentMeta) -> ComponentKey {
    ComponentKey::new(format!("{}__{}", meta.name(), uuid()))
}
