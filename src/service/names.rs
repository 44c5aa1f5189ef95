//! Display-name generation for new sessions.

/// Produces the display name a session starts with.
///
/// Called exactly once per session, at initialization.
pub trait NameGenerator {
    /// Returns a fresh display name.
    fn generate_name(&self) -> String;
}

impl<F> NameGenerator for F
where
    F: Fn() -> String,
{
    fn generate_name(&self) -> String {
        self()
    }
}

/// Always yields the same name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedName(String);

impl FixedName {
    /// Creates a generator that returns `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl NameGenerator for FixedName {
    fn generate_name(&self) -> String {
        self.0.clone()
    }
}

/// Yields `guest-xxxxxxxx`, where the suffix is 8 random hex digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuestNameGenerator;

impl NameGenerator for GuestNameGenerator {
    fn generate_name(&self) -> String {
        let (head, _, _, _) = uuid::Uuid::new_v4().as_fields();
        format!("guest-{head:08x}")
    }
}
