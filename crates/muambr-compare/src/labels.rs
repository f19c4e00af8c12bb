use muambr_core::Country;

/// Text appended to a listing's store name to give it country context.
pub trait ContextLabels: Send + Sync {
    /// Suffix naming the country the search was made for.
    fn available_for(&self, base: Country) -> String;

    /// Suffix naming the country the user is browsing from.
    fn browsing_from(&self, current: Country) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct EnglishLabels;

impl ContextLabels for EnglishLabels {
    fn available_for(&self, base: Country) -> String {
        format!(" (Available for {})", base.name())
    }

    fn browsing_from(&self, current: Country) -> String {
        format!(" - Browsing from {}", current.name())
    }
}
