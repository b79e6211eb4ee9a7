//! Informational links shown under the paywall.

/// A legal document linked from the paywall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegalLink {
    /// Terms of Use.
    TermsOfUse,
    /// Privacy Policy.
    PrivacyPolicy,
    /// Subscription Terms.
    SubscriptionTerms,
}

impl LegalLink {
    /// All links in display order.
    pub const ALL: [Self; 3] = [
        Self::TermsOfUse,
        Self::PrivacyPolicy,
        Self::SubscriptionTerms,
    ];

    /// Link caption.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::TermsOfUse => "Terms of Use",
            Self::PrivacyPolicy => "Privacy Policy",
            Self::SubscriptionTerms => "Subscription Terms",
        }
    }

    /// Document URL, opened in an embedded browser.
    #[must_use]
    pub fn url(self) -> &'static str {
        match self {
            Self::TermsOfUse => "https://www.apple.com/ipad-pro/",
            Self::PrivacyPolicy => "https://www.apple.com/iphone-air/",
            Self::SubscriptionTerms => "https://www.apple.com/macbook-pro/",
        }
    }
}
