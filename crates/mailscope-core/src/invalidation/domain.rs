//! Invalidation domains.

/// Logical category of data an invalidation event marks stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataDomain {
    /// Conversation lists and conversation metadata.
    Conversations,
    /// Individual messages.
    Messages,
    /// Label definitions and per-label counters.
    Labels,
}

/// Collection of affected domains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainSet {
    domains: Vec<DataDomain>,
}

impl DomainSet {
    /// Creates an empty domain set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a domain set from a vector, dropping duplicates.
    #[must_use]
    pub fn from_vec(domains: Vec<DataDomain>) -> Self {
        let mut set = Self::new();
        for domain in domains {
            set.insert(domain);
        }
        set
    }

    /// Adds a domain.
    pub fn insert(&mut self, domain: DataDomain) {
        if !self.domains.contains(&domain) {
            self.domains.push(domain);
        }
    }

    /// Returns true if the domain is present.
    #[must_use]
    pub fn contains(&self, domain: DataDomain) -> bool {
        self.domains.contains(&domain)
    }

    /// Returns an iterator over the domains.
    pub fn iter(&self) -> impl Iterator<Item = &DataDomain> {
        self.domains.iter()
    }

    /// Returns the number of domains.
    #[must_use]
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Returns true if no domains are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

impl IntoIterator for DomainSet {
    type Item = DataDomain;
    type IntoIter = std::vec::IntoIter<DataDomain>;

    fn into_iter(self) -> Self::IntoIter {
        self.domains.into_iter()
    }
}

/// Which paginator type a registry serves.
///
/// Each registry instance is keyed by item type; the kind fixes the
/// domain-tagging rule applied to live-query updates originating from that
/// registry's paginators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerKind {
    /// Conversation-list paginators.
    Conversations,
    /// Message-list paginators.
    Messages,
    /// Search-result paginators.
    Search,
}

impl PagerKind {
    /// Domains marked stale when a live query of this kind fires.
    ///
    /// Conversation and message updates also invalidate the Labels domain:
    /// a relabel mutation surfaces through those paginators and moves
    /// per-label counters. Search updates span both item kinds.
    #[must_use]
    pub fn invalidation_domains(self) -> DomainSet {
        match self {
            Self::Conversations => {
                DomainSet::from_vec(vec![DataDomain::Conversations, DataDomain::Labels])
            }
            Self::Messages => DomainSet::from_vec(vec![DataDomain::Messages, DataDomain::Labels]),
            Self::Search => {
                DomainSet::from_vec(vec![DataDomain::Conversations, DataDomain::Messages])
            }
        }
    }
}
