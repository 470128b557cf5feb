//! Static provider contract table.
//!
//! Describes what each known email-lookup provider needs from a record and
//! the order in which providers should be tried. Contracts are fixed at
//! build time; nothing in the rest of the crate mutates them.

/// A known email-lookup provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Provider {
    /// Hunter.io domain search (priority 1)
    Hunter,
    /// Anymail Finder person/company search (priority 2)
    Anymail,
    /// Apollo.io people match (priority 3)
    Apollo,
}

impl Provider {
    /// All known providers, in declaration order.
    pub const ALL: [Provider; 3] = [Provider::Hunter, Provider::Anymail, Provider::Apollo];

    /// Stable machine-readable name (used in config keys and logs).
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Hunter => "hunter",
            Provider::Anymail => "anymail",
            Provider::Apollo => "apollo",
        }
    }

    /// Human-readable name for operator-facing output.
    pub fn display_name(&self) -> &'static str {
        self.contract().display_name
    }

    /// The static contract for this provider.
    pub fn contract(&self) -> &'static ProviderContract {
        &CONTRACTS[*self as usize]
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hunter" => Ok(Provider::Hunter),
            "anymail" => Ok(Provider::Anymail),
            "apollo" => Ok(Provider::Apollo),
            other => Err(UnknownProvider(other.to_string())),
        }
    }
}

/// Error returned when parsing an unrecognized provider name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown provider: {0}")]
pub struct UnknownProvider(pub String);

/// Alternative input set a provider accepts in place of a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlternativeInputs {
    /// A company name plus any person name (first, full, or display name).
    CompanyAndPersonName,
}

/// What a provider requires from a record, and its trial priority.
///
/// `priority` strictly orders trial sequence: lower is tried first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderContract {
    pub provider: Provider,
    pub display_name: &'static str,
    /// Whether the provider needs a derived domain.
    pub requires_domain: bool,
    /// Inputs accepted instead of a domain, if any.
    pub alternative: Option<AlternativeInputs>,
    pub priority: u8,
}

/// The fixed contract table, indexed by `Provider as usize`.
static CONTRACTS: [ProviderContract; 3] = [
    ProviderContract {
        provider: Provider::Hunter,
        display_name: "Hunter.io",
        requires_domain: true,
        alternative: None,
        priority: 1,
    },
    ProviderContract {
        provider: Provider::Anymail,
        display_name: "Anymail Finder",
        requires_domain: true,
        alternative: None,
        priority: 2,
    },
    ProviderContract {
        provider: Provider::Apollo,
        display_name: "Apollo.io",
        requires_domain: true,
        alternative: Some(AlternativeInputs::CompanyAndPersonName),
        priority: 3,
    },
];

/// All contracts, in provider declaration order.
pub fn contracts() -> &'static [ProviderContract] {
    &CONTRACTS
}
