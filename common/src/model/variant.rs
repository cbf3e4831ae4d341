use serde::{Deserialize, Serialize};

/// Issuance mode of a code, carried on requests and persisted with each
/// record. Self-managed variants embed the client key, sequential id and
/// validity window into the encoded payload; externally-managed variants
/// encode the caller's text verbatim.
///
/// On the wire the variant is the integer 1-4, matching the request
/// contract of the service's clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Variant {
    /// Single-use code whose identity is managed by the caller.
    ExternalSingleUse,
    /// Single-use code whose identity this service allocates and embeds.
    SelfManagedSingleUse,
    /// Multi-use code whose identity is managed by the caller.
    ExternalMultiUse,
    /// Multi-use code whose identity this service allocates and embeds.
    SelfManagedMultiUse,
}

impl Variant {
    /// Whether issuance allocates a sequential id and appends the
    /// identity/validity query parameters to the payload.
    pub fn embeds_identity(self) -> bool {
        matches!(
            self,
            Variant::SelfManagedSingleUse | Variant::SelfManagedMultiUse
        )
    }

    pub fn is_single_use(self) -> bool {
        matches!(
            self,
            Variant::ExternalSingleUse | Variant::SelfManagedSingleUse
        )
    }
}

impl TryFrom<u8> for Variant {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Variant::ExternalSingleUse),
            2 => Ok(Variant::SelfManagedSingleUse),
            3 => Ok(Variant::ExternalMultiUse),
            4 => Ok(Variant::SelfManagedMultiUse),
            other => Err(format!("unknown code variant: {}", other)),
        }
    }
}

impl From<Variant> for u8 {
    fn from(value: Variant) -> Self {
        match value {
            Variant::ExternalSingleUse => 1,
            Variant::SelfManagedSingleUse => 2,
            Variant::ExternalMultiUse => 3,
            Variant::SelfManagedMultiUse => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Variant;

    #[test]
    fn wire_integers_round_trip() {
        for code in 1u8..=4 {
            let variant = Variant::try_from(code).unwrap();
            assert_eq!(u8::from(variant), code);
        }
        assert!(Variant::try_from(0).is_err());
        assert!(Variant::try_from(5).is_err());
    }

    #[test]
    fn self_managed_variants_embed_identity() {
        assert!(Variant::SelfManagedSingleUse.embeds_identity());
        assert!(Variant::SelfManagedMultiUse.embeds_identity());
        assert!(!Variant::ExternalSingleUse.embeds_identity());
        assert!(!Variant::ExternalMultiUse.embeds_identity());
    }
}
