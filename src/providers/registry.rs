use super::{aws, gcp, Provider};
use crate::api::errors::ApiError;

/// Set of providers keyed by namespace prefix.
///
/// Prefixes never overlap: registering a prefix equal to, or a dotted
/// ancestor or descendant of, an existing one is rejected, so at most one
/// provider claims any type id.
#[derive(Clone, Debug, Default)]
pub struct ProviderRegistry {
    providers: Vec<Provider>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in provider.
    pub fn with_defaults() -> Self {
        Self { providers: vec![aws::provider(), gcp::provider()] }
    }

    pub fn register(&mut self, provider: Provider) -> Result<(), ApiError> {
        if let Some(existing) = self.providers.iter().find(|p| overlaps(p.prefix(), provider.prefix())) {
            return Err(ApiError::Config(format!(
                "namespace `{}` of provider {} overlaps `{}` of provider {}",
                provider.prefix(),
                provider.name(),
                existing.prefix(),
                existing.name()
            )));
        }
        self.providers.push(provider);
        Ok(())
    }

    /// Provider whose prefix matches `type_id` on segment boundaries, longest first.
    pub fn resolve(&self, type_id: &str) -> Option<&Provider> {
        self.providers
            .iter()
            .filter(|p| p.short_name(type_id).is_some())
            .max_by_key(|p| p.prefix().len())
    }

    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }
}

fn overlaps(a: &str, b: &str) -> bool {
    let nested = |outer: &str, inner: &str| {
        inner.strip_prefix(outer).is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    };
    nested(a, b) || nested(b, a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::CredentialPolicy;

    fn p(prefix: &'static str) -> Provider {
        Provider::new(prefix, prefix, CredentialPolicy::none())
    }

    #[test]
    fn defaults_are_disjoint_and_resolvable() {
        let reg = ProviderRegistry::with_defaults();
        let mut check = ProviderRegistry::new();
        for prov in reg.providers() {
            check.register(prov.clone()).unwrap();
        }
        assert_eq!(reg.resolve("amazon.aws.ec2_vol").map(Provider::name), Some("aws"));
        assert_eq!(reg.resolve("google.cloud.gcp_compute_instance").map(Provider::name), Some("gcp"));
        assert!(reg.resolve("community.general.ufw").is_none());
        assert!(reg.resolve("amazon.awsx.ec2_vol").is_none());
    }

    #[test]
    fn overlapping_prefixes_are_rejected() {
        let mut reg = ProviderRegistry::new();
        reg.register(p("ns.vendor")).unwrap();
        assert!(matches!(reg.register(p("ns.vendor")), Err(ApiError::Config(_))));
        assert!(matches!(reg.register(p("ns.vendor.sub")), Err(ApiError::Config(_))));
        assert!(matches!(reg.register(p("ns")), Err(ApiError::Config(_))));
        reg.register(p("ns.vendorx")).unwrap();
        assert_eq!(reg.resolve("ns.vendorx.thing").map(Provider::prefix), Some("ns.vendorx"));
        assert_eq!(reg.resolve("ns.vendor.thing").map(Provider::prefix), Some("ns.vendor"));
    }
}
