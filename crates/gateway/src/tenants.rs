//! Tenant configuration lookup.
//!
//! Tenants come from the `[[tenants]]` config sections; the baked-in demo
//! tenant is always present and doubles as the fallback for unknown ids.

use std::collections::HashMap;

use ig_domain::tenant::TenantConfig;

pub struct TenantDirectory {
    tenants: HashMap<String, TenantConfig>,
}

impl TenantDirectory {
    /// Build the directory from configured tenants, always seeding the
    /// demo tenant (a configured tenant with the same id wins).
    pub fn new(configured: &[TenantConfig]) -> Self {
        let demo = TenantConfig::demo();
        let mut tenants = HashMap::from([(demo.id.clone(), demo)]);
        for tenant in configured {
            tenants.insert(tenant.id.clone(), tenant.clone());
        }
        Self { tenants }
    }

    /// Exact lookup, no fallback.
    pub fn get(&self, tenant_id: &str) -> Option<&TenantConfig> {
        self.tenants.get(tenant_id)
    }

    /// Lookup with demo-tenant fallback for unknown ids.
    pub fn resolve(&self, tenant_id: &str) -> TenantConfig {
        match self.tenants.get(tenant_id) {
            Some(t) => t.clone(),
            None => {
                tracing::debug!(tenant_id, "unknown tenant, using demo config");
                TenantConfig::demo()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_tenant_is_always_present() {
        let dir = TenantDirectory::new(&[]);
        assert!(dir.get("dev").is_some());
        assert_eq!(dir.len(), 1);
    }

    #[test]
    fn unknown_tenant_resolves_to_demo() {
        let dir = TenantDirectory::new(&[]);
        let tenant = dir.resolve("nobody");
        assert_eq!(tenant.id, "dev");
    }

    #[test]
    fn configured_tenant_overrides_demo() {
        let mut custom = TenantConfig::demo();
        custom.id = "dev".into();
        custom.name = "Overridden".into();
        let dir = TenantDirectory::new(&[custom]);
        assert_eq!(dir.resolve("dev").name, "Overridden");
    }
}
