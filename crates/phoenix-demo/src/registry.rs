//! Module registry: the single table mapping module ids to their metadata
//! and factories.

use std::collections::HashMap;

use crate::config::DemoConfig;
use crate::error::DemoError;
use crate::manifest::{ModuleEntry, ModuleManifest};
use crate::module::{ModuleId, ModuleInstance};
use crate::modules;

/// Builds a fresh module instance from the demo config.
pub type ModuleFactory = fn(&DemoConfig) -> ModuleInstance;

/// One registered module.
#[derive(Debug, Clone)]
pub struct RegistryEntry {
    pub meta: ModuleEntry,
    pub factory: ModuleFactory,
}

/// Builder for constructing an immutable [`ModuleRegistry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: Vec<RegistryEntry>,
    index: HashMap<ModuleId, usize>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a module. A second registration of the same id replaces the
    /// first.
    pub fn register(&mut self, meta: ModuleEntry, factory: ModuleFactory) -> &mut Self {
        let id = meta.id;
        let entry = RegistryEntry { meta, factory };
        match self.index.get(&id) {
            Some(&slot) => self.entries[slot] = entry,
            None => {
                self.index.insert(id, self.entries.len());
                self.entries.push(entry);
            }
        }
        self
    }

    /// Finalize. Fails if the config's default module was never registered.
    pub fn build(self, config: DemoConfig) -> Result<ModuleRegistry, DemoError> {
        if !self.index.contains_key(&config.default_module) {
            return Err(DemoError::InvalidConfig {
                detail: format!(
                    "default module '{}' is not registered",
                    config.default_module
                ),
            });
        }
        Ok(ModuleRegistry {
            entries: self.entries,
            index: self.index,
            config,
        })
    }
}

/// Immutable table of registered modules plus the config their factories
/// read.
#[derive(Debug)]
pub struct ModuleRegistry {
    entries: Vec<RegistryEntry>,
    index: HashMap<ModuleId, usize>,
    config: DemoConfig,
}

impl ModuleRegistry {
    /// Register every module listed in `manifest` with its built-in factory.
    pub fn standard(config: DemoConfig, manifest: &ModuleManifest) -> Result<Self, DemoError> {
        let mut builder = RegistryBuilder::new();
        for meta in &manifest.modules {
            builder.register(meta.clone(), factory_for(meta.id));
        }
        builder.build(config)
    }

    pub fn lookup(&self, id: ModuleId) -> Result<&RegistryEntry, DemoError> {
        self.index
            .get(&id)
            .map(|&slot| &self.entries[slot])
            .ok_or_else(|| DemoError::UnknownModule { id: id.to_string() })
    }

    /// Parse and look up a user-supplied id.
    pub fn lookup_str(&self, id: &str) -> Result<&RegistryEntry, DemoError> {
        let parsed: ModuleId = id.parse()?;
        self.lookup(parsed)
    }

    pub fn contains(&self, id: ModuleId) -> bool {
        self.index.contains_key(&id)
    }

    /// Build a fresh instance of a registered module.
    pub fn instantiate(&self, id: ModuleId) -> Result<ModuleInstance, DemoError> {
        let entry = self.lookup(id)?;
        Ok((entry.factory)(&self.config))
    }

    pub fn theme_accent(&self, id: ModuleId) -> Result<&str, DemoError> {
        Ok(self.lookup(id)?.meta.theme_accent.as_str())
    }

    /// Registered ids in registration order.
    pub fn ids(&self) -> impl Iterator<Item = ModuleId> + '_ {
        self.entries.iter().map(|e| e.meta.id)
    }

    pub fn entries(&self) -> &[RegistryEntry] {
        &self.entries
    }

    pub fn default_module(&self) -> ModuleId {
        self.config.default_module
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }
}

fn factory_for(id: ModuleId) -> ModuleFactory {
    match id {
        ModuleId::Pos => |c: &DemoConfig| modules::instantiate(ModuleId::Pos, c),
        ModuleId::Audit => |c: &DemoConfig| modules::instantiate(ModuleId::Audit, c),
        ModuleId::Bookings => |c: &DemoConfig| modules::instantiate(ModuleId::Bookings, c),
        ModuleId::Cameras => |c: &DemoConfig| modules::instantiate(ModuleId::Cameras, c),
        ModuleId::Fiscal => |c: &DemoConfig| modules::instantiate(ModuleId::Fiscal, c),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::default_manifest;

    fn registry() -> ModuleRegistry {
        let config = DemoConfig::embedded().unwrap();
        ModuleRegistry::standard(config, &default_manifest().unwrap()).unwrap()
    }

    fn entry(id: ModuleId, accent: &str) -> ModuleEntry {
        ModuleEntry {
            id,
            title: id.to_string(),
            summary: String::new(),
            theme_accent: accent.to_string(),
            tags: Vec::new(),
        }
    }

    #[test]
    fn standard_registry_has_every_module() {
        let registry = registry();
        for id in ModuleId::ALL {
            let instance = registry.instantiate(id).unwrap();
            assert_eq!(instance.id(), id);
        }
        assert_eq!(registry.ids().count(), ModuleId::ALL.len());
    }

    #[test]
    fn lookup_str_rejects_unknown() {
        let registry = registry();
        assert!(registry.lookup_str("audit").is_ok());
        assert!(matches!(
            registry.lookup_str("payroll"),
            Err(DemoError::UnknownModule { .. })
        ));
    }

    #[test]
    fn theme_accent_comes_from_manifest() {
        let registry = registry();
        assert_eq!(registry.theme_accent(ModuleId::Pos).unwrap(), "cyan");
        assert_eq!(registry.theme_accent(ModuleId::Fiscal).unwrap(), "rose");
    }

    #[test]
    fn unregistered_module_is_unknown() {
        let mut builder = RegistryBuilder::new();
        builder.register(entry(ModuleId::Pos, "cyan"), factory_for(ModuleId::Pos));
        let registry = builder.build(DemoConfig::embedded().unwrap()).unwrap();

        assert!(!registry.contains(ModuleId::Cameras));
        assert!(matches!(
            registry.instantiate(ModuleId::Cameras),
            Err(DemoError::UnknownModule { ref id }) if id == "cameras"
        ));
    }

    #[test]
    fn build_requires_default_module() {
        let mut builder = RegistryBuilder::new();
        builder.register(entry(ModuleId::Audit, "emerald"), factory_for(ModuleId::Audit));
        assert!(matches!(
            builder.build(DemoConfig::embedded().unwrap()),
            Err(DemoError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn re_registration_replaces_entry() {
        let mut builder = RegistryBuilder::new();
        builder
            .register(entry(ModuleId::Pos, "cyan"), factory_for(ModuleId::Pos))
            .register(entry(ModuleId::Pos, "teal"), factory_for(ModuleId::Pos));
        let registry = builder.build(DemoConfig::embedded().unwrap()).unwrap();
        assert_eq!(registry.entries().len(), 1);
        assert_eq!(registry.theme_accent(ModuleId::Pos).unwrap(), "teal");
    }
}
