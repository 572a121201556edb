//! Built-in processors and the registry that names them.

pub mod basic;
pub mod gain;
pub mod lowpass;

use alloc::collections::BTreeMap;
use alloc::string::String;
use core::fmt;

use tt_ir::ProcessorFactory;

/// Maps processor names used in song text to their factories.
#[derive(Clone)]
pub struct ProcessorRegistry {
    factories: BTreeMap<String, ProcessorFactory>,
}

impl ProcessorRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// The registry with every built-in processor.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register("basic", basic::factory);
        registry.register("gain", gain::factory);
        registry.register("lowpass", lowpass::factory);
        registry
    }

    /// Register `factory` under `name`, returning any factory it replaced.
    pub fn register(&mut self, name: &str, factory: ProcessorFactory) -> Option<ProcessorFactory> {
        self.factories.insert(String::from(name), factory)
    }

    pub fn get(&self, name: &str) -> Option<ProcessorFactory> {
        self.factories.get(name).copied()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}

impl fmt::Debug for ProcessorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

impl Default for ProcessorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
