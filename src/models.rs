//! Model registry: the static table of selectable models plus a lazily
//! populated cache of live provider handles.
//!
//! Unknown model ids never fail a request. They are silently replaced by the
//! configured default, both when reporting `model_used` and when resolving a
//! handle.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::Serialize;

use crate::provider::{GenerationProvider, GenerativeModel};

/// Static description of a selectable model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelDescriptor {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub rate_limit: &'static str,
}

pub const AVAILABLE_MODELS: &[ModelDescriptor] = &[
    ModelDescriptor {
        id: "gemini-2.5-pro",
        name: "Gemini 2.5 Pro",
        description: "Most capable model with advanced reasoning",
        rate_limit: "2 requests/minute (free tier)",
    },
    ModelDescriptor {
        id: "gemini-2.5-flash",
        name: "Gemini 2.5 Flash",
        description: "Fast and efficient for most tasks",
        rate_limit: "15 requests/minute (free tier)",
    },
];

#[derive(Debug, Clone, Serialize)]
pub struct ModelsResponse {
    pub available_models: Vec<ModelDescriptor>,
    pub default_model: String,
}

pub struct ModelRegistry {
    provider: Option<Arc<dyn GenerationProvider>>,
    default_model: String,
    cache: RwLock<HashMap<String, Arc<dyn GenerativeModel>>>,
}

impl ModelRegistry {
    pub fn new(provider: Option<Arc<dyn GenerationProvider>>, default_model: impl Into<String>) -> Self {
        Self {
            provider,
            default_model: default_model.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Whether a generation provider was configured at start-up.
    pub fn is_available(&self) -> bool {
        self.provider.is_some()
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn model_count(&self) -> usize {
        AVAILABLE_MODELS.len()
    }

    pub fn is_known(model_id: &str) -> bool {
        AVAILABLE_MODELS.iter().any(|m| m.id == model_id)
    }

    /// The id that will actually be used for `requested`: known ids pass
    /// through, anything else (including `None`) becomes the default.
    pub fn resolve_id<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        match requested {
            Some(id) if Self::is_known(id) => id,
            _ => &self.default_model,
        }
    }

    /// Cached handle for the resolved model, created on first use.
    ///
    /// Returns `None` only when no provider is configured.
    pub fn resolve(&self, requested: Option<&str>) -> Option<Arc<dyn GenerativeModel>> {
        let provider = self.provider.as_ref()?;
        let model_id = self.resolve_id(requested);

        if let Some(handle) = self.read_cache().get(model_id) {
            return Some(Arc::clone(handle));
        }

        // Two first-use requests may both build a handle; the later insert wins.
        let handle = provider.model(model_id);
        tracing::debug!(model = %model_id, "caching model handle");
        self.write_cache()
            .insert(model_id.to_string(), Arc::clone(&handle));
        Some(handle)
    }

    pub fn list_available(&self) -> ModelsResponse {
        ModelsResponse {
            available_models: AVAILABLE_MODELS.to_vec(),
            default_model: self.default_model.clone(),
        }
    }

    // The cache holds no invariants a panicking writer could break, so a
    // poisoned lock is still usable.
    fn read_cache(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<dyn GenerativeModel>>> {
        self.cache.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_cache(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Arc<dyn GenerativeModel>>> {
        self.cache.write().unwrap_or_else(|e| e.into_inner())
    }

    #[cfg(test)]
    fn cached_len(&self) -> usize {
        self.read_cache().len()
    }
}
