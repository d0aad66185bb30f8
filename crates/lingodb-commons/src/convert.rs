//! Pluggable value converters.
//!
//! A converter rewrites resource values of a specific `value_type`
//! discriminator when sets are read (the classic example is rendering
//! Markdown-authored resources to HTML). Converters are registered on an
//! explicit [`ConverterRegistry`] owned by the application context.

use std::sync::Arc;

/// Rewrites values of one `value_type` as they are read out of a set.
pub trait ResourceSetValueConverter: Send + Sync {
    /// The `value_type` discriminator this converter handles.
    fn value_type(&self) -> i32;

    /// Converts a raw stored value. `resource_id` is available for
    /// converters that key behavior off the id.
    fn convert(&self, value: &str, resource_id: &str) -> String;
}

/// Ordered collection of registered converters.
#[derive(Default, Clone)]
pub struct ConverterRegistry {
    converters: Vec<Arc<dyn ResourceSetValueConverter>>,
}

impl ConverterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, converter: Arc<dyn ResourceSetValueConverter>) {
        self.converters.push(converter);
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    /// Applies every converter registered for `value_type`, in registration
    /// order. Values with an unregistered discriminator pass through
    /// unchanged.
    pub fn apply(&self, value_type: i32, value: &str, resource_id: &str) -> String {
        let mut out = value.to_string();
        for converter in &self.converters {
            if converter.value_type() == value_type {
                out = converter.convert(&out, resource_id);
            }
        }
        out
    }
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConverterRegistry")
            .field("converters", &self.converters.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Shouting;

    impl ResourceSetValueConverter for Shouting {
        fn value_type(&self) -> i32 {
            2
        }

        fn convert(&self, value: &str, _resource_id: &str) -> String {
            value.to_uppercase()
        }
    }

    #[test]
    fn test_apply_matches_value_type() {
        let mut registry = ConverterRegistry::new();
        registry.register(Arc::new(Shouting));

        assert_eq!(registry.apply(2, "hello", "Greeting"), "HELLO");
        assert_eq!(registry.apply(0, "hello", "Greeting"), "hello");
    }
}
