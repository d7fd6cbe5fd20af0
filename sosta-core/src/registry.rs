//! Registry resolving configured driver names to provider instances.

use std::any::Any;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::config::{DriverConfig, HubConfig};
use crate::ports::{ParkingValidator, SostaError};

/// Opaque instance produced by a [`DriverFactory`]; must hold an
/// `Arc<dyn ParkingValidator>` to pass the contract check at resolve time.
pub type DriverInstance = Box<dyn Any + Send + Sync>;

/// Factory constructing one provider implementation from its driver block.
///
/// Factories are registered under the implementation reference that driver
/// blocks name in their `provider` key. This is the explicit replacement for
/// looking classes up by name: whoever wires up the application registers one
/// factory per available provider implementation.
pub struct DriverFactory {
    build: Box<dyn Fn(&DriverConfig) -> DriverInstance + Send + Sync>,
}

impl DriverFactory {
    /// Wrap a typed constructor for a concrete validator.
    ///
    /// The factory receives the full driver block, including the `provider`
    /// key and every provider-specific field.
    pub fn new<V, F>(build: F) -> Self
    where
        V: ParkingValidator + 'static,
        F: Fn(&DriverConfig) -> V + Send + Sync + 'static,
    {
        Self {
            build: Box::new(move |config| {
                let validator: Arc<dyn ParkingValidator> = Arc::new(build(config));
                Box::new(validator)
            }),
        }
    }

    /// Wrap an untyped constructor for dynamic integrations.
    ///
    /// The produced box must contain an `Arc<dyn ParkingValidator>`; anything
    /// else fails resolution with
    /// [`SostaError::DriverContractViolation`](crate::ports::SostaError::DriverContractViolation).
    pub fn untyped<F>(build: F) -> Self
    where
        F: Fn(&DriverConfig) -> DriverInstance + Send + Sync + 'static,
    {
        Self {
            build: Box::new(build),
        }
    }
}

/// Registry that resolves driver names to cached provider instances.
///
/// Owned by the application's composition root and shared by handle; there is
/// no implicit global. Each driver name is instantiated at most once per
/// registry lifetime, including under concurrent first-time resolution.
pub struct DriverRegistry {
    config: HubConfig,
    factories: HashMap<String, DriverFactory>,
    cache: Mutex<HashMap<String, Arc<dyn ParkingValidator>>>,
}

impl DriverRegistry {
    /// Build an empty registry over the given configuration.
    #[must_use]
    pub fn new(config: HubConfig) -> Self {
        Self {
            config,
            factories: HashMap::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Register a provider factory under its implementation reference.
    pub fn register(&mut self, reference: impl Into<String>, factory: DriverFactory) {
        self.factories.insert(reference.into(), factory);
    }

    /// Names of all configured drivers, in configuration order.
    pub fn driver_names(&self) -> impl Iterator<Item = &str> {
        self.config.drivers.keys().map(String::as_str)
    }

    /// The configured default driver name.
    ///
    /// # Errors
    ///
    /// Returns [`SostaError::DefaultDriverNotConfigured`] when the value is
    /// unset or blank.
    pub fn default_driver(&self) -> Result<&str, SostaError> {
        self.config
            .default_driver
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(SostaError::DefaultDriverNotConfigured)
    }

    /// Resolve a driver by name, or the default driver when `name` is `None`.
    ///
    /// The first resolution of a name constructs the instance and caches it;
    /// later resolutions return the same instance. The cache lock is held
    /// across construction so concurrent first-time resolutions of one name
    /// construct at most once.
    ///
    /// # Errors
    ///
    /// Returns [`SostaError::DefaultDriverNotConfigured`],
    /// [`SostaError::DriverNotConfigured`],
    /// [`SostaError::DriverImplementationMissing`],
    /// [`SostaError::DriverImplementationNotFound`], or
    /// [`SostaError::DriverContractViolation`] depending on which resolution
    /// step fails.
    pub fn resolve(&self, name: Option<&str>) -> Result<Arc<dyn ParkingValidator>, SostaError> {
        let name = match name {
            Some(name) => name,
            None => self.default_driver()?,
        };

        let mut cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(validator) = cache.get(name) {
            debug!(driver = name, "resolved parking driver from cache");
            return Ok(Arc::clone(validator));
        }

        let block = self
            .config
            .drivers
            .get(name)
            .filter(|block| !block.is_empty())
            .ok_or_else(|| SostaError::DriverNotConfigured {
                driver: name.to_owned(),
            })?;

        let reference =
            block
                .implementation()
                .ok_or_else(|| SostaError::DriverImplementationMissing {
                    driver: name.to_owned(),
                })?;

        let factory =
            self.factories
                .get(reference)
                .ok_or_else(|| SostaError::DriverImplementationNotFound {
                    driver: name.to_owned(),
                    implementation: reference.to_owned(),
                })?;

        let instance = (factory.build)(block);
        let validator = match instance.downcast::<Arc<dyn ParkingValidator>>() {
            Ok(validator) => *validator,
            Err(_) => {
                return Err(SostaError::DriverContractViolation {
                    driver: name.to_owned(),
                    implementation: reference.to_owned(),
                });
            }
        };

        cache.insert(name.to_owned(), Arc::clone(&validator));
        debug!(
            driver = name,
            provider = reference,
            "instantiated parking driver"
        );

        Ok(validator)
    }
}
