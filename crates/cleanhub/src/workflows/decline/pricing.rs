use serde::{Deserialize, Serialize};

use super::domain::CompleteHomeAttributes;

/// Rate card for a service area, whole dollars per unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingConfig {
    pub base_rate: u32,
    pub per_bedroom: u32,
    pub per_bathroom: u32,
    pub per_linen_hour: u32,
}

/// Stateless quote computation over complete home attributes. Invoked only
/// by the decision service once the home record has every pricing input.
#[derive(Debug, Clone)]
pub struct ServiceAreaPricingEngine {
    config: PricingConfig,
}

impl ServiceAreaPricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Marketplace price in whole dollars.
    pub fn quote(&self, attributes: &CompleteHomeAttributes) -> u32 {
        let bedrooms = attributes.num_beds.saturating_mul(self.config.per_bedroom);
        let bathrooms = attributes.num_baths.saturating_mul(self.config.per_bathroom);
        let linens = attributes
            .time_to_be_completed
            .saturating_mul(self.config.per_linen_hour);

        self.config
            .base_rate
            .saturating_add(bedrooms)
            .saturating_add(bathrooms)
            .saturating_add(linens)
    }
}
