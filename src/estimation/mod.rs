use crate::config::EstimationSection;

pub mod model;
pub mod tables;
pub mod vdi4707;

use model::EnergyModel;
use vdi4707::{DistanceMode, Vdi4707Model};

pub use vdi4707::calculate_energy;

/// Model selection resolved from the `[estimation]` config section.
#[derive(Debug, Clone, Default)]
pub struct EstimationSettings {
    pub distance_mode: DistanceMode,
}

impl From<Option<&EstimationSection>> for EstimationSettings {
    fn from(section: Option<&EstimationSection>) -> Self {
        Self {
            distance_mode: section
                .and_then(|s| s.distance_mode)
                .unwrap_or_default(),
        }
    }
}

// Model Factory
pub fn create_model(settings: &EstimationSettings) -> Box<dyn EnergyModel> {
    Box::new(Vdi4707Model::new(settings.distance_mode))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_section_selects_express_zone_model() {
        let settings = EstimationSettings::from(None);
        let model = create_model(&settings);
        assert_eq!(model.name(), "vdi4707");
    }

    #[test]
    fn simple_distance_mode_selects_simple_model() {
        let section = EstimationSection {
            distance_mode: Some(DistanceMode::Simple),
        };
        let model = create_model(&EstimationSettings::from(Some(&section)));
        assert_eq!(model.name(), "vdi4707_simple");
    }
}
