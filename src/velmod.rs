use crate::error::{Error, Result};
use crate::format::velocity_layer;
use crate::model::VelocityProfile;

/// Damping written for every layer.
pub const LAYER_DAMPING: f64 = 1.0;

const MODEL_TITLE: &str = "initial 1D-model for velest";
const LAYER_FORMAT: &str = "vel,depth,vdamp,phase (f5.2,5x,f7.2,2x,f7.3,3x,a1)";

/// Layered model in VELEST units, km and km/s, one layer per distinct depth.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VelestModel {
    pub depth: Vec<f64>,
    pub vp: Vec<f64>,
    pub vs: Vec<f64>,
}

impl VelestModel {
    /// Convert a profile in meters and m/s, keeping the first sample of each depth.
    pub fn from_profile(profile: &VelocityProfile) -> Result<Self> {
        if profile.vp.len() != profile.len() || profile.vs.len() != profile.len() {
            return Err(Error::DataIntegrity(format!(
                "velocity profile has {} depths, {} vp and {} vs samples",
                profile.len(),
                profile.vp.len(),
                profile.vs.len()
            )));
        }

        let mut model = Self::default();
        for ((depth, vp), vs) in profile.depth.iter().zip(&profile.vp).zip(&profile.vs) {
            let depth = depth / 1000.0;
            if model.depth.contains(&depth) {
                continue;
            }
            model.depth.push(depth);
            model.vp.push(vp / 1000.0);
            model.vs.push(vs / 1000.0);
        }
        log::debug!(
            "velocity model: {} samples reduced to {} layers",
            profile.len(),
            model.n_layers()
        );
        Ok(model)
    }

    pub fn n_layers(&self) -> usize {
        self.depth.len()
    }

    /// Content of `model.mod`, the Vp block followed by the Vs block.
    pub fn render(&self) -> String {
        let mut out = format!("{MODEL_TITLE}\n{}      {LAYER_FORMAT}\n", self.n_layers());
        for (vp, depth) in self.vp.iter().zip(&self.depth) {
            out.push_str(&velocity_layer(*vp, *depth, LAYER_DAMPING));
            out.push('\n');
        }
        out.push_str(&format!("{:3}\n", self.n_layers()));
        for (vs, depth) in self.vs.iter().zip(&self.depth) {
            out.push_str(&velocity_layer(*vs, *depth, LAYER_DAMPING));
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn duplicate_depths_keep_first_sample() {
        let profile = VelocityProfile {
            depth: vec![0.0, 0.0, 1000.0, 1000.0, 2000.0],
            vp: vec![5000.0, 5100.0, 5500.0, 6000.0, 6500.0],
            vs: vec![2900.0, 2950.0, 3100.0, 3400.0, 3700.0],
        };
        let model = VelestModel::from_profile(&profile).unwrap();
        assert_eq!(model.n_layers(), 3);
        assert_eq!(model.depth, vec![0.0, 1.0, 2.0]);
        assert_eq!(model.vp, vec![5.0, 5.5, 6.5]);
        assert_eq!(model.vs, vec![2.9, 3.1, 3.7]);
    }

    #[test]
    fn mismatched_profile() {
        let profile = VelocityProfile {
            depth: vec![0.0, 1000.0],
            vp: vec![5000.0],
            vs: vec![2900.0, 3000.0],
        };
        assert!(matches!(
            VelestModel::from_profile(&profile),
            Err(Error::DataIntegrity(_))
        ));
    }

    #[test]
    fn rendered_model() {
        let model = VelestModel {
            depth: vec![0.0, 2.5],
            vp: vec![5.0, 6.25],
            vs: vec![2.9, 3.5],
        };
        let expected = [
            "initial 1D-model for velest",
            "2      vel,depth,vdamp,phase (f5.2,5x,f7.2,2x,f7.3,3x,a1)",
            " 5.00        0.00    1.000",
            " 6.25        2.50    1.000",
            "  2",
            " 2.90        0.00    1.000",
            " 3.50        2.50    1.000",
            "",
        ]
        .join("\n");
        assert_eq!(model.render(), expected);
    }
}
