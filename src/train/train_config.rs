use serde::{Serialize, Deserialize};

use crate::error::{Error, Result};
use crate::train::sampling::SamplingMode;

/// Hyperparameters for a [`TwoLayerNet::train`](crate::TwoLayerNet::train) run.
///
/// # Fields
/// - `learning_rate`        — initial SGD step size
/// - `learning_rate_decay`  — factor in (0, 1] applied to the step size at
///                            every epoch boundary
/// - `reg`                  — L2 regularisation strength, >= 0
/// - `num_iters`            — number of SGD steps; 0 trains nothing
/// - `batch_size`           — examples per minibatch, at most the training set size
/// - `verbose`              — log the loss at every epoch boundary
/// - `sampling`             — how minibatches are drawn
/// - `iterations_per_epoch` — steps between accuracy samples and decays
///
/// Every field has a default, so a JSON config only needs the fields it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub learning_rate: f64,
    pub learning_rate_decay: f64,
    pub reg: f64,
    pub num_iters: usize,
    pub batch_size: usize,
    pub verbose: bool,
    pub sampling: SamplingMode,
    pub iterations_per_epoch: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            learning_rate: 1e-3,
            learning_rate_decay: 0.95,
            reg: 1e-5,
            num_iters: 100,
            batch_size: 200,
            verbose: false,
            sampling: SamplingMode::UniformNoReplacement,
            iterations_per_epoch: 50,
        }
    }
}

impl TrainConfig {
    /// Rejects hyperparameters that cannot drive a training run. The bound
    /// of `batch_size` by the training set size is checked by the loop.
    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(invalid(format!("learning_rate must be finite and > 0, got {}", self.learning_rate)));
        }
        if !(self.learning_rate_decay > 0.0 && self.learning_rate_decay <= 1.0) {
            return Err(invalid(format!(
                "learning_rate_decay must be in (0, 1], got {}",
                self.learning_rate_decay
            )));
        }
        if !(self.reg.is_finite() && self.reg >= 0.0) {
            return Err(invalid(format!("reg must be finite and >= 0, got {}", self.reg)));
        }
        if self.batch_size == 0 {
            return Err(invalid("batch_size must be at least 1".to_owned()));
        }
        if self.iterations_per_epoch == 0 {
            return Err(invalid("iterations_per_epoch must be at least 1".to_owned()));
        }
        Ok(())
    }

    /// Serializes the config to a pretty-printed JSON file.
    pub fn save_json(&self, path: &str) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Deserializes a config from a JSON file; missing fields take their
    /// defaults.
    pub fn load_json(path: &str) -> Result<TrainConfig> {
        let file = std::fs::File::open(path)?;
        let reader = std::io::BufReader::new(file);
        Ok(serde_json::from_reader(reader)?)
    }
}

fn invalid(msg: String) -> Error {
    Error::InvalidHyperparameter(msg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = TrainConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.iterations_per_epoch, 50);
        assert_eq!(cfg.sampling, SamplingMode::UniformNoReplacement);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let cfg: TrainConfig =
            serde_json::from_str(r#"{ "learning_rate": 0.5, "sampling": "sequential_wrap" }"#).unwrap();
        assert_eq!(cfg.learning_rate, 0.5);
        assert_eq!(cfg.sampling, SamplingMode::SequentialWrap);
        assert_eq!(cfg.batch_size, TrainConfig::default().batch_size);
    }

    #[test]
    fn json_file_round_trip() {
        let path = std::env::temp_dir().join(format!("two_layer_net_cfg_{}.json", std::process::id()));
        let path = path.to_str().unwrap();
        let cfg = TrainConfig { num_iters: 7, verbose: true, ..TrainConfig::default() };
        cfg.save_json(path).unwrap();
        assert_eq!(TrainConfig::load_json(path).unwrap(), cfg);
        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            TrainConfig::load_json("/definitely/not/here.json"),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let base = TrainConfig::default();
        let bad = [
            TrainConfig { learning_rate: 0.0, ..base.clone() },
            TrainConfig { learning_rate_decay: 0.0, ..base.clone() },
            TrainConfig { learning_rate_decay: 1.5, ..base.clone() },
            TrainConfig { reg: -1e-3, ..base.clone() },
            TrainConfig { batch_size: 0, ..base.clone() },
            TrainConfig { iterations_per_epoch: 0, ..base.clone() },
        ];
        for cfg in bad {
            assert!(matches!(cfg.validate(), Err(Error::InvalidHyperparameter(_))), "{cfg:?}");
        }
        assert!(TrainConfig { learning_rate_decay: 1.0, num_iters: 0, ..base }.validate().is_ok());
    }
}
