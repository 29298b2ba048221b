use serde::{Serialize, Deserialize};

/// Learning curves recorded by one training run.
///
/// `loss_history` has one entry per SGD step. The accuracy histories have one
/// entry per epoch boundary (steps 0, E, 2E, ... for `E` iterations per
/// epoch), each a fraction in [0, 1].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrainHistory {
    pub loss_history: Vec<f64>,
    /// Accuracy on the minibatch of the step that closed the epoch.
    pub train_acc_history: Vec<f64>,
    pub val_acc_history: Vec<f64>,
}

