use approx::assert_relative_eq;
use rand::{rngs::StdRng, SeedableRng};

use two_layer_net::math::gradient_check::{numerical_gradient, rel_error, DEFAULT_STEP};
use two_layer_net::{
    softmax_loss_naive, softmax_loss_vectorized, Error, Evaluation, Matrix, Params, SamplingMode, TrainConfig,
    TwoLayerNet, DEFAULT_STD,
};

/// D = 4, H = 3, C = 2, N = 5.
fn small_problem() -> (TwoLayerNet, Matrix, Vec<usize>) {
    let net = TwoLayerNet::with_rng(4, 3, 2, DEFAULT_STD, &mut StdRng::seed_from_u64(0)).unwrap();
    let x = Matrix::from_data(
        (0..5)
            .map(|i| (0..4).map(|j| ((i * 4 + j) as f64 * 0.37).sin() * 10.0).collect())
            .collect(),
    )
    .unwrap();
    (net, x, vec![0, 1, 1, 0, 1])
}

#[test]
fn evaluate_without_labels_returns_scores() {
    let (net, x, _) = small_problem();
    match net.evaluate(&x, None, 0.1).unwrap() {
        Evaluation::Scores(scores) => assert_eq!(scores.shape(), (5, 2)),
        Evaluation::Loss { .. } => panic!("no labels were given"),
    }
}

#[test]
fn evaluate_with_labels_returns_loss_and_grads() {
    let (net, x, y) = small_problem();
    match net.evaluate(&x, Some(&y), 0.1).unwrap() {
        Evaluation::Loss { loss, grads } => {
            assert!(loss.is_finite() && loss > 0.0);
            let p = net.params();
            assert_eq!(grads.w1.shape(), p.w1.shape());
            assert_eq!(grads.b1.shape(), p.b1.shape());
            assert_eq!(grads.w2.shape(), p.w2.shape());
            assert_eq!(grads.b2.shape(), p.b2.shape());
        }
        Evaluation::Scores(_) => panic!("labels were given"),
    }
}

#[test]
fn network_gradients_pass_finite_difference_check() {
    let mut rng = StdRng::seed_from_u64(21);
    let params = Params {
        w1: Matrix::randn(4, 6, 0.5, &mut rng),
        b1: Matrix::randn(1, 6, 0.1, &mut rng),
        w2: Matrix::randn(6, 3, 0.5, &mut rng),
        b2: Matrix::randn(1, 3, 0.1, &mut rng),
    };
    let net = TwoLayerNet::from_params(params.clone()).unwrap();
    let x = Matrix::randn(7, 4, 1.0, &mut rng);
    let y = vec![0, 1, 2, 0, 1, 2, 2];
    let reg = 0.1;

    let (_, grads) = net.loss(&x, &y, reg).unwrap();
    let loss_at = |p: Params| TwoLayerNet::from_params(p).and_then(|n| n.loss(&x, &y, reg)).map(|(l, _)| l);

    let num_w1 = numerical_gradient(&params.w1, DEFAULT_STEP, |w1| loss_at(Params { w1: w1.clone(), ..params.clone() })).unwrap();
    let num_b1 = numerical_gradient(&params.b1, DEFAULT_STEP, |b1| loss_at(Params { b1: b1.clone(), ..params.clone() })).unwrap();
    let num_w2 = numerical_gradient(&params.w2, DEFAULT_STEP, |w2| loss_at(Params { w2: w2.clone(), ..params.clone() })).unwrap();
    let num_b2 = numerical_gradient(&params.b2, DEFAULT_STEP, |b2| loss_at(Params { b2: b2.clone(), ..params.clone() })).unwrap();

    assert!(rel_error(&grads.w1, &num_w1).unwrap() < 1e-5);
    assert!(rel_error(&grads.b1, &num_b1).unwrap() < 1e-5);
    assert!(rel_error(&grads.w2, &num_w2).unwrap() < 1e-5);
    assert!(rel_error(&grads.b2, &num_b2).unwrap() < 1e-5);
}

#[test]
fn softmax_variants_agree_on_large_problem() {
    let mut rng = StdRng::seed_from_u64(5);
    let w = Matrix::randn(30, 10, 1e-2, &mut rng);
    let x = Matrix::randn(60, 30, 1.0, &mut rng);
    let y: Vec<usize> = (0..60).map(|i| (i * 3) % 10).collect();

    let (loss_n, dw_n) = softmax_loss_naive(&w, &x, &y, 1e-2).unwrap();
    let (loss_v, dw_v) = softmax_loss_vectorized(&w, &x, &y, 1e-2).unwrap();

    assert_relative_eq!(loss_n, loss_v, max_relative = 1e-7);
    assert!(dw_n.sub(&dw_v).unwrap().data.iter().flatten().all(|d| d.abs() < 1e-7));
}

#[test]
fn sequential_training_is_reproducible_without_a_seed() {
    let (_, x, y) = small_problem();
    let cfg = TrainConfig {
        learning_rate: 0.05,
        num_iters: 20,
        batch_size: 3,
        iterations_per_epoch: 5,
        sampling: SamplingMode::SequentialWrap,
        ..TrainConfig::default()
    };
    let start = TwoLayerNet::with_rng(4, 3, 2, 0.1, &mut StdRng::seed_from_u64(3)).unwrap();

    let mut a = start.clone();
    let mut b = start;
    let history_a = a.train(&x, &y, &x, &y, &cfg).unwrap();
    let history_b = b.train(&x, &y, &x, &y, &cfg).unwrap();

    assert_eq!(history_a, history_b);
    assert_eq!(a.params(), b.params());
    assert_eq!(history_a.train_acc_history.len(), 4);
}

#[test]
fn train_rejects_bad_decay() {
    let (mut net, x, y) = small_problem();
    let cfg = TrainConfig { learning_rate_decay: 1.2, batch_size: 2, ..TrainConfig::default() };
    assert!(matches!(net.train(&x, &y, &x, &y, &cfg), Err(Error::InvalidHyperparameter(_))));
}
