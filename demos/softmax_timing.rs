//! Compares the loop-based and matrix-based softmax loss on the same random
//! problem: both must agree, the vectorized one should be much faster.
//!
//! Run with:
//!   cargo run --example softmax_timing --release

use std::time::Instant;

use rand::{rngs::StdRng, SeedableRng};
use two_layer_net::{softmax_loss_naive, softmax_loss_vectorized, Matrix};

fn main() -> two_layer_net::Result<()> {
    let (n, d, c) = (500, 3073, 10);
    let mut rng = StdRng::seed_from_u64(0);
    let w = Matrix::randn(d, c, 1e-4, &mut rng);
    let x = Matrix::randn(n, d, 1.0, &mut rng);
    let y: Vec<usize> = (0..n).map(|i| i % c).collect();
    let reg = 5e-6;

    let t = Instant::now();
    let (loss_naive, grad_naive) = softmax_loss_naive(&w, &x, &y, reg)?;
    let naive_ms = t.elapsed().as_secs_f64() * 1e3;

    let t = Instant::now();
    let (loss_vec, grad_vec) = softmax_loss_vectorized(&w, &x, &y, reg)?;
    let vec_ms = t.elapsed().as_secs_f64() * 1e3;

    let grad_diff = grad_naive.sub(&grad_vec)?.sum_squares().sqrt();

    println!("naive loss:      {loss_naive:.6e}  computed in {naive_ms:.2} ms");
    println!("vectorized loss: {loss_vec:.6e}  computed in {vec_ms:.2} ms");
    println!("loss difference: {:.3e}", (loss_naive - loss_vec).abs());
    println!("gradient difference (Frobenius): {grad_diff:.3e}");
    println!("sanity check, -ln(0.1) = {:.6}", -(0.1f64).ln());
    Ok(())
}
