//! SGD and Adam over flat parameter vectors.

use serde::{Deserialize, Serialize};

use super::Optimizer;
use crate::primitives::Vector;

/// Stochastic Gradient Descent with optional momentum.
///
/// Without momentum: `θ = θ - η * ∇f(θ)`
///
/// With momentum:
/// ```text
/// v = γ * v + η * ∇f(θ)
/// θ = θ - v
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sgd {
    /// Learning rate (step size)
    learning_rate: f32,
    /// Momentum coefficient (0.0 = no momentum)
    momentum: f32,
    /// Velocity buffer for momentum
    velocity: Option<Vec<f32>>,
}

impl Sgd {
    /// Creates an SGD optimizer with the given learning rate and no
    /// momentum.
    #[must_use]
    pub fn new(learning_rate: f32) -> Self {
        Self {
            learning_rate,
            momentum: 0.0,
            velocity: None,
        }
    }

    /// Sets the momentum coefficient (typical: 0.9).
    #[must_use]
    pub fn with_momentum(mut self, momentum: f32) -> Self {
        self.momentum = momentum;
        self
    }

    /// Returns the learning rate.
    #[must_use]
    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    /// Updates parameters in place.
    ///
    /// # Panics
    ///
    /// Panics if params and gradients have different lengths.
    pub fn step(&mut self, params: &mut Vector<f32>, gradients: &Vector<f32>) {
        assert_eq!(
            params.len(),
            gradients.len(),
            "Parameters and gradients must have same length"
        );
        let n = params.len();

        if self.momentum > 0.0 {
            if self.velocity.as_ref().map(Vec::len) != Some(n) {
                self.velocity = Some(vec![0.0; n]);
            }
            let velocity = self
                .velocity
                .as_mut()
                .expect("Velocity was just initialized");
            for i in 0..n {
                velocity[i] = self.momentum * velocity[i] + self.learning_rate * gradients[i];
                params[i] -= velocity[i];
            }
        } else {
            for i in 0..n {
                params[i] -= self.learning_rate * gradients[i];
            }
        }
    }

    /// Drops the velocity buffer.
    pub fn reset(&mut self) {
        self.velocity = None;
    }
}

impl Optimizer for Sgd {
    fn step(&mut self, params: &mut Vector<f32>, gradients: &Vector<f32>) {
        self.step(params, gradients);
    }

    fn reset(&mut self) {
        self.reset();
    }
}

/// Adam (Adaptive Moment Estimation) optimizer.
///
/// Maintains exponential moving averages of gradients and squared
/// gradients with bias correction:
///
/// ```text
/// m_t = β₁ * m_{t-1} + (1 - β₁) * g_t
/// v_t = β₂ * v_{t-1} + (1 - β₂) * g_t²
/// m̂_t = m_t / (1 - β₁^t)
/// v̂_t = v_t / (1 - β₂^t)
/// θ_t = θ_{t-1} - α * m̂_t / (√v̂_t + ε)
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Adam {
    /// Learning rate (step size)
    learning_rate: f32,
    /// Exponential decay rate for first moment estimates (default: 0.9)
    beta1: f32,
    /// Exponential decay rate for second moment estimates (default: 0.999)
    beta2: f32,
    /// Small constant for numerical stability (default: 1e-8)
    epsilon: f32,
    /// First moment estimates
    m: Option<Vec<f32>>,
    /// Second moment estimates
    v: Option<Vec<f32>>,
    /// Steps taken, for bias correction
    t: usize,
}

impl Adam {
    /// Creates an Adam optimizer with default β₁ = 0.9, β₂ = 0.999,
    /// ε = 1e-8.
    #[must_use]
    pub fn new(learning_rate: f32) -> Self {
        Self {
            learning_rate,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
            m: None,
            v: None,
            t: 0,
        }
    }

    /// Sets the moment decay rates.
    #[must_use]
    pub fn with_betas(mut self, beta1: f32, beta2: f32) -> Self {
        self.beta1 = beta1;
        self.beta2 = beta2;
        self
    }

    /// Sets the stability constant.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Returns the learning rate.
    #[must_use]
    pub fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    /// Number of steps taken since construction or the last reset.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.t
    }

    /// Updates parameters in place with bias-corrected adaptive steps.
    ///
    /// # Panics
    ///
    /// Panics if params and gradients have different lengths.
    pub fn step(&mut self, params: &mut Vector<f32>, gradients: &Vector<f32>) {
        assert_eq!(
            params.len(),
            gradients.len(),
            "Parameters and gradients must have same length"
        );
        let n = params.len();

        if self.m.as_ref().map(Vec::len) != Some(n) {
            self.m = Some(vec![0.0; n]);
            self.v = Some(vec![0.0; n]);
            self.t = 0;
        }
        self.t += 1;

        let m = self.m.as_mut().expect("Moments were just initialized");
        let v = self.v.as_mut().expect("Moments were just initialized");
        let bias1 = 1.0 - self.beta1.powi(self.t as i32);
        let bias2 = 1.0 - self.beta2.powi(self.t as i32);

        for i in 0..n {
            let g = gradients[i];
            m[i] = self.beta1 * m[i] + (1.0 - self.beta1) * g;
            v[i] = self.beta2 * v[i] + (1.0 - self.beta2) * g * g;
            let m_hat = m[i] / bias1;
            let v_hat = v[i] / bias2;
            params[i] -= self.learning_rate * m_hat / (v_hat.sqrt() + self.epsilon);
        }
    }

    /// Drops the moment buffers and step counter.
    pub fn reset(&mut self) {
        self.m = None;
        self.v = None;
        self.t = 0;
    }
}

impl Optimizer for Adam {
    fn step(&mut self, params: &mut Vector<f32>, gradients: &Vector<f32>) {
        self.step(params, gradients);
    }

    fn reset(&mut self) {
        self.reset();
    }
}
