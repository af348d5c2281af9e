//! Junction physics for Newton-Raphson linearization.
//!
//! An LED junction follows the Shockley equation
//!   I = Is * (exp(V / (N * Vt)) - 1)
//! which the solver linearizes around an operating point:
//!   I ≈ I0 + G_d * (V - V0),  G_d = dI/dV = Is/(N*Vt) * exp(V0/(N*Vt))

use crate::parts::LedModel;
use crate::THERMAL_VOLTAGE;

use super::MIN_CONDUCTANCE;

/// A diode junction prepared for linearization.
#[derive(Debug, Clone, Copy)]
pub struct Junction {
    /// Saturation current Is.
    pub is: f64,
    /// N * Vt, the exponential slope.
    pub n_vt: f64,
    /// Voltage beyond which the exponential is extrapolated linearly to
    /// keep the matrix entries finite.
    pub v_crit: f64,
}

impl Junction {
    /// Build the junction from a device model. The critical voltage is
    /// where the ideal exponential would reach 10 A, far past any sane
    /// operating point.
    pub fn from_model(model: &LedModel) -> Self {
        let n_vt = model.emission_coefficient * THERMAL_VOLTAGE;
        let v_crit = n_vt * (10.0 / model.saturation_current).ln();
        Self {
            is: model.saturation_current,
            n_vt,
            v_crit,
        }
    }

    /// Junction current at voltage `v`.
    pub fn current(&self, v: f64) -> f64 {
        if v > self.v_crit {
            // Linear extrapolation past the critical point
            let i_crit = self.is * ((self.v_crit / self.n_vt).exp() - 1.0);
            let g_crit = self.is / self.n_vt * (self.v_crit / self.n_vt).exp();
            i_crit + g_crit * (v - self.v_crit)
        } else if v < -5.0 * self.n_vt {
            // Deep reverse bias: just the saturation current
            -self.is
        } else {
            self.is * ((v / self.n_vt).exp() - 1.0)
        }
    }

    /// Small-signal conductance dI/dV at voltage `v`.
    pub fn conductance(&self, v: f64) -> f64 {
        if v > self.v_crit {
            self.is / self.n_vt * (self.v_crit / self.n_vt).exp()
        } else if v < -5.0 * self.n_vt {
            MIN_CONDUCTANCE
        } else {
            self.is / self.n_vt * (v / self.n_vt).exp()
        }
    }

    /// Linearize around `v_op`, returning (conductance G, companion current
    /// I_eq) such that I = G * V + I_eq.
    pub fn linearize(&self, v_op: f64) -> (f64, f64) {
        let g = self.conductance(v_op);
        let i = self.current(v_op);
        let i_eq = i - g * v_op;
        (g.max(MIN_CONDUCTANCE), i_eq)
    }

    /// Limit the Newton step on the junction voltage.
    ///
    /// Steps that stay below the critical voltage pass through unchanged;
    /// past it the step is damped logarithmically so the exponential stays
    /// numerically tame while the iteration keeps making forward progress
    /// from a cold (zero) initial guess.
    pub fn limit_step(&self, v_old: f64, v_new: f64) -> f64 {
        if v_new <= self.v_crit || (v_new - v_old).abs() <= 2.0 * self.n_vt {
            return v_new;
        }
        if v_old > 0.0 {
            let arg = 1.0 + (v_new - v_old) / (2.0 * self.n_vt);
            if arg > 0.0 {
                v_old + 2.0 * self.n_vt * arg.ln()
            } else {
                self.v_crit
            }
        } else {
            // v_new > v_crit > 0 here, so the log is well-defined
            self.n_vt * (v_new / self.n_vt).ln()
        }
    }
}

/// Largest component-wise difference between two solution vectors.
pub fn max_delta(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn led_junction() -> Junction {
        Junction::from_model(&LedModel::default())
    }

    #[test]
    fn forward_bias_rises_exponentially() {
        let j = led_junction();
        assert!(j.current(0.0).abs() < 1e-12);
        let i_small = j.current(1.2);
        let i_large = j.current(1.8);
        assert!(i_large > i_small * 100.0);
    }

    #[test]
    fn reverse_bias_approaches_saturation_current() {
        let j = led_junction();
        let i_rev = j.current(-1.0);
        assert!(i_rev < 0.0);
        assert!(i_rev > -2.0 * j.is);
    }

    #[test]
    fn critical_voltage_sits_past_the_conduction_band() {
        let j = led_junction();
        assert!(j.v_crit > 2.0);
        assert!(j.v_crit < 3.0);
    }

    #[test]
    fn steps_below_critical_voltage_pass_through() {
        let j = led_junction();
        assert_eq!(j.limit_step(0.0, 0.1), 0.1);
        assert_eq!(j.limit_step(0.5, 1.8), 1.8);
        // Reverse bias never needs damping
        assert_eq!(j.limit_step(0.0, -100.0), -100.0);
    }

    #[test]
    fn overcritical_steps_are_damped() {
        let j = led_junction();
        let limited = j.limit_step(0.0, 100.0);
        assert!(limited > 0.0);
        assert!(limited < j.v_crit);
    }

    #[test]
    fn repeated_limiting_reaches_an_overcritical_target() {
        let j = led_junction();
        let target = j.v_crit + 0.5;
        let mut v = 0.0;
        for _ in 0..200 {
            let next = j.limit_step(v, target);
            assert!(next > v || next == target);
            v = next;
            if v == target {
                break;
            }
        }
        assert_eq!(v, target);
    }
}
