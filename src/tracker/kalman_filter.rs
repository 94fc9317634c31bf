//! Constant-velocity Kalman filter over XYAH box coordinates, using ndarray
//! for the state and nalgebra for the 4x4 inverse.

use ndarray::{Array1, Array2};

use crate::geometry::BoundingBox;

/// Filter state: 8-dim mean (x, y, a, h and their velocities) and covariance.
#[derive(Debug, Clone)]
pub struct KalmanState {
    pub mean: Array1<f64>,
    pub covariance: Array2<f64>,
}

impl KalmanState {
    /// Box described by the position part of the mean.
    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::from_xyah(
            self.mean[0] as f32,
            self.mean[1] as f32,
            self.mean[2] as f32,
            self.mean[3] as f32,
        )
    }
}

#[derive(Debug, Clone)]
pub struct KalmanFilter {
    motion_mat: Array2<f64>,
    update_mat: Array2<f64>,
    std_weight_position: f64,
    std_weight_velocity: f64,
}

impl Default for KalmanFilter {
    fn default() -> Self {
        Self::new()
    }
}

fn measurement(bbox: &BoundingBox) -> [f64; 4] {
    bbox.to_xyah().map(f64::from)
}

fn diagonal(std: &[f64]) -> Array2<f64> {
    let mut cov = Array2::zeros((std.len(), std.len()));
    for (i, s) in std.iter().enumerate() {
        cov[[i, i]] = s * s;
    }
    cov
}

impl KalmanFilter {
    pub fn new() -> Self {
        let ndim = 4;
        let mut motion_mat = Array2::eye(2 * ndim);
        for i in 0..ndim {
            motion_mat[[i, ndim + i]] = 1.0;
        }

        let mut update_mat = Array2::zeros((ndim, 2 * ndim));
        for i in 0..ndim {
            update_mat[[i, i]] = 1.0;
        }

        Self {
            motion_mat,
            update_mat,
            std_weight_position: 1.0 / 20.0,
            std_weight_velocity: 1.0 / 160.0,
        }
    }

    /// Start a track from an unassociated box; velocities start at zero.
    pub fn initiate(&self, bbox: &BoundingBox) -> KalmanState {
        let m = measurement(bbox);
        let mut mean = Array1::zeros(8);
        for (i, v) in m.iter().enumerate() {
            mean[i] = *v;
        }

        let h = m[3];
        let pos = 2.0 * self.std_weight_position * h;
        let vel = 10.0 * self.std_weight_velocity * h;
        let covariance = diagonal(&[pos, pos, 1e-2, pos, vel, vel, 1e-5, vel]);

        KalmanState { mean, covariance }
    }

    /// Advance the state by one frame.
    pub fn predict(&self, state: &KalmanState) -> KalmanState {
        let h = state.mean[3];
        let pos = self.std_weight_position * h;
        let vel = self.std_weight_velocity * h;
        let motion_cov = diagonal(&[pos, pos, 1e-2, pos, vel, vel, 1e-5, vel]);

        let mean = self.motion_mat.dot(&state.mean);
        let covariance =
            self.motion_mat.dot(&state.covariance).dot(&self.motion_mat.t()) + motion_cov;

        KalmanState { mean, covariance }
    }

    fn project(&self, state: &KalmanState) -> (Array1<f64>, Array2<f64>) {
        let h = state.mean[3];
        let pos = self.std_weight_position * h;
        let innovation_cov = diagonal(&[pos, pos, 1e-1, pos]);

        let mean = self.update_mat.dot(&state.mean);
        let covariance =
            self.update_mat.dot(&state.covariance).dot(&self.update_mat.t()) + innovation_cov;

        (mean, covariance)
    }

    /// Correct the state with a measured box.
    ///
    /// Returns `None` when the innovation covariance is singular.
    pub fn update(&self, state: &KalmanState, bbox: &BoundingBox) -> Option<KalmanState> {
        let (projected_mean, projected_cov) = self.project(state);
        let innovation = Array1::from_vec(measurement(bbox).to_vec()) - projected_mean;

        // K = P * H^T * S^-1, with H = [I 0]
        let s_inv = invert_4x4(&projected_cov)?;
        let pht = state.covariance.dot(&self.update_mat.t());
        let kalman_gain = pht.dot(&s_inv);

        let mean = &state.mean + &kalman_gain.dot(&innovation);
        let covariance =
            &state.covariance - &kalman_gain.dot(&projected_cov).dot(&kalman_gain.t());

        Some(KalmanState { mean, covariance })
    }
}

/// Invert a 4x4 matrix through nalgebra, avoiding a BLAS/LAPACK dependency.
fn invert_4x4(m: &Array2<f64>) -> Option<Array2<f64>> {
    let nm = nalgebra::Matrix4::from_fn(|i, j| m[[i, j]]);
    let inv = nm.try_inverse()?;
    Some(Array2::from_shape_fn((4, 4), |(i, j)| inv[(i, j)]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initiate() {
        let kf = KalmanFilter::new();
        let state = kf.initiate(&BoundingBox::new(90.0, 175.0, 20.0, 50.0));
        assert_eq!(state.mean[0], 100.0);
        assert_eq!(state.mean[1], 200.0);
        assert_eq!(state.mean[4], 0.0);
    }

    #[test]
    fn test_update_pulls_towards_measurement() {
        let kf = KalmanFilter::new();
        let state = kf.initiate(&BoundingBox::new(0.0, 0.0, 10.0, 10.0));
        let predicted = kf.predict(&state);
        let updated = kf
            .update(&predicted, &BoundingBox::new(4.0, 0.0, 10.0, 10.0))
            .unwrap();
        let cx = updated.mean[0];
        assert!(cx > 5.0 && cx <= 9.0, "cx = {cx}");
        assert!(updated.mean[4] > 0.0);
    }

    #[test]
    fn test_singular_covariance() {
        let kf = KalmanFilter::new();
        let state = KalmanState {
            mean: Array1::zeros(8),
            covariance: Array2::zeros((8, 8)),
        };
        // Zero height gives a zero innovation covariance except for the aspect term.
        assert!(kf.update(&state, &BoundingBox::default()).is_none());
    }
}
