//! Synthetic wine samples and the MLServer V2 inference payload.

use rand::Rng;
use serde::Serialize;

/// Inclusive `[low, high]` bounds per wine feature, in dataset column order.
pub const FEATURE_RANGES: [(f64, f64); 13] = [
    (11.0, 15.0),    // alcohol
    (0.7, 5.8),      // malic acid
    (1.3, 3.3),      // ash
    (10.0, 30.0),    // alcalinity of ash
    (70.0, 162.0),   // magnesium
    (0.9, 4.0),      // total phenols
    (0.3, 5.1),      // flavanoids
    (0.1, 0.7),      // nonflavanoid phenols
    (0.4, 3.6),      // proanthocyanins
    (1.0, 13.0),     // color intensity
    (0.4, 1.8),      // hue
    (1.2, 4.0),      // OD280/OD315 of diluted wines
    (278.0, 1680.0), // proline
];

/// Draw one random wine sample: 13 floats, each uniform within its feature
/// range and rounded to 3 decimal places.
pub fn random_sample() -> Vec<f64> {
    let mut rng = rand::thread_rng();
    FEATURE_RANGES
        .iter()
        .map(|&(low, high)| round3(rng.gen_range(low..=high)))
        .collect()
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Request body understood by MLServer with the NumPy codec.
#[derive(Debug, Clone, Serialize)]
pub struct InferenceRequest {
    pub parameters: RequestParameters,
    pub inputs: Vec<InputTensor>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestParameters {
    pub content_type: String,
}

/// One named tensor in the V2 inference protocol.
#[derive(Debug, Clone, Serialize)]
pub struct InputTensor {
    pub name: String,
    pub datatype: String,
    pub shape: Vec<usize>,
    pub data: Vec<f64>,
}

impl InferenceRequest {
    /// Wrap one sample in the fixed envelope metadata (shape `[1, 13]`,
    /// FP32 datatype, NumPy content type).
    pub fn new(sample: Vec<f64>) -> Self {
        Self {
            parameters: RequestParameters {
                content_type: "np".to_string(),
            },
            inputs: vec![InputTensor {
                name: "input".to_string(),
                datatype: "FP32".to_string(),
                shape: vec![1, FEATURE_RANGES.len()],
                data: sample,
            }],
        }
    }
}
