use serde::{Deserialize, Serialize};

// Sample
// {
// "overall_duration":2.4137,
// "network_duration":0.3121,
// "cpu_duration":0.0875,
// "ml_duration":2.0141
// }
// The plain image handler variant leaves out ml_duration.

#[derive(Clone, Deserialize, Serialize, Debug, PartialEq)]
pub struct HandlerTimings {
    pub overall_duration: f64,
    pub network_duration: f64,
    pub cpu_duration: f64,
    #[serde(default)]
    pub ml_duration: Option<f64>,
}
