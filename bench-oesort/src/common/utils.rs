use metrics_util::debugging::{DebugValue, DebuggingRecorder, Snapshotter};
use ordered_float::OrderedFloat;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub fn init_logging(max_level: &str) {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or(max_level));
}

#[derive(Serialize, Debug, PartialEq)]
pub struct HistogramStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub percentiles: BTreeMap<String, f64>,
}

impl HistogramStats {
    pub fn compute(samples: &[OrderedFloat<f64>]) -> Self {
        let mut values: Vec<f64> = samples.iter().map(|v| v.into_inner()).collect();
        values.sort_by(|a, b| a.total_cmp(b));
        let len = values.len();
        if len == 0 {
            return Self {
                count: 0,
                min: 0.0,
                max: 0.0,
                mean: 0.0,
                percentiles: BTreeMap::new(),
            };
        }

        const PCTS: &[(f64, &str)] = &[(50.0, "p50"), (90.0, "p90"), (99.0, "p99")];
        let percentiles = PCTS
            .iter()
            .map(|(pct, label)| {
                let idx = ((pct / 100.0) * (len as f64 - 1.0)).round() as usize;
                (label.to_string(), values[idx])
            })
            .collect();

        Self {
            count: len,
            min: values[0],
            max: values[len - 1],
            mean: values.iter().sum::<f64>() / len as f64,
            percentiles,
        }
    }
}

#[derive(Serialize)]
pub struct MetricDump {
    pub name: String,
    /// Counter or gauge value; `None` for histograms.
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<HistogramStats>,
}

/// Installs a debugging recorder as the global `metrics` sink and turns its
/// snapshots into serializable dumps.
pub struct MetricsRecorder {
    snapshotter: Snapshotter,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let recorder = DebuggingRecorder::new();
        let snapshotter = recorder.snapshotter();
        recorder.install().map_err(|e| e.to_string())?;
        Ok(Self { snapshotter })
    }

    pub fn snapshot_metrics(&self) -> HashMap<String, MetricDump> {
        self.snapshotter
            .snapshot()
            .into_vec()
            .into_iter()
            .map(|(ckey, _unit, _description, value)| {
                let name = ckey.key().name().to_owned();
                let dump = match value {
                    DebugValue::Counter(v) => MetricDump {
                        name: name.clone(),
                        value: Some(v as f64),
                        histogram: None,
                    },
                    DebugValue::Gauge(v) => MetricDump {
                        name: name.clone(),
                        value: Some(v.into_inner()),
                        histogram: None,
                    },
                    DebugValue::Histogram(samples) => MetricDump {
                        name: name.clone(),
                        value: None,
                        histogram: Some(HistogramStats::compute(&samples)),
                    },
                };
                (name, dump)
            })
            .collect()
    }

    /// Writes `header` plus the current snapshot under `"metrics"` as pretty
    /// JSON, creating the parent directory when needed.
    pub fn dump(
        &self,
        filename: &str,
        mut header: Map<String, Value>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        header.insert(
            "metrics".to_string(),
            serde_json::to_value(self.snapshot_metrics())?,
        );
        if let Some(parent) = Path::new(filename).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut file = File::create(filename)?;
        file.write_all(serde_json::to_string_pretty(&Value::Object(header))?.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}
