use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

use super::{BarChartFrame, GaugeChartFrame, HeatMapFrame, LineAreaFrame, PieChartFrame};

pub const CHART_FRAME_JSON_SCHEMA_V1: u32 = 1;

/// Versioned envelope around a serialized chart frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartFrameJsonContractV1<T> {
    pub schema_version: u32,
    /// Chart kind tag, e.g. `bar` or `pie`.
    pub kind: String,
    pub frame: T,
}

/// JSON persistence of computed frames, for golden files and host caches.
///
/// Parsing accepts both the bare frame and the v1 envelope.
pub trait FrameJsonContract: Serialize + DeserializeOwned + Clone {
    const KIND: &'static str;

    fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidData(format!("failed to serialize {} frame json: {e}", Self::KIND))
        })
    }

    fn to_json_contract_v1_pretty(&self) -> ChartResult<String> {
        let payload = ChartFrameJsonContractV1 {
            schema_version: CHART_FRAME_JSON_SCHEMA_V1,
            kind: Self::KIND.to_owned(),
            frame: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ChartError::InvalidData(format!(
                "failed to serialize {} frame contract v1: {e}",
                Self::KIND
            ))
        })
    }

    fn from_json_compat_str(input: &str) -> ChartResult<Self> {
        if let Ok(frame) = serde_json::from_str::<Self>(input) {
            return Ok(frame);
        }
        let payload: ChartFrameJsonContractV1<Self> = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidData(format!("failed to parse {} frame json payload: {e}", Self::KIND))
        })?;
        if payload.schema_version != CHART_FRAME_JSON_SCHEMA_V1 {
            return Err(ChartError::InvalidData(format!(
                "unsupported {} frame schema version: {}",
                Self::KIND,
                payload.schema_version
            )));
        }
        if payload.kind != Self::KIND {
            return Err(ChartError::InvalidData(format!(
                "expected a `{}` frame, found `{}`",
                Self::KIND,
                payload.kind
            )));
        }
        Ok(payload.frame)
    }
}

impl FrameJsonContract for BarChartFrame {
    const KIND: &'static str = "bar";
}

impl FrameJsonContract for LineAreaFrame {
    const KIND: &'static str = "line_area";
}

impl FrameJsonContract for PieChartFrame {
    const KIND: &'static str = "pie";
}

impl FrameJsonContract for GaugeChartFrame {
    const KIND: &'static str = "gauge";
}

impl FrameJsonContract for HeatMapFrame {
    const KIND: &'static str = "heat_map";
}
