//! Dashboard and chart configuration model.

use serde::{Deserialize, Serialize};

pub type ChartId = u64;

/// Chart display mode: bar-style comparison of N runs, XY chart grouped by an
/// env var, or a trend over a Number/Time x-axis.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    #[default]
    Compare,
    Group,
    Regression,
}

impl ChartKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compare => "Compare",
            Self::Group => "Group",
            Self::Regression => "Regression",
        }
    }
}

/// X-axis for regression charts.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegressionX {
    #[default]
    Number,
    Time,
}

impl RegressionX {
    pub const ALL: [Self; 2] = [Self::Number, Self::Time];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Number => "Number",
            Self::Time => "Time",
        }
    }
}

/// The kind/size combinations the editor cycles through. Size is the number of
/// runs drawn for compare/group charts and unused for regression.
pub const KIND_CHOICES: [(ChartKind, u8); 5] = [
    (ChartKind::Compare, 5),
    (ChartKind::Compare, 10),
    (ChartKind::Regression, 0),
    (ChartKind::Group, 5),
    (ChartKind::Group, 10),
];

pub fn kind_label(kind: ChartKind, size: u8) -> String {
    match kind {
        ChartKind::Regression => kind.as_str().to_string(),
        _ => format!("{} {}", kind.as_str(), size),
    }
}

/// One visualization configuration within a dashboard. `id` is the only stable
/// handle; position in the chart list changes on reorder/delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    pub id: ChartId,
    pub kind: ChartKind,
    #[serde(default)]
    pub size: u8,
    #[serde(default)]
    pub metric: String,
    #[serde(default)]
    pub group_env: String,
    #[serde(default)]
    pub x_env: String,
    #[serde(default)]
    pub regression_x: RegressionX,
    #[serde(default)]
    pub description: String,
}

impl ChartConfig {
    pub fn new(id: ChartId) -> Self {
        Self {
            id,
            kind: ChartKind::Compare,
            size: 5,
            metric: String::new(),
            group_env: String::new(),
            x_env: String::new(),
            regression_x: RegressionX::Number,
            description: String::new(),
        }
    }

    /// Position of this chart's kind/size in [`KIND_CHOICES`], if it is one of
    /// the presets.
    pub fn kind_choice_index(&self) -> Option<usize> {
        KIND_CHOICES
            .iter()
            .position(|&(kind, size)| kind == self.kind && (kind == ChartKind::Regression || size == self.size))
    }
}

/// A dashboard definition: name, search criteria, ordered charts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub criteria: String,
    #[serde(default)]
    pub charts: Vec<ChartConfig>,
}
