//! Structured per-frame event log
//!
//! The pipeline appends events while it runs and hands the finished report
//! back with the frame's shapes; rendering is left to the caller.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shapes::{Color, ShapeType};

/// Classification strategy that produced a type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    TemplateCorrelation,
    AspectRatio,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::TemplateCorrelation => f.write_str("template correlation"),
            StrategyKind::AspectRatio => f.write_str("aspect ratio"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FrameEvent {
    RegionsExtracted {
        color: Color,
        count: usize,
    },
    ShapesFiltered {
        kept: usize,
        dropped: usize,
    },
    GeometryUnavailable {
        index: usize,
        color: Color,
    },
    DegenerateBox {
        index: usize,
        color: Color,
    },
    TemplateMissing {
        color: Color,
        shape_type: ShapeType,
    },
    TemplateScored {
        color: Color,
        shape_type: ShapeType,
        score: f64,
        threshold: f64,
    },
    Classified {
        index: usize,
        color: Color,
        shape_type: ShapeType,
        angle: Option<f64>,
        strategy: Option<StrategyKind>,
    },
}

impl fmt::Display for FrameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameEvent::RegionsExtracted { color, count } => {
                write!(f, "{count} {color} region(s) extracted")
            }
            FrameEvent::ShapesFiltered { kept, dropped } => {
                write!(f, "{kept} shape(s) kept, {dropped} below area threshold")
            }
            FrameEvent::GeometryUnavailable { index, color } => {
                write!(f, "#{index} {color}: no contour above area floor")
            }
            FrameEvent::DegenerateBox { index, color } => {
                write!(f, "#{index} {color}: degenerate bounding box")
            }
            FrameEvent::TemplateMissing { color, shape_type } => {
                write!(f, "template {}_{} unavailable", shape_type, color.file_stem())
            }
            FrameEvent::TemplateScored {
                color,
                shape_type,
                score,
                threshold,
            } => write!(
                f,
                "template {}_{}: {:.3} (threshold {:.3})",
                shape_type,
                color.file_stem(),
                score,
                threshold
            ),
            FrameEvent::Classified {
                index,
                color,
                shape_type,
                angle,
                strategy,
            } => {
                write!(f, "#{index} {color} -> {shape_type}")?;
                if let Some(angle) = angle {
                    write!(f, " at {angle:.1} deg")?;
                }
                if let Some(strategy) = strategy {
                    write!(f, " via {strategy}")?;
                }
                Ok(())
            }
        }
    }
}

/// Events collected while processing one frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameReport {
    events: Vec<FrameEvent>,
}

impl FrameReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: FrameEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[FrameEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FrameEvent> {
        self.events.iter()
    }
}
