use crate::constants::MINOR_DELAY_LIMIT_MINUTES;
use crate::models::TrainPosition;

/// Aggregate figures for the statistics panel
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TrainStatistics {
    pub total: usize,
    pub moving: usize,
    pub stopped: usize,
    pub delayed: usize,
    /// Mean speed over all trains, 0 when there are none
    pub average_speed: f64,
}

impl TrainStatistics {
    #[must_use]
    pub fn from_positions(trains: &[TrainPosition]) -> Self {
        let total = trains.len();
        let moving = trains.iter().filter(|t| t.is_moving()).count();
        let delayed = trains.iter().filter(|t| t.is_delayed()).count();

        #[allow(clippy::cast_precision_loss)]
        let average_speed = if total > 0 {
            trains.iter().map(|t| t.speed).sum::<f64>() / total as f64
        } else {
            0.0
        };

        Self {
            total,
            moving,
            stopped: total - moving,
            delayed,
            average_speed,
        }
    }

    #[must_use]
    pub fn average_speed_label(&self) -> String {
        format!("{} mph", self.average_speed.round())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayStatus {
    OnTime,
    Minor,
    Severe,
}

impl DelayStatus {
    #[must_use]
    pub fn from_delay(delay: f64) -> Self {
        if delay == 0.0 {
            Self::OnTime
        } else if delay > MINOR_DELAY_LIMIT_MINUTES {
            Self::Severe
        } else {
            Self::Minor
        }
    }

    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::OnTime => "status-green",
            Self::Minor => "status-yellow",
            Self::Severe => "status-red",
        }
    }
}

/// Text shown for a train's delay
#[must_use]
pub fn delay_label(delay: f64) -> String {
    if delay == 0.0 {
        "On time".to_string()
    } else {
        format!("{} min late", delay.round())
    }
}

#[must_use]
pub fn movement_label(train: &TrainPosition) -> &'static str {
    if train.is_moving() {
        "Moving"
    } else {
        "Stopped"
    }
}
