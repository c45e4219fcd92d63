use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DeskError;

macro_rules! text_enum {
    ($name:ident, $label:literal { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DeskError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(DeskError::Validation(format!("Unknown {}: {}", $label, other))),
                }
            }
        }
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    Available,
    Occupied,
    Maintenance,
}

text_enum!(TableStatus, "table status" {
    Available => "available",
    Occupied => "occupied",
    Maintenance => "maintenance",
});

impl TableStatus {
    /// Maintenance is a manual override reachable from anywhere; occupancy
    /// only flips between available and occupied.
    pub fn can_transition(self, next: TableStatus) -> bool {
        use TableStatus::*;
        match (self, next) {
            (current, target) if current == target => false,
            (_, Maintenance) => true,
            (Maintenance, Available) => true,
            (Available, Occupied) | (Occupied, Available) => true,
            _ => false,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            TableStatus::Available => "Available",
            TableStatus::Occupied => "Occupied",
            TableStatus::Maintenance => "Maintenance",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            TableStatus::Available => "green",
            TableStatus::Occupied => "red",
            TableStatus::Maintenance => "yellow",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    Good,
    Fair,
    NeedsWork,
    UnderMaintenance,
}

text_enum!(MaintenanceStatus, "maintenance status" {
    Good => "good",
    Fair => "fair",
    NeedsWork => "needs_work",
    UnderMaintenance => "under_maintenance",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableSize {
    #[serde(rename = "7ft")]
    SevenFoot,
    #[serde(rename = "8ft")]
    EightFoot,
    #[serde(rename = "9ft")]
    NineFoot,
}

text_enum!(TableSize, "table size" {
    SevenFoot => "7ft",
    EightFoot => "8ft",
    NineFoot => "9ft",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableType {
    Standard,
    Tournament,
    Snooker,
    BarBox,
}

text_enum!(TableType, "table type" {
    Standard => "standard",
    Tournament => "tournament",
    Snooker => "snooker",
    BarBox => "bar_box",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub id: String,
    pub venue_id: String,
    pub number: String,
    pub size: TableSize,
    pub table_type: TableType,
    pub hourly_rate: Decimal,
    pub is_active: bool,
    pub maintenance_status: MaintenanceStatus,
    pub status: TableStatus,
    pub current_booking_id: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    pub location: Option<String>,
}

impl Table {
    /// Whether the table may be matched to a new booking.
    pub fn is_bookable(&self) -> bool {
        self.is_active
            && self.maintenance_status != MaintenanceStatus::UnderMaintenance
            && self.status != TableStatus::Maintenance
    }

    /// Status implied by the current occupancy claim. Maintenance, whether
    /// flagged on the table or set by an operator, always wins.
    pub fn derived_status(&self, occupied_by: Option<&str>) -> TableStatus {
        if self.status == TableStatus::Maintenance
            || self.maintenance_status == MaintenanceStatus::UnderMaintenance
        {
            TableStatus::Maintenance
        } else if occupied_by.is_some() {
            TableStatus::Occupied
        } else {
            TableStatus::Available
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTableStatusRequest {
    pub status: TableStatus,
}
