use std::fmt::{Display, Formatter};

use enumset::EnumSet;
use serde::Serialize;

use crate::quantity::{KilowattHours, Won};

/// The four summary-view figures.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Readings {
    pub realtime_usage: KilowattHours,
    pub estimated_usage: KilowattHours,
    pub realtime_charge: Won,
    pub estimated_charge: Won,
}

impl Readings {
    /// Usage and charge must agree on whether they already match their estimates.
    ///
    /// The portal refreshes usage and charge through separate requests, so a read in between
    /// catches one side updated and the other not.
    pub fn is_consistent(&self) -> bool {
        (self.realtime_usage == self.estimated_usage)
            == (self.realtime_charge == self.estimated_charge)
    }
}

/// Self-generation figures from the detail view.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Generation {
    pub generation_amount: KilowattHours,
    pub net_usage_after_compensation: KilowattHours,
    pub net_realtime_charge: Won,
}

impl Generation {
    /// The detail table reports the generated amount, the remainder of the usage is what is billed.
    pub fn reconcile(realtime_usage: KilowattHours, generated: KilowattHours, net_charge: Won) -> Self {
        Self {
            generation_amount: generated.round_to_watt_hours(),
            net_usage_after_compensation: (realtime_usage - generated).round_to_watt_hours(),
            net_realtime_charge: net_charge,
        }
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UsageSnapshot {
    pub readings: Readings,
    pub generation: Option<Generation>,
}

impl From<Readings> for UsageSnapshot {
    fn from(readings: Readings) -> Self {
        Self { readings, generation: None }
    }
}

impl UsageSnapshot {
    /// Value of the field, if this snapshot has it.
    pub fn get(&self, field: Field) -> Option<Value> {
        let readings = &self.readings;
        let generation = self.generation.as_ref();
        match field {
            Field::RealtimeUsage => Some(readings.realtime_usage.into()),
            Field::PredictedUsage => Some(readings.estimated_usage.into()),
            Field::RealtimeFee => Some(readings.realtime_charge.into()),
            Field::PredictedFee => Some(readings.estimated_charge.into()),
            Field::GenerationAmount => generation.map(|it| it.generation_amount.into()),
            Field::NetRealtimeCharge => generation.map(|it| it.net_realtime_charge.into()),
            Field::NetUsageAfterCompensation => {
                generation.map(|it| it.net_usage_after_compensation.into())
            }
        }
    }

    /// Fields present in this snapshot, in catalog order.
    pub fn fields(&self) -> impl Iterator<Item = (Field, Value)> {
        EnumSet::<Field>::all().into_iter().filter_map(|field| Some((field, self.get(field)?)))
    }
}

/// Published sensor value.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, derive_more::Display, derive_more::From)]
#[serde(untagged)]
pub enum Value {
    Energy(KilowattHours),
    Money(Won),
}

/// Published fields, declared in publishing order.
#[derive(Debug, enumset::EnumSetType)]
pub enum Field {
    RealtimeUsage,
    PredictedUsage,
    RealtimeFee,
    PredictedFee,
    GenerationAmount,
    NetRealtimeCharge,
    NetUsageAfterCompensation,
}

impl Field {
    /// Key used in the entity ID.
    pub const fn key(self) -> &'static str {
        match self {
            Self::RealtimeUsage => "realtime_usage",
            Self::PredictedUsage => "predicted_usage",
            Self::RealtimeFee => "realtime_fee",
            Self::PredictedFee => "predicted_fee",
            Self::GenerationAmount => "generation_amount",
            Self::NetRealtimeCharge => "net_realtime_charge",
            Self::NetUsageAfterCompensation => "net_usage_after_compensation",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}
