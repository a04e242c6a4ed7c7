use serde::Serialize;

use crate::{
    portal::CustomerNumber,
    prelude::*,
    snapshot::{Field, UsageSnapshot, Value},
};

/// Sensor state storage keyed by entity ID.
///
/// An upsert fully replaces the state and attributes of the entity.
pub trait StateStore {
    fn upsert(&self, entity_id: &str, update: &SensorUpdate) -> Result;
}

/// Static presentation of a published field.
#[derive(Copy, Clone, Debug)]
pub struct Sensor {
    pub name: &'static str,
    pub unit: &'static str,
    pub icon: &'static str,
    pub device_class: &'static str,
}

impl Field {
    pub const fn sensor(self) -> Sensor {
        let (name, unit, icon, device_class) = match self {
            Self::RealtimeUsage => ("실시간 사용량", "kWh", "mdi:flash", "energy"),
            Self::PredictedUsage => ("예상 사용량", "kWh", "mdi:flash-alert", "energy"),
            Self::RealtimeFee => ("실시간 요금", "원", "mdi:cash", "monetary"),
            Self::PredictedFee => ("예상 요금", "원", "mdi:cash-multiple", "monetary"),
            Self::GenerationAmount => ("발전량", "kWh", "mdi:solar-power", "energy"),
            Self::NetRealtimeCharge => ("상계 후 요금", "원", "mdi:cash-minus", "monetary"),
            Self::NetUsageAfterCompensation => {
                ("상계 후 사용량", "kWh", "mdi:transmission-tower", "energy")
            }
        };
        Sensor { name, unit, icon, device_class }
    }
}

#[derive(Debug, Serialize)]
pub struct SensorUpdate {
    pub state: Value,
    pub attributes: Attributes,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Serialize)]
pub struct Attributes {
    pub friendly_name: String,
    pub unit_of_measurement: &'static str,
    pub icon: &'static str,
    pub device_class: &'static str,
    pub customer_number: Option<String>,
    pub unique_id: Option<String>,
}

/// How entities are named.
#[derive(Copy, Clone, Debug)]
pub struct Naming {
    /// Put the customer number into entity IDs and friendly names.
    pub per_customer: bool,

    /// Add the `unique_id` attribute.
    pub unique_id: bool,
}

impl Default for Naming {
    fn default() -> Self {
        Self { per_customer: true, unique_id: false }
    }
}

impl Naming {
    pub fn object_id(self, customer: Option<&CustomerNumber>, field: Field) -> String {
        match customer {
            Some(customer) if self.per_customer => format!("kepco_{customer}_{field}"),
            _ => format!("kepco_{field}"),
        }
    }

    pub fn entity_id(self, customer: Option<&CustomerNumber>, field: Field) -> String {
        format!("sensor.{}", self.object_id(customer, field))
    }

    pub fn update(
        self,
        customer: Option<&CustomerNumber>,
        field: Field,
        state: Value,
    ) -> SensorUpdate {
        let sensor = field.sensor();
        let friendly_name = match customer {
            Some(customer) if self.per_customer => format!("{} ({customer})", sensor.name),
            _ => sensor.name.to_owned(),
        };
        SensorUpdate {
            state,
            attributes: Attributes {
                friendly_name,
                unit_of_measurement: sensor.unit,
                icon: sensor.icon,
                device_class: sensor.device_class,
                customer_number: customer.map(ToString::to_string),
                unique_id: self.unique_id.then(|| self.object_id(customer, field)),
            },
        }
    }
}

#[must_use]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, derive_more::Add, derive_more::AddAssign)]
pub struct Published {
    pub n_succeeded: usize,
    pub n_failed: usize,
}

pub struct Publisher<S> {
    pub store: S,
    pub naming: Naming,
}

impl<S: StateStore> Publisher<S> {
    pub const fn new(store: S, naming: Naming) -> Self {
        Self { store, naming }
    }

    /// Upsert every field present in the snapshot.
    ///
    /// A failed upsert is logged and counted, the remaining fields are still published.
    #[instrument(skip_all, fields(customer = customer.map(tracing::field::display)))]
    pub fn publish(&self, customer: Option<&CustomerNumber>, snapshot: &UsageSnapshot) -> Published {
        let mut published = Published::default();
        for (field, value) in snapshot.fields() {
            let entity_id = self.naming.entity_id(customer, field);
            let update = self.naming.update(customer, field, value);
            match self.store.upsert(&entity_id, &update) {
                Ok(()) => {
                    debug!(%entity_id, %value, "published");
                    published.n_succeeded += 1;
                }
                Err(error) => {
                    error!(%entity_id, "failed to publish: {error:#}");
                    published.n_failed += 1;
                }
            }
        }
        info!(n_succeeded = published.n_succeeded, n_failed = published.n_failed, "published");
        published
    }
}
