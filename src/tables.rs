use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    portal::CustomerNumber,
    snapshot::{Field, UsageSnapshot},
};

pub fn build_snapshot_table(customer: Option<&CustomerNumber>, snapshot: &UsageSnapshot) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table.set_header(vec![
        Cell::new(customer.map_or_else(String::new, ToString::to_string))
            .add_attribute(Attribute::Bold),
        Cell::new("Field").add_attribute(Attribute::Dim),
        Cell::new("Value"),
    ]);
    let is_consistent = snapshot.readings.is_consistent();
    for (field, value) in snapshot.fields() {
        let sensor = field.sensor();
        let color = match field {
            Field::RealtimeUsage | Field::RealtimeFee if !is_consistent => Color::Red,
            Field::GenerationAmount => Color::Green,
            Field::NetRealtimeCharge | Field::NetUsageAfterCompensation => Color::DarkYellow,
            _ => Color::Reset,
        };
        table.add_row(vec![
            Cell::new(sensor.name),
            Cell::new(field).add_attribute(Attribute::Dim),
            Cell::new(value).set_alignment(CellAlignment::Right).fg(color),
        ]);
    }
    table
}
