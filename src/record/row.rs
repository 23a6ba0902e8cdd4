use std::collections::HashMap;

use super::error::RecordResult;
use super::schema::TableSchema;

/// A row as callers see it: attribute name to string value.
pub type NamedValues = HashMap<String, String>;

/// Encode a named-value record into one fixed-width row.
///
/// Attributes are walked in schema order, not input order, so the byte
/// layout never depends on map iteration. The full row buffer is built
/// before anything is committed to a page, so a failing value leaves no
/// partial row behind. Missing keys encode as empty string / zero.
pub fn encode_row(schema: &TableSchema, values: &NamedValues) -> RecordResult<Vec<u8>> {
    let mut row = Vec::with_capacity(schema.row_size() as usize);
    for attr in schema.attributes() {
        let value = values.get(&attr.name).map(String::as_str);
        let bytes = attr.attr_type.encode_value(&attr.name, value)?;
        row.extend_from_slice(&bytes);
    }
    Ok(row)
}

/// Decode one fixed-width row back into named values, walking the same
/// widths and offsets as the encoder.
pub fn decode_row(schema: &TableSchema, bytes: &[u8]) -> NamedValues {
    let mut values = NamedValues::with_capacity(schema.attribute_count());
    let mut offset = 0;
    for attr in schema.attributes() {
        let width = attr.attr_type.width();
        values.insert(
            attr.name.clone(),
            attr.attr_type.decode_value(&bytes[offset..offset + width]),
        );
        offset += width;
    }
    values
}
