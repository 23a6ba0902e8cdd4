use super::error::{RecordError, RecordResult};
use super::value::AttrType;
use super::MAX_NAME_LEN;

/// Fixed header of an encoded schema page:
/// [0:16) table name, [16:20) row count, [20:24) row size,
/// [24:28) attribute count. All integers little-endian.
pub const SCHEMA_HEADER_SIZE: usize = 28;

/// One attribute descriptor: [0:16) name, [16:32) type name,
/// both zero-padded byte strings.
pub const ATTR_DESC_SIZE: usize = 32;

/// A single column of a table. Immutable once the table is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub attr_type: AttrType,
}

/// Schema of one table: ordered attribute list plus the derived row width
/// and the running row count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSchema {
    name: String,
    row_count: u32,
    row_size: u32,
    attributes: Vec<Attribute>,
}

impl TableSchema {
    /// Build a fresh schema (row count zero). Validates name lengths and
    /// rejects the zero-attribute table, which would make the row width
    /// zero and page addressing divide by zero.
    pub fn new(name: String, attributes: Vec<Attribute>) -> RecordResult<Self> {
        if name.len() > MAX_NAME_LEN {
            return Err(RecordError::NameTooLong(name));
        }
        if attributes.is_empty() {
            return Err(RecordError::EmptySchema(name));
        }
        for attr in &attributes {
            if attr.name.len() > MAX_NAME_LEN {
                return Err(RecordError::NameTooLong(attr.name.clone()));
            }
        }

        let row_size = attributes
            .iter()
            .map(|a| a.attr_type.width() as u32)
            .sum();

        Ok(Self {
            name,
            row_count: 0,
            row_size,
            attributes,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn row_count(&self) -> u32 {
        self.row_count
    }

    /// Sum of the attribute widths; derived, never set directly.
    pub fn row_size(&self) -> u32 {
        self.row_size
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    /// Row counts only ever grow; there is no delete or update path.
    pub fn increment_row_count(&mut self) {
        self.row_count += 1;
    }

    /// Number of bytes the encoded schema occupies inside its page.
    pub fn encoded_len(&self) -> usize {
        SCHEMA_HEADER_SIZE + self.attributes.len() * ATTR_DESC_SIZE
    }

    /// Whether the schema and all its descriptors round-trip through a
    /// single page of the given size. Checked at table creation; the
    /// encoder itself does not re-validate.
    pub fn fits_in_page(&self, page_size: u32) -> bool {
        self.encoded_len() <= page_size as usize
    }

    /// Maximum attribute count a schema page of the given size can hold.
    pub fn max_attr_count(page_size: u32) -> u32 {
        (page_size.saturating_sub(SCHEMA_HEADER_SIZE as u32)) / ATTR_DESC_SIZE as u32
    }

    /// Encode into one page-sized buffer at the fixed offsets above.
    pub fn encode(&self, page_size: u32) -> Vec<u8> {
        let mut buf = vec![0u8; page_size as usize];

        copy_padded(&mut buf[0..16], self.name.as_bytes());
        buf[16..20].copy_from_slice(&self.row_count.to_le_bytes());
        buf[20..24].copy_from_slice(&self.row_size.to_le_bytes());
        buf[24..28].copy_from_slice(&(self.attributes.len() as u32).to_le_bytes());

        let mut offset = SCHEMA_HEADER_SIZE;
        for attr in &self.attributes {
            copy_padded(&mut buf[offset..offset + 16], attr.name.as_bytes());
            copy_padded(
                &mut buf[offset + 16..offset + ATTR_DESC_SIZE],
                attr.attr_type.as_str().as_bytes(),
            );
            offset += ATTR_DESC_SIZE;
        }

        buf
    }

    /// Decode a schema page. Fails if a descriptor would cross the page
    /// boundary, which caps the attribute count per table.
    pub fn decode(buf: &[u8]) -> RecordResult<Self> {
        debug_assert!(buf.len() >= SCHEMA_HEADER_SIZE);
        let name = trim_zeros(&buf[0..16]);
        let row_count = read_u32(buf, 16);
        let row_size = read_u32(buf, 20);
        let attr_count = read_u32(buf, 24);

        let mut attributes = Vec::with_capacity(attr_count as usize);
        let mut offset = SCHEMA_HEADER_SIZE;
        for _ in 0..attr_count {
            if offset + ATTR_DESC_SIZE > buf.len() {
                return Err(RecordError::SchemaOverflow {
                    table: name,
                    attr_count,
                    page_size: buf.len() as u32,
                });
            }
            let attr_name = trim_zeros(&buf[offset..offset + 16]);
            let type_name = trim_zeros(&buf[offset + 16..offset + ATTR_DESC_SIZE]);
            attributes.push(Attribute {
                name: attr_name,
                attr_type: AttrType::parse(&type_name)?,
            });
            offset += ATTR_DESC_SIZE;
        }

        Ok(Self {
            name,
            row_count,
            row_size,
            attributes,
        })
    }
}

fn copy_padded(dst: &mut [u8], src: &[u8]) {
    dst[..src.len()].copy_from_slice(src);
}

fn read_u32(buf: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&buf[offset..offset + 4]);
    u32::from_le_bytes(bytes)
}

fn trim_zeros(buf: &[u8]) -> String {
    let end = buf.iter().rposition(|&b| b != 0).map_or(0, |p| p + 1);
    String::from_utf8_lossy(&buf[..end]).into_owned()
}
